use argus::display::rgb_to_argb;
use argus_base::log;
use argus_camera::{Camera, CameraConfig, V4l2Camera};
use argus_com::{FrameMessage, WsClient};
use argus_image::Image;
use minifb::{Key, Window, WindowOptions};

const DEFAULT_URI: &str = "ws://127.0.0.1:8000";
const JPEG_QUALITY: u8 = 85;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    argus_base::init_stdout_logger();

    let uri = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_URI.to_string());

    log::info!("Argus Stream Client");
    log::info!("connecting to {}", uri);
    let mut client = WsClient::connect(&uri).await?;
    log::info!("connected");

    let config = CameraConfig::default().with_width(640).with_height(480);
    let mut camera = V4l2Camera::new(config)?;
    log::info!("camera opened: 640x480");

    let first = camera.recv().await?;
    let height = first.shape[0];
    let width = first.shape[1];

    let mut window = Window::new(
        "Argus Stream - ESC to exit",
        width,
        height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    let mut frame = first;
    while window.is_open() && !window.is_key_down(Key::Escape) {
        // One frame in flight at a time: send, then wait for the reply.
        let jpeg = argus_image::encode_jpeg(Image::U8(frame), JPEG_QUALITY).await?;
        client.send_binary(jpeg).await?;

        match client.recv().await? {
            Some(FrameMessage::Binary(reply)) => {
                let annotated = argus_image::decode(&reply).await?.into_rgb8();
                if annotated.shape[0] == height && annotated.shape[1] == width {
                    let argb = rgb_to_argb(&annotated.data, width, height);
                    window.update_with_buffer(&argb, width, height)?;
                } else {
                    log::warn!(
                        "reply dimension mismatch: expected {}x{}, got {}x{}",
                        width,
                        height,
                        annotated.shape[1],
                        annotated.shape[0]
                    );
                }
            }
            Some(FrameMessage::Text(notice)) => {
                log::warn!("server notice: {}", notice);
            }
            None => {
                log::info!("server closed the connection");
                break;
            }
        }

        frame = camera.recv().await?;
    }

    log::info!("exiting");
    Ok(())
}
