use argus::display::rgb_to_argb;
use argus_base::log;
use argus_camera::{Camera, CameraConfig, V4l2Camera};
use argus_infer::{annotate, DetectorConfig, DetectorPool, Device, Infer, ModelSource};
use minifb::{Key, Window, WindowOptions};

const DEFAULT_MODEL: &str = "yolov8n.onnx";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    argus_base::init_stdout_logger();

    // Model path from args, then env, then the default.
    let model_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ARGUS_MODEL").ok())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    log::info!("Argus Webcam Detection");
    log::info!("loading model: {}", model_path);
    let pool = DetectorPool::new(
        ModelSource::File(model_path.into()),
        Device::Cpu,
        DetectorConfig::default(),
        1,
    )?;
    log::info!("model loaded");

    let config = CameraConfig::default().with_width(640).with_height(480);
    let mut camera = V4l2Camera::new(config)?;
    log::info!("camera opened: 640x480");

    // Size the window off the first frame.
    let mut frame = camera.recv().await?;
    let height = frame.shape[0];
    let width = frame.shape[1];

    let mut window = Window::new(
        "Argus Detection - ESC to exit",
        width,
        height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    log::info!("starting detection loop");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let detections = pool.detect(frame.clone(), None).await?;
        annotate(&mut frame, &detections);

        log::debug!("{} detections", detections.len());

        let argb = rgb_to_argb(&frame.data, width, height);
        window.update_with_buffer(&argb, width, height)?;

        frame = camera.recv().await?;
        if frame.shape[0] != height || frame.shape[1] != width {
            log::warn!(
                "frame dimension change: expected {}x{}, got {}x{}",
                width,
                height,
                frame.shape[1],
                frame.shape[0]
            );
            break;
        }
    }

    log::info!("exiting");
    Ok(())
}
