use argus_base::Tensor;
use argus_camera::{Camera, CameraError};
use tokio::sync::mpsc;

/// Channel-fed stand-in used to exercise the trait without hardware.
struct ChannelCamera {
    rx: mpsc::Receiver<Result<Tensor<u8>, CameraError>>,
}

impl Camera for ChannelCamera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("source exhausted".to_string()))?
    }
}

#[tokio::test]
async fn recv_yields_frames_in_order() {
    let (tx, rx) = mpsc::channel(4);
    let mut camera = ChannelCamera { rx };

    for value in [10u8, 20] {
        let frame = Tensor::new(vec![2, 2, 3], vec![value; 12]).unwrap();
        tx.send(Ok(frame)).await.unwrap();
    }

    let first = camera.recv().await.unwrap();
    assert_eq!(first.data[0], 10);
    let second = camera.recv().await.unwrap();
    assert_eq!(second.data[0], 20);
}

#[tokio::test]
async fn recv_propagates_source_errors() {
    let (tx, rx) = mpsc::channel(1);
    let mut camera = ChannelCamera { rx };

    tx.send(Err(CameraError::Device("gone".to_string())))
        .await
        .unwrap();

    match camera.recv().await {
        Err(CameraError::Device(msg)) => assert_eq!(msg, "gone"),
        other => panic!("expected Device error, got {other:?}"),
    }
}

#[tokio::test]
async fn closed_source_reports_channel_error() {
    let (tx, rx) = mpsc::channel::<Result<Tensor<u8>, CameraError>>(1);
    let mut camera = ChannelCamera { rx };
    drop(tx);

    assert!(matches!(
        camera.recv().await,
        Err(CameraError::Channel(_))
    ));
}

#[test]
fn error_display_is_descriptive() {
    let err = CameraError::Device("MJPEG not supported by device".to_string());
    assert!(err.to_string().contains("MJPEG"));

    let err = CameraError::Channel("capture thread exited".to_string());
    assert!(err.to_string().starts_with("channel error"));
}
