use crate::{Camera, CameraConfig, CameraError};
use argus_base::Tensor;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Tensor<u8>, CameraError>;

/// V4L2 camera capturing MJPEG frames.
///
/// Capture runs on a dedicated thread (the V4L2 mmap stream is blocking);
/// decoded RGB frames cross into async land over a bounded channel sized to
/// the driver buffer count.
pub struct V4l2Camera {
    config: CameraConfig,
    device: Option<Device>,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("running", &self.receiver.is_some())
            .finish()
    }
}

impl Camera for V4l2Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        self.ensure_started()?;

        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("receiver not initialized".to_string()))?;

        receiver
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("capture thread exited".to_string()))?
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // Dropping the receiver makes the capture thread's send fail and exit.
        drop(self.receiver.take());
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl V4l2Camera {
    /// Open the device and negotiate MJPEG at the requested resolution.
    ///
    /// # Errors
    ///
    /// `CameraError::Device` if the device cannot be opened, refuses MJPEG,
    /// or rejects the format/rate parameters.
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(config.device())
            .map_err(|e| CameraError::Device(format!("{}: {e}", config.device())))?;

        let mut format = Format::new(config.width(), config.height(), FourCC::new(b"MJPG"));
        format = Capture::set_format(&device, &format)
            .map_err(|e| CameraError::Device(format!("set_format failed: {e}")))?;

        // The driver may silently fall back to another pixel format.
        if format.fourcc != FourCC::new(b"MJPG") {
            return Err(CameraError::Device(
                "MJPEG not supported by device".to_string(),
            ));
        }

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)
            .map_err(|e| CameraError::Device(format!("set_params failed: {e}")))?;

        Ok(Self {
            config,
            device: Some(device),
            receiver: None,
            thread_handle: None,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Start the capture thread if not already running. Called from the
    /// first `recv()`.
    fn ensure_started(&mut self) -> Result<(), CameraError> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::Device("device already consumed".to_string()))?;

        let buffer_count = self.config.buffer_count() as usize;
        let (tx, rx) = mpsc::channel(buffer_count.max(1));

        let handle = thread::spawn(move || {
            if let Err(e) = Self::capture_loop(device, tx, buffer_count as u32) {
                log::warn!("capture thread error: {e}");
            }
        });

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);

        Ok(())
    }

    fn capture_loop(
        device: Device,
        tx: mpsc::Sender<FrameResult>,
        buffer_count: u32,
    ) -> Result<(), CameraError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count)
            .map_err(|e| CameraError::Device(format!("mmap stream failed: {e}")))?;

        loop {
            let (frame_data, _metadata) = CaptureStream::next(&mut stream)
                .map_err(|e| CameraError::Device(format!("capture failed: {e}")))?;

            // The buffer is only valid until the next dequeue.
            let frame_vec = frame_data.to_vec();

            let result = argus_image::decode_blocking(&frame_vec)
                .map(|image| image.into_rgb8())
                .map_err(CameraError::from);

            if tx.blocking_send(result).is_err() {
                break; // Receiver dropped
            }
        }

        Ok(())
    }
}
