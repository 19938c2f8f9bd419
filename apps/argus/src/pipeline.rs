use argus_image::{Image, ImageError};
use argus_infer::{annotate, Infer, InferError};

/// Error taxonomy for one frame cycle.
///
/// `Decode` and `Encode` are per-frame conditions the session recovers
/// from; `Infer` means the engine itself failed.
#[derive(Debug)]
pub enum PipelineError {
    Decode(ImageError),
    Infer(InferError),
    Encode(ImageError),
}

impl PipelineError {
    /// Short machine-readable tag for client-facing notices.
    pub fn notice(&self) -> &'static str {
        match self {
            PipelineError::Decode(_) => "decode failed",
            PipelineError::Infer(_) => "inference failed",
            PipelineError::Encode(_) => "encode failed",
        }
    }

    /// Whether the session can keep going after dropping this frame.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::Decode(_) | PipelineError::Encode(_))
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Decode(err) => write!(f, "frame decode: {err}"),
            PipelineError::Infer(err) => write!(f, "inference: {err}"),
            PipelineError::Encode(err) => write!(f, "frame encode: {err}"),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Result of one frame cycle.
#[derive(Debug)]
pub struct ProcessedFrame {
    /// Annotated frame, JPEG-encoded.
    pub bytes: Vec<u8>,
    /// Number of objects detected.
    pub detections: usize,
}

/// The per-frame processing core: decode -> infer -> annotate -> encode.
///
/// Holds no state across frames; each call is one independent cycle. The
/// detector seam is generic so tests can substitute a stub engine.
pub struct FrameProcessor<D> {
    detector: D,
    jpeg_quality: u8,
    conf_override: Option<f32>,
}

impl<D: Infer> FrameProcessor<D> {
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            jpeg_quality: 90,
            conf_override: None,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Replace the engine's configured confidence threshold for every frame
    /// this processor handles.
    pub fn with_conf_override(mut self, conf: f32) -> Self {
        self.conf_override = Some(conf);
        self
    }

    /// Run one encoded frame through the full cycle.
    pub async fn process(&self, data: &[u8]) -> Result<ProcessedFrame, PipelineError> {
        let image = argus_image::decode(data)
            .await
            .map_err(PipelineError::Decode)?;
        let mut frame = image.into_rgb8();

        let detections = self
            .detector
            .detect(frame.clone(), self.conf_override)
            .await
            .map_err(PipelineError::Infer)?;

        annotate(&mut frame, &detections);

        let bytes = argus_image::encode_jpeg(Image::U8(frame), self.jpeg_quality)
            .await
            .map_err(PipelineError::Encode)?;

        Ok(ProcessedFrame {
            bytes,
            detections: detections.len(),
        })
    }
}
