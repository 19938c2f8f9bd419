use crate::{Backend, InferError, ModelSource, Session};
use argus_base::Tensor;

use super::postprocess::postprocess;
use super::preprocess::preprocess;
use super::types::{Detection, DetectorConfig};

/// End-to-end YOLO object detection pipeline.
///
/// Wraps a backend session with letterbox preprocessing and NMS
/// postprocessing. Each `detect` call is independent; nothing is retained
/// between frames.
pub struct YoloDetector {
    session: Box<dyn Session>,
    config: DetectorConfig,
}

impl YoloDetector {
    pub fn new(
        model: ModelSource,
        backend: &dyn Backend,
        config: DetectorConfig,
    ) -> Result<Self, InferError> {
        let session = backend.load_model(model)?;
        Ok(Self { session, config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run detection on an RGB pixel grid `[height, width, 3]`.
    ///
    /// `conf_override`, when set, replaces the configured confidence
    /// threshold for this call only.
    pub fn detect(
        &mut self,
        frame: &Tensor<u8>,
        conf_override: Option<f32>,
    ) -> Result<Vec<Detection>, InferError> {
        let original_hw = match frame.shape[..] {
            [h, w, _] => (h, w),
            _ => {
                return Err(InferError::ShapeMismatch {
                    expected: "[H, W, 3]".to_string(),
                    got: format!("{:?}", frame.shape),
                });
            }
        };

        let (preprocessed, letterbox) = preprocess(frame, self.config.input_size())?;

        let input_name = self
            .session
            .input_names()
            .first()
            .ok_or_else(|| InferError::Backend("model has no inputs".to_string()))?
            .clone();

        let outputs = self.session.run(&[(input_name.as_str(), preprocessed)])?;

        let output = outputs
            .values()
            .next()
            .ok_or_else(|| InferError::Backend("model produced no outputs".to_string()))?;

        let conf = conf_override.unwrap_or(self.config.conf_threshold());

        postprocess(
            output,
            &letterbox,
            original_hw,
            conf,
            self.config.iou_threshold(),
        )
    }
}
