use crate::{Detection, InferError};
use argus_base::Tensor;

/// Async inference seam between the session loop and the engine.
///
/// Implementations map an RGB pixel grid `[height, width, 3]` to a set of
/// detections. Each call is independent; a frame with nothing detectable
/// yields an empty vector. `conf_override` replaces the engine's configured
/// confidence threshold for that call only.
#[allow(async_fn_in_trait)]
pub trait Infer {
    async fn detect(
        &self,
        frame: Tensor<u8>,
        conf_override: Option<f32>,
    ) -> Result<Vec<Detection>, InferError>;
}
