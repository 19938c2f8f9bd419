use crate::CameraError;
use argus_base::Tensor;

/// Async frame source.
///
/// `recv` resolves with the next decoded frame as a `Tensor<u8>` in HWC
/// layout `[height, width, channels]`; RGB frames have 3 channels.
#[allow(async_fn_in_trait)]
pub trait Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError>;
}
