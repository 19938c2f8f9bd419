//! Object detection for the argus pipeline.
//!
//! A YOLO detection model runs behind the `Backend`/`Session` seam (ONNX
//! Runtime today). `DetectorPool` is the service-facing entry point: it
//! loads the weights once and fans inference out over a bounded set of
//! worker threads, exposed through the async `Infer` trait.

pub mod annotate;
pub mod backend;
pub mod backends;
pub mod device;
pub mod error;
pub mod modelsource;
pub mod pool;
pub mod session;
pub mod traits;
pub mod yolo;

pub use annotate::{annotate, class_color};
pub use backend::Backend;
pub use backends::OnnxBackend;
pub use device::Device;
pub use error::InferError;
pub use modelsource::ModelSource;
pub use pool::DetectorPool;
pub use session::Session;
pub use traits::Infer;
pub use yolo::{iou, Detection, DetectorConfig, LetterboxInfo, YoloDetector, COCO_CLASSES};
