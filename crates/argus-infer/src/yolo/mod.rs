pub mod detector;
pub mod labels;
pub mod postprocess;
pub mod preprocess;
pub mod types;

pub use detector::YoloDetector;
pub use labels::COCO_CLASSES;
pub use postprocess::{iou, postprocess};
pub use preprocess::preprocess;
pub use types::{Detection, DetectorConfig, LetterboxInfo};
