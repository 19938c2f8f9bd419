pub mod logging;
pub mod rect;
pub mod tensor;
pub mod vec2;

pub use logging::{init_stdout_logger, StdoutLogger};
pub use rect::Rect;
pub use tensor::{Tensor, TensorError};
pub use vec2::Vec2;

// Re-export log so downstream crates can use argus_base::log::*
pub use log;
