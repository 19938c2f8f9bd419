//! Frame-streaming object detection service.
//!
//! One pre-loaded detection model, one websocket endpoint: clients stream
//! compressed frames and get annotated frames back, one message per frame.
//! The library holds the service wiring; the binaries are `server` (the
//! endpoint), `webcam` (local camera to a window), and `stream` (remote
//! client driving a server).

pub mod config;
pub mod display;
pub mod pipeline;
pub mod session;

pub use config::{ErrorPolicy, ServerConfig};
pub use pipeline::{FrameProcessor, PipelineError, ProcessedFrame};
pub use session::serve_session;
