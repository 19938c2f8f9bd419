//! Camera capture for the local frame-source variants.
//!
//! A unified async `Camera` trait with a V4L2 backend behind the `v4l2`
//! feature. Frames arrive as RGB `Tensor<u8>` pixel grids in HWC layout.

pub mod config;
pub mod error;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use error::CameraError;
pub use traits::Camera;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
