use std::fmt;

#[derive(Debug)]
pub enum CameraError {
    Device(String),
    Decode(argus_image::ImageError),
    Channel(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Device(msg) => write!(f, "device error: {msg}"),
            CameraError::Decode(err) => write!(f, "decode error: {err}"),
            CameraError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<argus_image::ImageError> for CameraError {
    fn from(err: argus_image::ImageError) -> Self {
        CameraError::Decode(err)
    }
}
