use std::fmt;

#[derive(Debug)]
pub enum InferError {
    ModelLoad(String),
    Backend(String),
    ShapeMismatch { expected: String, got: String },
    InvalidInput { name: String, expected_names: Vec<String> },
    UnsupportedDevice(crate::Device),
    Io(String),
    Pool(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::Backend(msg) => write!(f, "backend error: {msg}"),
            InferError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            InferError::InvalidInput {
                name,
                expected_names,
            } => {
                write!(f, "invalid input '{name}', model expects {expected_names:?}")
            }
            InferError::UnsupportedDevice(device) => {
                write!(f, "unsupported device: {device}")
            }
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Pool(msg) => write!(f, "pool error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<argus_base::TensorError> for InferError {
    fn from(err: argus_base::TensorError) -> Self {
        InferError::Backend(err.to_string())
    }
}
