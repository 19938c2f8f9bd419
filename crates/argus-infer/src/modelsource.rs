use crate::InferError;
use std::path::PathBuf;

pub enum ModelSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl ModelSource {
    /// Resolve the source to raw model bytes.
    ///
    /// A `File` source hits the disk exactly once; callers that need the
    /// weights more than once should hold on to the returned buffer.
    pub fn read(self) -> Result<Vec<u8>, InferError> {
        match self {
            ModelSource::File(path) => std::fs::read(&path).map_err(|e| {
                InferError::ModelLoad(format!("failed to read {}: {e}", path.display()))
            }),
            ModelSource::Memory(bytes) => Ok(bytes),
        }
    }
}
