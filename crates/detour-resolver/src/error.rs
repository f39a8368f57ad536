use detour_core::{PathError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("storage operation failed: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}

impl From<PathError> for ResolveError {
    fn from(value: PathError) -> Self {
        match value {
            PathError::InvalidPath(message) => Self::InvalidPath(message),
        }
    }
}
