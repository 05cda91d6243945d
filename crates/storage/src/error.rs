use thiserror::Error;
use tsgraph_core::Error as CoreError;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid label '{0}'")]
    InvalidLabel(String),

    #[error("Invalid edge kind '{0}'")]
    InvalidEdgeKind(String),

    #[error("Invalid property key '{0}'")]
    InvalidPropertyKey(String),

    #[error("Node not found: {0}")]
    NodeNotFound(u64),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::storage(err.to_string())
    }
}
