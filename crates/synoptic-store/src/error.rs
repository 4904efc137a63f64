//! Error types for synoptic-store

use thiserror::Error;

/// Errors that can occur in the artifact persistence layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// No saved briefing carries the requested id
    #[error("Briefing not found: {id}")]
    NotFound { id: String },

    /// Reading or writing the backing file failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
