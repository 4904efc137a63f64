//! Domain-level error taxonomy for Synoptic.
//!
//! Control operations on the engine never fail: misordered calls are
//! guarded no-ops. These errors come from the I/O-facing collaborators.

use crate::backend::BackendError;
use crate::export::ExportError;

/// Synoptic domain errors.
#[derive(Debug, thiserror::Error)]
pub enum SynopticError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("storage error: {0}")]
    Storage(#[from] synoptic_store::StorageError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no briefing has been produced yet")]
    NoArtifact,
}

/// Result type for Synoptic operations.
pub type Result<T> = std::result::Result<T, SynopticError>;
