//! Synoptic-Store: persistence for saved briefing artifacts.
//!
//! Every briefing the engine produces can be kept in a capped,
//! newest-first history that is read once at startup and rewritten after
//! each change.
//!
//! ## Key Components
//!
//! - `ArtifactStore`: backend-agnostic async trait over the history
//! - `JsonFileArtifactStore`: single JSON document on disk
//! - `fakes::MemoryArtifactStore`: in-memory implementation for tests

mod error;
pub mod fakes;
pub mod json_store;
pub mod storage_traits;

pub use error::StorageError;
pub use json_store::JsonFileArtifactStore;
pub use storage_traits::{
    briefing_title, ArtifactStore, BriefingId, SavedBriefing, StorageResult, HISTORY_CAP,
};
