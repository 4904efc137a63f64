//! In-memory fakes for storage traits (testing only)
//!
//! `MemoryArtifactStore` satisfies the `ArtifactStore` contract without
//! touching the filesystem.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::storage_traits::*;

/// In-memory artifact history backed by a `Vec`, newest first.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    history: Mutex<Vec<SavedBriefing>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn history(&self) -> MutexGuard<'_, Vec<SavedBriefing>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn load(&self) -> StorageResult<Vec<SavedBriefing>> {
        Ok(self.history().clone())
    }

    async fn save(&self, query: &str, content: &str) -> StorageResult<SavedBriefing> {
        let entry = SavedBriefing::new(query, content, Utc::now());
        push_capped(&mut self.history(), entry.clone());
        Ok(entry)
    }

    async fn delete(&self, id: &BriefingId) -> StorageResult<()> {
        self.history().retain(|b| &b.id != id);
        Ok(())
    }
}
