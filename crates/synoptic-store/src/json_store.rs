//! JSON-file backed artifact store.
//!
//! The whole history lives in one JSON array. It is read once when the
//! store is opened and rewritten (write-then-rename) after every change.
//! The in-memory copy only changes once the write has succeeded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::storage_traits::*;

/// Artifact history persisted as a single JSON document.
pub struct JsonFileArtifactStore {
    path: PathBuf,
    history: Mutex<Vec<SavedBriefing>>,
}

impl JsonFileArtifactStore {
    /// Open the store at `path`, loading any existing history.
    ///
    /// A missing file yields an empty history. A file that cannot be parsed
    /// is logged and treated as empty; it is replaced on the next save.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let history = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<SavedBriefing>>(&bytes) {
                Ok(history) => history,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "discarding unreadable briefing history");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = history.len(), "briefing history loaded");

        Ok(Self {
            path,
            history: Mutex::new(history),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, history: &[SavedBriefing]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(history)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for JsonFileArtifactStore {
    async fn load(&self) -> StorageResult<Vec<SavedBriefing>> {
        Ok(self.history.lock().await.clone())
    }

    async fn save(&self, query: &str, content: &str) -> StorageResult<SavedBriefing> {
        let entry = SavedBriefing::new(query, content, Utc::now());
        let mut history = self.history.lock().await;
        let mut next = history.clone();
        push_capped(&mut next, entry.clone());
        self.persist(&next).await?;
        *history = next;
        Ok(entry)
    }

    async fn delete(&self, id: &BriefingId) -> StorageResult<()> {
        let mut history = self.history.lock().await;
        if !history.iter().any(|b| &b.id == id) {
            return Ok(());
        }
        let next: Vec<SavedBriefing> = history.iter().filter(|b| &b.id != id).cloned().collect();
        self.persist(&next).await?;
        *history = next;
        Ok(())
    }
}
