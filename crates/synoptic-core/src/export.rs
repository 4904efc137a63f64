//! Artifact export side effects: file download and clipboard.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Errors produced while exporting an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

/// File name used for a downloaded briefing, e.g.
/// `daily-briefing-2024-06-01T12-00-00.txt`.
pub fn download_filename(now: DateTime<Utc>) -> String {
    format!("daily-briefing-{}.txt", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Write `content` into `dir` under a timestamped name and return the path.
pub async fn download_artifact(
    dir: &Path,
    content: &str,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(download_filename(now));
    tokio::fs::write(&path, content).await?;
    Ok(path)
}

/// A text clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Clipboard that keeps the last written text in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
