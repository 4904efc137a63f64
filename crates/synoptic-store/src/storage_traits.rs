//! Storage trait definitions for saved briefings
//!
//! The history is an ordered list, newest entry first, capped at
//! [`HISTORY_CAP`] entries. Saving prepends and evicts from the tail.
//!
//! All operations are async and backend-agnostic. An in-memory fake is
//! provided via the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Maximum number of briefings kept in the history.
pub const HISTORY_CAP: usize = 50;

const TITLE_LIMIT: usize = 60;
const TITLE_TRUNCATED: usize = 57;

/// Unique identifier for a saved briefing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BriefingId(pub String);

impl BriefingId {
    /// Generate a new random BriefingId
    pub fn new() -> Self {
        BriefingId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for BriefingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BriefingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BriefingId {
    fn from(s: &str) -> Self {
        BriefingId(s.to_string())
    }
}

/// A briefing artifact kept in the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBriefing {
    pub id: BriefingId,
    /// Display title derived from the query
    pub title: String,
    /// The free-text request that produced the briefing
    pub query: String,
    /// Full briefing text
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl SavedBriefing {
    /// Build a new entry with a fresh id and a title derived from `query`.
    pub fn new(query: &str, content: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: BriefingId::new(),
            title: briefing_title(query),
            query: query.to_string(),
            content: content.to_string(),
            created_at,
        }
    }

    /// Case-insensitive match against title and query.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.query.to_lowercase().contains(&term)
    }
}

/// Derive a display title from a query.
///
/// Trims whitespace, truncates long queries to 57 characters followed by
/// `...`, and upper-cases the first character.
pub fn briefing_title(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return "Untitled Briefing".to_string();
    }

    let mut title: String = if trimmed.chars().count() > TITLE_LIMIT {
        let mut short: String = trimmed.chars().take(TITLE_TRUNCATED).collect();
        short.push_str("...");
        short
    } else {
        trimmed.to_string()
    };

    if let Some(first) = title.chars().next() {
        let upper: String = first.to_uppercase().collect();
        title.replace_range(..first.len_utf8(), &upper);
    }
    title
}

/// Prepend `entry` and evict the oldest entries beyond [`HISTORY_CAP`].
pub(crate) fn push_capped(history: &mut Vec<SavedBriefing>, entry: SavedBriefing) {
    history.insert(0, entry);
    history.truncate(HISTORY_CAP);
}

/// Persistent, newest-first history of briefing artifacts.
///
/// Guarantees:
/// - `load()` returns entries newest first.
/// - `save()` prepends and never keeps more than [`HISTORY_CAP`] entries.
/// - `delete()` of an unknown id is a no-op.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Return the full history, newest first.
    async fn load(&self) -> StorageResult<Vec<SavedBriefing>>;

    /// Save a new briefing at the head of the history.
    async fn save(&self, query: &str, content: &str) -> StorageResult<SavedBriefing>;

    /// Fetch one briefing. Returns `StorageError::NotFound` if absent.
    async fn get(&self, id: &BriefingId) -> StorageResult<SavedBriefing> {
        self.load()
            .await?
            .into_iter()
            .find(|b| &b.id == id)
            .ok_or_else(|| StorageError::NotFound { id: id.0.clone() })
    }

    /// Remove a briefing. No-op if absent.
    async fn delete(&self, id: &BriefingId) -> StorageResult<()>;

    /// Entries whose title or query contains `term`, newest first.
    async fn search(&self, term: &str) -> StorageResult<Vec<SavedBriefing>> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|b| b.matches(term))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_capitalizes_first_letter() {
        assert_eq!(
            briefing_title("  morning briefing for Pune  "),
            "Morning briefing for Pune"
        );
    }

    #[test]
    fn title_truncates_long_queries() {
        let query = "a".repeat(80);
        let title = briefing_title(&query);
        assert_eq!(title.chars().count(), 60);
        assert!(title.starts_with('A'));
        assert!(title.ends_with("..."));
    }

    #[test]
    fn title_keeps_exactly_sixty_chars() {
        let query = "b".repeat(60);
        assert_eq!(briefing_title(&query).chars().count(), 60);
        assert!(!briefing_title(&query).ends_with("..."));
    }

    #[test]
    fn title_for_empty_query() {
        assert_eq!(briefing_title("   "), "Untitled Briefing");
    }

    #[test]
    fn push_capped_evicts_oldest() {
        let mut history = Vec::new();
        for i in 0..(HISTORY_CAP + 5) {
            push_capped(
                &mut history,
                SavedBriefing::new(&format!("query {i}"), "body", Utc::now()),
            );
        }
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].query, format!("query {}", HISTORY_CAP + 4));
        assert_eq!(history[HISTORY_CAP - 1].query, "query 5");
    }

    #[test]
    fn matches_is_case_insensitive() {
        let b = SavedBriefing::new("Tech news in Bengaluru", "body", Utc::now());
        assert!(b.matches("bengaluru"));
        assert!(b.matches("TECH"));
        assert!(!b.matches("sports"));
    }
}
