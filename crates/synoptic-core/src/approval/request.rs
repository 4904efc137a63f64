//! What the operator is asked to approve.

use serde::{Deserialize, Serialize};

/// Explanation attached to a raised gate.
///
/// Tells the operator which action is waiting, where its output goes, and
/// why it was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub action: String,
    pub target: String,
    pub reason: String,
}

impl ApprovalRequest {
    pub fn new(
        action: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// The request raised before a daily briefing is published.
    pub fn publish_daily_briefing() -> Self {
        Self::new(
            "PUBLISH_DAILY_BRIEFING",
            "Executive Dashboard, Slack #general",
            "Contains sensitive market data keywords",
        )
    }
}
