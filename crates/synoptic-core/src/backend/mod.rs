//! The external briefing backend.
//!
//! The engine only touches the backend through [`BriefingBackend`]:
//! submit a free-text query and receive the generated briefing, or ask for
//! the service's health.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpBriefingBackend;

/// Response of a briefing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingResponse {
    pub success: bool,
    #[serde(default, alias = "briefing")]
    pub content: String,
}

/// Response of the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(alias = "uptime")]
    pub uptime_seconds: f64,
    pub version: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Errors raised by a backend call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("backend reported failure: {0}")]
    Unsuccessful(String),
}

/// Result type for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Request/response collaborator that produces briefings.
#[async_trait]
pub trait BriefingBackend: Send + Sync {
    /// Submit a query and receive the generated briefing.
    async fn generate(&self, query: &str) -> BackendResult<BriefingResponse>;

    /// Report service health.
    async fn health(&self) -> BackendResult<HealthStatus>;
}
