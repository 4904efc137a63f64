//! HTTP client for the briefing backend.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::{BackendError, BackendResult, BriefingBackend, BriefingResponse, HealthStatus};
use crate::config::BackendConfig;

/// [`BriefingBackend`] speaking JSON over HTTP.
pub struct HttpBriefingBackend {
    config: BackendConfig,
    http_client: reqwest::Client,
}

impl HttpBriefingBackend {
    /// Create a new client for the configured server
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("synoptic/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()?;

        Ok(HttpBriefingBackend {
            config,
            http_client,
        })
    }

    /// Create a client from environment variables
    pub fn from_env() -> BackendResult<Self> {
        Self::new(BackendConfig::from_env())
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

/// Error detail from a non-2xx body: its `detail` field, else the raw text.
pub(crate) fn rejection_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .filter(|d| !d.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

async fn rejected(response: reqwest::Response) -> BackendError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    BackendError::Rejected {
        status: status.as_u16(),
        detail: rejection_detail(status, &body),
    }
}

#[async_trait]
impl BriefingBackend for HttpBriefingBackend {
    #[instrument(skip(self), fields(url = %self.config.briefing_url()))]
    async fn generate(&self, query: &str) -> BackendResult<BriefingResponse> {
        let response = self
            .http_client
            .post(self.config.briefing_url())
            .json(&json!({ "query": query }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        let parsed: BriefingResponse = response.json().await?;
        debug!(success = parsed.success, bytes = parsed.content.len(), "briefing received");
        Ok(parsed)
    }

    #[instrument(skip(self), fields(url = %self.config.health_url()))]
    async fn health(&self) -> BackendResult<HealthStatus> {
        let response = self
            .http_client
            .get(self.config.health_url())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        Ok(response.json().await?)
    }
}
