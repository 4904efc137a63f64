//! Engine and backend configuration.
//!
//! `Default` reads `SYNOPTIC_*` environment variables and falls back to
//! the standard pacing of the dashboard demo.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn env_u64(key: &str, fallback: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(fallback)
}

/// Pacing and defaults for the run controller and replay engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause while the orchestrator parses intent
    pub analysis_delay_ms: u64,
    /// Simulated network latency after delegation
    pub delegation_delay_ms: u64,
    /// Gap between the weather and news agents reporting back
    pub collection_stagger_ms: u64,
    /// Time spent synthesizing after approval
    pub synthesis_delay_ms: u64,
    /// Time the orchestrator stays in the error state after rejection
    pub teardown_delay_ms: u64,
    /// Autoplay tick period during replay
    pub autoplay_period_ms: u64,
    /// Location used when the prompt names none
    pub default_location: String,
    /// Seed for the simulated weather figures; random when unset
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let standard = Self::standard();
        EngineConfig {
            analysis_delay_ms: env_u64("SYNOPTIC_ANALYSIS_DELAY_MS", standard.analysis_delay_ms),
            delegation_delay_ms: env_u64(
                "SYNOPTIC_DELEGATION_DELAY_MS",
                standard.delegation_delay_ms,
            ),
            collection_stagger_ms: env_u64(
                "SYNOPTIC_COLLECTION_STAGGER_MS",
                standard.collection_stagger_ms,
            ),
            synthesis_delay_ms: env_u64("SYNOPTIC_SYNTHESIS_DELAY_MS", standard.synthesis_delay_ms),
            teardown_delay_ms: env_u64("SYNOPTIC_TEARDOWN_DELAY_MS", standard.teardown_delay_ms),
            autoplay_period_ms: env_u64("SYNOPTIC_AUTOPLAY_PERIOD_MS", standard.autoplay_period_ms),
            default_location: std::env::var("SYNOPTIC_DEFAULT_LOCATION")
                .unwrap_or(standard.default_location),
            rng_seed: std::env::var("SYNOPTIC_RNG_SEED")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
        }
    }
}

impl EngineConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// The built-in pacing, ignoring the environment.
    pub fn standard() -> Self {
        EngineConfig {
            analysis_delay_ms: 500,
            delegation_delay_ms: 1000,
            collection_stagger_ms: 200,
            synthesis_delay_ms: 800,
            teardown_delay_ms: 1000,
            autoplay_period_ms: 1000,
            default_location: "Mumbai".to_string(),
            rng_seed: None,
        }
    }

    /// Standard config with every run delay set to zero.
    pub fn instant() -> Self {
        EngineConfig {
            analysis_delay_ms: 0,
            delegation_delay_ms: 0,
            collection_stagger_ms: 0,
            synthesis_delay_ms: 0,
            teardown_delay_ms: 0,
            ..Self::standard()
        }
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_default_location(mut self, location: &str) -> Self {
        self.default_location = location.to_string();
        self
    }

    pub fn with_autoplay_period(mut self, period: Duration) -> Self {
        self.autoplay_period_ms = period.as_millis() as u64;
        self
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn delegation_delay(&self) -> Duration {
        Duration::from_millis(self.delegation_delay_ms)
    }

    pub fn collection_stagger(&self) -> Duration {
        Duration::from_millis(self.collection_stagger_ms)
    }

    pub fn synthesis_delay(&self) -> Duration {
        Duration::from_millis(self.synthesis_delay_ms)
    }

    pub fn teardown_delay(&self) -> Duration {
        Duration::from_millis(self.teardown_delay_ms)
    }

    /// Autoplay period, never shorter than one millisecond.
    pub fn autoplay_period(&self) -> Duration {
        Duration::from_millis(self.autoplay_period_ms.max(1))
    }
}

/// Where the briefing backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: std::env::var("SYNOPTIC_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            api_prefix: "/api/v1".to_string(),
            request_timeout_secs: env_u64("SYNOPTIC_REQUEST_TIMEOUT_SECS", 60),
        }
    }
}

impl BackendConfig {
    /// Create a config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Config for a specific server
    pub fn new(base_url: &str) -> Self {
        BackendConfig {
            base_url: base_url.to_string(),
            api_prefix: "/api/v1".to_string(),
            request_timeout_secs: 60,
        }
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn briefing_url(&self) -> String {
        format!("{}{}/briefing", self.base(), self.api_prefix)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}/health", self.base(), self.api_prefix)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pacing() {
        let config = EngineConfig::standard();
        assert_eq!(config.delegation_delay(), Duration::from_millis(1000));
        assert_eq!(config.default_location, "Mumbai");
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn instant_zeroes_run_delays_but_keeps_autoplay() {
        let config = EngineConfig::instant();
        assert_eq!(config.analysis_delay(), Duration::ZERO);
        assert_eq!(config.teardown_delay(), Duration::ZERO);
        assert_eq!(config.autoplay_period(), Duration::from_millis(1000));
    }

    #[test]
    fn autoplay_period_is_never_zero() {
        let config = EngineConfig::instant().with_autoplay_period(Duration::ZERO);
        assert_eq!(config.autoplay_period(), Duration::from_millis(1));
    }

    #[test]
    fn builders_override_fields() {
        let config = EngineConfig::instant()
            .with_rng_seed(7)
            .with_default_location("Pune");
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.default_location, "Pune");
    }

    #[test]
    fn backend_urls_strip_trailing_slash() {
        let config = BackendConfig::new("http://briefings.local:9000/");
        assert_eq!(
            config.briefing_url(),
            "http://briefings.local:9000/api/v1/briefing"
        );
        assert_eq!(
            config.health_url(),
            "http://briefings.local:9000/api/v1/health"
        );
    }
}
