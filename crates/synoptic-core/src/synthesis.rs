//! Final briefing synthesis.
//!
//! After approval the orchestrator turns the derived intent into the
//! result artifact. [`SimulatedSynthesizer`] composes it locally with
//! randomized weather figures; [`BackendSynthesizer`] asks the real
//! briefing backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, BackendResult, BriefingBackend};
use crate::intent::Intent;

const CONDITIONS: [&str; 4] = ["Clear Sky", "Haze", "Light Rain", "Partly Cloudy"];

/// Input to synthesis: the raw prompt and what was derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingRequest {
    pub prompt: String,
    pub intent: Intent,
}

/// Simulated weather observation used in the briefing body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherReading {
    pub temperature_c: i32,
    pub condition: &'static str,
}

impl WeatherReading {
    /// Draw a temperature in 24..=33 °C and one of the canned conditions.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        WeatherReading {
            temperature_c: rng.gen_range(24..34),
            condition: CONDITIONS[rng.gen_range(0..CONDITIONS.len())],
        }
    }
}

/// Render the briefing text for `intent` and `weather`.
pub fn compose_briefing(intent: &Intent, weather: &WeatherReading) -> String {
    let location = &intent.location;
    let category = intent.category.to_string();
    let category_lower = category.to_lowercase();
    let temp = weather.temperature_c;
    let feels_like = temp + 4;
    let condition = weather.condition;

    format!(
        "## Weather & Environment\n\
Current conditions in {location} indicate a temperature of {temp}°C with {condition}. \
High humidity at 72% will make real-feel temperatures closer to {feels_like}°C. \
Visibility is moderate at 4km.\n\
\n\
• Business Implication: Outdoor meetings should be scheduled for early morning or late evening.\n\
• Travel Advisory: Minor delays expected on coastal routes due to visibility.\n\
\n\
## News & Updates: {category} Sector\n\
Key developments from the {location} {category_lower} corridor and global markets:\n\
\n\
• {category} Daily: Major announcement expected from top local players.\n\
• Market Analysis: {category} sector sees 15% Q-o-Q rise despite global headwinds.\n\
• Regulatory Update: New compliance guidelines for {category} companies.\n\
• Innovation: Local startups driving next-gen solutions in {category}.\n\
• 5G rollout completes Phase 2 in {location}, boosting {category} infrastructure.\n\
\n\
## Insights & Analysis\n\
1. **Strategic Pivot**: Consider accelerating any AI-partnership discussions locally.\n\
2. **Operational**: Ensure all data handling protocols are updated for the new Data Protection Bill compliance check.\n\
3. **Logistics**: Leverage the improved 5G connectivity for deploying edge-iot devices in the {location} offices."
    )
}

/// Produces the final briefing text.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, request: &BriefingRequest) -> BackendResult<String>;
}

/// Local synthesis with randomized weather figures.
pub struct SimulatedSynthesizer {
    rng: Mutex<StdRng>,
}

impl SimulatedSynthesizer {
    /// Seeded for reproducible output, or from entropy when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl Synthesizer for SimulatedSynthesizer {
    async fn synthesize(&self, request: &BriefingRequest) -> BackendResult<String> {
        let weather = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            WeatherReading::sample(&mut *rng)
        };
        Ok(compose_briefing(&request.intent, &weather))
    }
}

/// Synthesis delegated to a [`BriefingBackend`].
pub struct BackendSynthesizer {
    backend: Arc<dyn BriefingBackend>,
}

impl BackendSynthesizer {
    pub fn new(backend: Arc<dyn BriefingBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Synthesizer for BackendSynthesizer {
    async fn synthesize(&self, request: &BriefingRequest) -> BackendResult<String> {
        let response = self.backend.generate(&request.prompt).await?;
        if !response.success || response.content.trim().is_empty() {
            return Err(BackendError::Unsuccessful(
                "backend returned no briefing content".to_string(),
            ));
        }
        Ok(response.content)
    }
}
