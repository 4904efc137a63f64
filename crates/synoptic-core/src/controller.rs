//! The run controller.
//!
//! Sequences the fixed workflow phases over the agent registry and event
//! log, records a snapshot after every mutation point, and suspends at the
//! approval gate until an operator decides.
//!
//! ```text
//! start_run: Analysis -> Delegation -> Collection -> Gate (suspended)
//! approve:   Synthesis -> Complete (artifact produced)
//! reject:    Teardown  -> Complete (no artifact)
//! ```
//!
//! Every control operation is infallible. A call that does not fit the
//! current state (starting while a run is in progress, deciding a gate
//! that is not pending) is logged at `debug!` and ignored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use synoptic_store::ArtifactStore;
use tokio::sync::broadcast;
use tracing::{debug, warn, Instrument};
use uuid::Uuid;

use crate::approval::{ApprovalGate, ApprovalRequest, Decision};
use crate::config::EngineConfig;
use crate::domain::{
    Agent, AgentId, AgentRegistry, AgentStatus, EventLog, LogEntry, LogSource, Severity,
};
use crate::events::{EngineEvent, EventBus, NotificationLevel};
use crate::intent::{derive_intent, Intent};
use crate::metrics::METRICS;
use crate::obs;
use crate::recording::{SnapshotHistory, SnapshotRecorder};
use crate::synthesis::{BriefingRequest, SimulatedSynthesizer, Synthesizer};

const WEATHER_OBSERVATION: &str = "Retrieved: 28°C, Haze, Humidity 72%";

/// Workflow phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Analysis,
    Delegation,
    Collection,
    Gate,
    Synthesis,
    Teardown,
    Complete,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Approved and a briefing was produced.
    Completed,
    /// Rejected at the approval gate.
    Rejected,
    /// Approved, but synthesis failed.
    Failed,
}

/// The briefing produced by a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingArtifact {
    pub prompt: String,
    pub content: String,
    pub produced_at: DateTime<Utc>,
}

/// Transient state of one run.
#[derive(Debug, Clone)]
pub struct RunSession {
    run_id: Uuid,
    prompt: String,
    phase: RunPhase,
    intent: Option<Intent>,
    gate: Option<ApprovalGate>,
    outcome: Option<RunOutcome>,
    started_at: DateTime<Utc>,
}

impl RunSession {
    fn new(prompt: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            prompt: prompt.to_string(),
            phase: RunPhase::Analysis,
            intent: None,
            gate: None,
            outcome: None,
            started_at: Utc::now(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn intent(&self) -> Option<&Intent> {
        self.intent.as_ref()
    }

    pub fn gate(&self) -> Option<&ApprovalGate> {
        self.gate.as_ref()
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// A session is in progress until it reaches an outcome.
    pub fn is_in_progress(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn awaiting_approval(&self) -> bool {
        self.gate.as_ref().is_some_and(ApprovalGate::is_pending)
    }
}

/// Drives runs over the live agent registry and event log.
pub struct RunController {
    config: EngineConfig,
    agents: AgentRegistry,
    log: EventLog,
    recorder: SnapshotRecorder,
    session: Option<RunSession>,
    artifact: Option<BriefingArtifact>,
    synthesizer: Arc<dyn Synthesizer>,
    store: Option<Arc<dyn ArtifactStore>>,
    bus: EventBus,
}

impl RunController {
    /// A controller with simulated synthesis and no artifact store.
    pub fn new(config: EngineConfig) -> Self {
        let synthesizer = Arc::new(SimulatedSynthesizer::new(config.rng_seed));
        Self {
            config,
            agents: AgentRegistry::new(),
            log: EventLog::booted(),
            recorder: SnapshotRecorder::new(),
            session: None,
            artifact: None,
            synthesizer,
            store: None,
            bus: EventBus::default(),
        }
    }

    /// Replace the synthesizer used after approval.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Save every produced briefing into `store`.
    pub fn with_store(mut self, store: Arc<dyn ArtifactStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.bus.subscribe()
    }

    /// Live agent state.
    pub fn agents(&self) -> &[Agent] {
        self.agents.agents()
    }

    /// Live event log entries.
    pub fn logs(&self) -> &[LogEntry] {
        self.log.entries()
    }

    pub fn session(&self) -> Option<&RunSession> {
        self.session.as_ref()
    }

    pub fn artifact(&self) -> Option<&BriefingArtifact> {
        self.artifact.as_ref()
    }

    pub fn snapshot_count(&self) -> usize {
        self.recorder.len()
    }

    /// Frozen copy of the current run's snapshots.
    pub fn history(&self) -> SnapshotHistory {
        self.recorder.history()
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(RunSession::is_in_progress)
    }

    pub fn awaiting_approval(&self) -> bool {
        self.session.as_ref().is_some_and(RunSession::awaiting_approval)
    }

    /// Start a run for `prompt` and advance it to the approval gate.
    ///
    /// Ignored while another run is in progress. Starting a run discards
    /// the previous session, its snapshots, and its artifact.
    pub async fn start_run(&mut self, prompt: &str) {
        if self.is_running() {
            debug!("start_run ignored: a run is already in progress");
            return;
        }

        let session = RunSession::new(prompt);
        let run_id = session.run_id;
        self.recorder.clear();
        self.artifact = None;
        self.agents.reset();
        self.session = Some(session);

        METRICS.inc_runs_started();
        obs::emit_run_started(&run_id, prompt);
        self.bus.publish(EngineEvent::RunStarted { run_id });

        self.advance_to_gate(prompt)
            .instrument(obs::run_span(&run_id))
            .await;
    }

    /// Approve the pending gate and synthesize the briefing.
    ///
    /// Ignored unless the gate is pending.
    pub async fn approve(&mut self) {
        let Some(run_id) = self.decide(Decision::Approve) else {
            return;
        };
        self.synthesize().instrument(obs::run_span(&run_id)).await;
    }

    /// Reject the pending gate and terminate the run.
    ///
    /// Ignored unless the gate is pending.
    pub async fn reject(&mut self) {
        let Some(run_id) = self.decide(Decision::Reject) else {
            return;
        };
        self.tear_down().instrument(obs::run_span(&run_id)).await;
    }

    /// Surface a failed external call: append a terminal ERROR entry and
    /// notify subscribers. Recorded snapshots are left untouched.
    pub fn report_failure(&mut self, detail: &str) {
        let message = format!("Briefing generation failed: {detail}");
        self.log
            .append(LogSource::Orchestrator, Severity::Error, message.clone());
        self.bus.publish(EngineEvent::Notification {
            level: NotificationLevel::Error,
            message,
        });
    }

    async fn advance_to_gate(&mut self, prompt: &str) {
        self.log.append(
            LogSource::User,
            Severity::Input,
            format!("Request received: \"{prompt}\""),
        );
        self.snapshot();

        // Analysis
        self.agents
            .set(AgentId::Orchestrator, AgentStatus::Active, Some("Parsing Intent"));
        tokio::time::sleep(self.config.analysis_delay()).await;
        let intent = derive_intent(prompt, &self.config.default_location);
        self.log.append(
            LogSource::Orchestrator,
            Severity::Info,
            format!("Detected Location: {}, India", intent.location),
        );
        self.log.append(
            LogSource::Orchestrator,
            Severity::Info,
            format!("Focus Category: {}", intent.category),
        );
        self.log.append(
            LogSource::Orchestrator,
            Severity::Info,
            "Delegating tasks to Weather & News agents",
        );
        let category = intent.category;
        if let Some(session) = self.session.as_mut() {
            session.intent = Some(intent);
        }
        self.snapshot();

        // Delegation
        self.set_phase(RunPhase::Delegation);
        self.agents
            .set(AgentId::Orchestrator, AgentStatus::Active, Some("Delegating"));
        self.agents
            .set(AgentId::Weather, AgentStatus::Active, Some("Fetching Weather data"));
        self.agents
            .set(AgentId::News, AgentStatus::Active, Some("Scraping headlines"));
        self.snapshot();
        tokio::time::sleep(self.config.delegation_delay()).await;

        // Collection
        self.set_phase(RunPhase::Collection);
        self.log
            .append(LogSource::Weather, Severity::Success, WEATHER_OBSERVATION);
        self.agents.set(AgentId::Weather, AgentStatus::Idle, None);
        self.snapshot();

        tokio::time::sleep(self.config.collection_stagger()).await;
        self.log.append(
            LogSource::News,
            Severity::Success,
            format!(
                "Retrieved 5 top {} stories",
                category.to_string().to_lowercase()
            ),
        );
        self.agents.set(AgentId::News, AgentStatus::Idle, None);
        self.snapshot();

        // Gate
        self.set_phase(RunPhase::Gate);
        self.agents
            .set(AgentId::Orchestrator, AgentStatus::Active, Some("Pending Approval"));
        self.log.append(
            LogSource::Orchestrator,
            Severity::Warn,
            "Sensitive content detected. Requesting human review.",
        );
        let request = ApprovalRequest::publish_daily_briefing();
        if let Some(session) = self.session.as_mut() {
            obs::emit_gate_raised(&session.run_id, &request.action);
            session.gate = Some(ApprovalGate::raise(request, Utc::now()));
        }
        self.snapshot();
        self.bus.publish(EngineEvent::ApprovalRequested);
    }

    /// Apply `decision` to the pending gate, returning the run id on success.
    fn decide(&mut self, decision: Decision) -> Option<Uuid> {
        let Some(session) = self.session.as_mut() else {
            debug!(?decision, "decision ignored: no run has started");
            return None;
        };
        let Some(gate) = session.gate.as_mut() else {
            debug!(?decision, "decision ignored: approval gate not raised yet");
            return None;
        };
        let Some(state) = gate.decide(decision, Utc::now()) else {
            debug!(?decision, state = ?gate.state(), "decision ignored: gate already decided");
            return None;
        };
        obs::emit_gate_decided(&session.run_id, state);
        Some(session.run_id)
    }

    async fn synthesize(&mut self) {
        self.log.append(
            LogSource::User,
            Severity::Action,
            "Human Operator APPROVED workflow.",
        );
        self.snapshot();

        self.set_phase(RunPhase::Synthesis);
        self.agents
            .set(AgentId::Orchestrator, AgentStatus::Active, Some("Synthesizing"));
        self.log.append(
            LogSource::Orchestrator,
            Severity::Info,
            "Compiling executive summary...",
        );
        self.snapshot();

        tokio::time::sleep(self.config.synthesis_delay()).await;

        let Some(request) = self.briefing_request() else {
            return;
        };
        match self.synthesizer.synthesize(&request).await {
            Ok(content) => {
                self.log.append(
                    LogSource::Orchestrator,
                    Severity::Success,
                    "Briefing generated successfully",
                );
                self.agents.set(AgentId::Orchestrator, AgentStatus::Idle, None);
                self.artifact = Some(BriefingArtifact {
                    prompt: request.prompt.clone(),
                    content,
                    produced_at: Utc::now(),
                });
                self.snapshot();
                self.save_artifact().await;
                self.bus.publish(EngineEvent::Notification {
                    level: NotificationLevel::Success,
                    message: "Briefing generated successfully!".to_string(),
                });
                self.finish(RunOutcome::Completed);
            }
            Err(e) => {
                if let Some(session) = self.session.as_ref() {
                    obs::emit_backend_failed(&session.run_id, &e);
                }
                self.report_failure(&e.to_string());
                self.agents.set(AgentId::Orchestrator, AgentStatus::Idle, None);
                self.snapshot();
                self.finish(RunOutcome::Failed);
            }
        }
    }

    async fn tear_down(&mut self) {
        self.log.append(
            LogSource::User,
            Severity::Action,
            "Human Operator REJECTED workflow.",
        );
        self.set_phase(RunPhase::Teardown);
        self.agents.set(
            AgentId::Orchestrator,
            AgentStatus::Error,
            Some("Workflow Terminated by User"),
        );
        self.log
            .append(LogSource::Orchestrator, Severity::Error, "Process aborted.");
        self.snapshot();

        tokio::time::sleep(self.config.teardown_delay()).await;
        self.agents.set(AgentId::Orchestrator, AgentStatus::Idle, None);
        self.snapshot();
        self.finish(RunOutcome::Rejected);
    }

    fn briefing_request(&self) -> Option<BriefingRequest> {
        let session = self.session.as_ref()?;
        let intent = session.intent.clone().unwrap_or_else(|| {
            derive_intent(&session.prompt, &self.config.default_location)
        });
        Some(BriefingRequest {
            prompt: session.prompt.clone(),
            intent,
        })
    }

    async fn save_artifact(&self) {
        let (Some(store), Some(artifact)) = (self.store.clone(), self.artifact.as_ref()) else {
            return;
        };
        match store.save(&artifact.prompt, &artifact.content).await {
            Ok(saved) => debug!(id = %saved.id, title = %saved.title, "briefing saved"),
            Err(e) => {
                warn!(error = %e, "failed to save briefing");
                self.bus.publish(EngineEvent::Notification {
                    level: NotificationLevel::Error,
                    message: format!("Failed to save briefing: {e}"),
                });
            }
        }
    }

    fn set_phase(&mut self, phase: RunPhase) {
        if let Some(session) = self.session.as_mut() {
            debug!(from = ?session.phase, to = ?phase, "phase advanced");
            session.phase = phase;
        }
    }

    fn snapshot(&mut self) {
        let index = self.recorder.record(&self.agents, &self.log);
        METRICS.inc_snapshots();
        if let Some(session) = self.session.as_ref() {
            obs::emit_snapshot_recorded(&session.run_id, index);
        }
        self.bus.publish(EngineEvent::SnapshotRecorded { index });
    }

    fn finish(&mut self, outcome: RunOutcome) {
        let snapshots = self.recorder.len();
        if let Some(session) = self.session.as_mut() {
            session.phase = RunPhase::Complete;
            session.outcome = Some(outcome);
            obs::emit_run_finished(&session.run_id, outcome, snapshots);
        }
        self.bus.publish(EngineEvent::RunFinished { outcome });
    }
}
