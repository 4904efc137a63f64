//! Synoptic Core Library
//!
//! Simulated multi-agent briefing orchestration: a run controller that
//! sequences agent phases and suspends at a human approval gate, a snapshot
//! recorder, and a replay engine for time-travel review of finished runs.

pub mod approval;
pub mod backend;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod domain;
pub mod events;
pub mod export;
pub mod intent;
pub mod metrics;
pub mod obs;
pub mod recording;
pub mod replay;
pub mod synthesis;
pub mod telemetry;

pub use approval::{ApprovalGate, ApprovalRequest, Decision, GateState};

pub use backend::{
    BackendError, BackendResult, BriefingBackend, BriefingResponse, HealthStatus,
    HttpBriefingBackend,
};

pub use config::{BackendConfig, EngineConfig};

pub use controller::{BriefingArtifact, RunController, RunOutcome, RunPhase, RunSession};

pub use dashboard::{Dashboard, DashboardView, DisplayMode};

pub use domain::{
    Agent, AgentId, AgentRegistry, AgentStatus, EventLog, LogEntry, LogSource, Result, Severity,
    SynopticError,
};

pub use events::{EngineEvent, EventBus, NotificationLevel};

pub use export::{download_artifact, download_filename, Clipboard, ExportError, MemoryClipboard};

pub use intent::{derive_category, derive_intent, derive_location, Category, Intent};

pub use recording::{Snapshot, SnapshotHistory, SnapshotRecorder};

pub use replay::{AutoplayHandle, ReplayCursor, ReplaySession};

pub use telemetry::init_tracing;

pub use synthesis::{
    compose_briefing, BackendSynthesizer, BriefingRequest, SimulatedSynthesizer, Synthesizer,
    WeatherReading,
};

pub use synoptic_store::{
    ArtifactStore, BriefingId, JsonFileArtifactStore, SavedBriefing, StorageError, HISTORY_CAP,
};

/// Synoptic version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
