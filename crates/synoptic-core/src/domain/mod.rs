//! Domain models for Synoptic.
//!
//! - `Agent` / `AgentRegistry`: the fixed set of simulated workers
//! - `LogEntry` / `EventLog`: the append-only audit trail of a run

pub mod agent;
pub mod error;
pub mod log;

pub use agent::{Agent, AgentId, AgentRegistry, AgentStatus};
pub use error::{Result, SynopticError};
pub use log::{EventLog, LogEntry, LogSource, Severity};
