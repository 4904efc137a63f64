//! Structured observability hooks for run and replay lifecycle events.
//!
//! This module provides:
//! - Run-scoped tracing spans via [`run_span`]
//! - Emission functions for key lifecycle events: start, snapshot, gate, finish, replay
//!
//! Events are emitted at `info!` level (filter with `RUST_LOG`).

use tracing::info;
use uuid::Uuid;

use crate::approval::GateState;
use crate::controller::RunOutcome;

/// Span tagged with the run id.
///
/// Attach it to a run's async work with [`tracing::Instrument`] so every
/// event emitted while the run advances carries the `run_id` field.
///
/// # Example
///
/// ```ignore
/// controller.advance_to_gate(prompt).instrument(run_span(&run_id)).await;
/// ```
pub fn run_span(run_id: &Uuid) -> tracing::Span {
    tracing::info_span!("synoptic.run", run_id = %run_id)
}

/// Emit event: run started for a prompt.
pub fn emit_run_started(run_id: &Uuid, prompt: &str) {
    info!(event = "run.started", run_id = %run_id, prompt = %prompt);
}

/// Emit event: snapshot appended to the run's history.
pub fn emit_snapshot_recorded(run_id: &Uuid, index: usize) {
    info!(event = "snapshot.recorded", run_id = %run_id, index = index);
}

/// Emit event: approval gate raised, run suspended.
pub fn emit_gate_raised(run_id: &Uuid, action: &str) {
    info!(event = "gate.raised", run_id = %run_id, action = %action);
}

/// Emit event: approval gate decided.
pub fn emit_gate_decided(run_id: &Uuid, state: GateState) {
    info!(event = "gate.decided", run_id = %run_id, state = ?state);
}

/// Emit event: run reached a terminal outcome.
pub fn emit_run_finished(run_id: &Uuid, outcome: RunOutcome, snapshots: usize) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        outcome = ?outcome,
        snapshots = snapshots,
    );
}

/// Emit event: replay mode entered over a history of `len` snapshots.
pub fn emit_replay_entered(len: usize) {
    info!(event = "replay.entered", len = len);
}

/// Emit event: replay mode exited.
pub fn emit_replay_exited(index: usize) {
    info!(event = "replay.exited", index = index);
}

/// Emit event: backend collaborator failed (warning level).
pub fn emit_backend_failed(run_id: &Uuid, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "backend.failed", run_id = %run_id, error = %error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        // Just ensure entering a run span doesn't panic
        let _entered = run_span(&Uuid::new_v4()).entered();
    }
}
