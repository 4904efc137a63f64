//! The approval state machine: `Pending -> Approved | Rejected`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::ApprovalRequest;

/// State of an approval gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Waiting for an operator decision.
    Pending,
    /// Approved; the run may continue to synthesis.
    Approved,
    /// Rejected; the run terminates without an artifact.
    Rejected,
}

impl GateState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// An operator decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn target_state(self) -> GateState {
        match self {
            Decision::Approve => GateState::Approved,
            Decision::Reject => GateState::Rejected,
        }
    }
}

/// A raised approval gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalGate {
    state: GateState,
    request: ApprovalRequest,
    raised_at: DateTime<Utc>,
    decided_at: Option<DateTime<Utc>>,
}

impl ApprovalGate {
    /// Raise a new gate in the `Pending` state.
    pub fn raise(request: ApprovalRequest, now: DateTime<Utc>) -> Self {
        Self {
            state: GateState::Pending,
            request,
            raised_at: now,
            decided_at: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == GateState::Pending
    }

    pub fn request(&self) -> &ApprovalRequest {
        &self.request
    }

    pub fn raised_at(&self) -> DateTime<Utc> {
        self.raised_at
    }

    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Apply a decision.
    ///
    /// Returns the new state when the gate was pending, `None` otherwise.
    /// A gate decides at most once.
    pub fn decide(&mut self, decision: Decision, now: DateTime<Utc>) -> Option<GateState> {
        if !self.is_pending() {
            return None;
        }
        self.state = decision.target_state();
        self.decided_at = Some(now);
        Some(self.state)
    }
}
