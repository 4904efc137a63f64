//! Human-in-the-loop approval gate.
//!
//! The run controller raises a gate when it reaches the final step. The
//! gate stays `Pending` until an operator approves or rejects; both
//! outcomes are terminal for the run, and any further decision is a no-op.

pub mod gate;
pub mod request;

pub use gate::{ApprovalGate, Decision, GateState};
pub use request::ApprovalRequest;
