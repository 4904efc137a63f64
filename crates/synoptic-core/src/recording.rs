//! Snapshot recording for time-travel replay.
//!
//! A [`SnapshotRecorder`] captures a structurally independent copy of the
//! agent registry and event log at each mutation point of a run. When the
//! run is over, [`SnapshotRecorder::history`] freezes the sequence into a
//! cheaply clonable [`SnapshotHistory`] for the replay engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{Agent, AgentRegistry, EventLog, LogEntry, Result};

/// State of every agent and the event log at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub agents: Vec<Agent>,
    pub logs: Vec<LogEntry>,
}

/// Growing sequence of snapshots for the current run.
///
/// No cap and no eviction; the controller clears it when a new run starts.
#[derive(Debug, Default)]
pub struct SnapshotRecorder {
    snapshots: Vec<Snapshot>,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a deep copy of `agents` and `logs`, returning its index.
    pub fn record(&mut self, agents: &AgentRegistry, logs: &EventLog) -> usize {
        self.snapshots.push(Snapshot {
            agents: agents.capture(),
            logs: logs.capture(),
        });
        self.snapshots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub(crate) fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Freeze the current sequence into an immutable, shareable history.
    pub fn history(&self) -> SnapshotHistory {
        SnapshotHistory(self.snapshots.iter().cloned().collect())
    }
}

/// Immutable snapshot sequence of a finished run.
#[derive(Debug, Clone)]
pub struct SnapshotHistory(Arc<[Snapshot]>);

impl SnapshotHistory {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.0.get(index)
    }

    /// Index of the final snapshot, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.0.iter()
    }

    /// SHA-256 hex digest of the serialized snapshot sequence.
    ///
    /// Two histories with identical content produce identical digests.
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&*self.0)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

impl From<Vec<Snapshot>> for SnapshotHistory {
    fn from(snapshots: Vec<Snapshot>) -> Self {
        SnapshotHistory(snapshots.into())
    }
}
