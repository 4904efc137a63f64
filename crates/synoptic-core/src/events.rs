//! State-change notifications.
//!
//! The engine publishes an [`EngineEvent`] after every observable change.
//! Presentation layers subscribe and redraw from the dashboard view; the
//! engine itself has no rendering concerns.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::controller::RunOutcome;

const DEFAULT_CAPACITY: usize = 256;

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Something observable changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    RunStarted { run_id: Uuid },
    SnapshotRecorded { index: usize },
    ApprovalRequested,
    RunFinished { outcome: RunOutcome },
    Notification {
        level: NotificationLevel,
        message: String,
    },
    ReplayEntered { len: usize },
    ReplayMoved { index: usize, playing: bool },
    ReplayExited,
}

/// Broadcast fan-out of [`EngineEvent`]s.
///
/// Publishing with no subscribers is not an error. Slow subscribers that
/// lag behind the channel capacity miss the oldest events.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: EngineEvent) {
        // Err only means nobody is listening.
        let _ = self.tx.send(event);
    }
}
