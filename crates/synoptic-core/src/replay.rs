//! Time-travel replay over a finished run's snapshot history.
//!
//! A [`ReplaySession`] is strictly read-only relative to live state: it owns
//! a frozen [`SnapshotHistory`] and a [`ReplayCursor`] into it. Navigation
//! clamps instead of erroring. Autoplay runs on a background tokio task
//! held by an [`AutoplayHandle`], which aborts the task when dropped, so
//! toggling play off, exiting replay, and dropping the session all cancel
//! the timer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::events::{EngineEvent, EventBus};
use crate::metrics::METRICS;
use crate::obs;
use crate::recording::{Snapshot, SnapshotHistory};

/// Position within a snapshot history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplayCursor {
    pub index: usize,
    pub playing: bool,
}

impl ReplayCursor {
    /// One autoplay tick against a history whose final index is `last`.
    ///
    /// Advances by one and stops playback on reaching `last`. Returns
    /// whether anything changed.
    pub fn tick(&mut self, last: usize) -> bool {
        if !self.playing {
            return false;
        }
        if self.index >= last {
            self.playing = false;
            return true;
        }
        self.index += 1;
        if self.index >= last {
            self.playing = false;
        }
        true
    }

    fn move_to(&mut self, target: isize, last: usize) -> bool {
        let clamped = clamp_index(target, last);
        let moved = clamped != self.index;
        self.index = clamped;
        moved
    }
}

fn clamp_index(target: isize, last: usize) -> usize {
    if target <= 0 {
        0
    } else {
        (target as usize).min(last)
    }
}

/// Cancellable autoplay timer task.
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct AutoplayHandle {
    task: JoinHandle<()>,
}

impl AutoplayHandle {
    fn spawn(
        cursor: Arc<Mutex<ReplayCursor>>,
        last: usize,
        period: Duration,
        bus: EventBus,
    ) -> Option<Self> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, "autoplay unavailable outside a tokio runtime");
                return None;
            }
        };

        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let cursor = {
                    let mut guard = lock(&cursor);
                    if !guard.tick(last) {
                        break;
                    }
                    *guard
                };
                METRICS.inc_autoplay_ticks();
                bus.publish(EngineEvent::ReplayMoved {
                    index: cursor.index,
                    playing: cursor.playing,
                });
                if !cursor.playing {
                    break;
                }
            }
            debug!("autoplay finished");
        });
        Some(Self { task })
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutoplayHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn lock(cursor: &Mutex<ReplayCursor>) -> MutexGuard<'_, ReplayCursor> {
    cursor.lock().unwrap_or_else(|e| e.into_inner())
}

/// Read-only navigation over a snapshot history.
#[derive(Debug)]
pub struct ReplaySession {
    history: SnapshotHistory,
    last: usize,
    cursor: Arc<Mutex<ReplayCursor>>,
    autoplay: Option<AutoplayHandle>,
    period: Duration,
    bus: EventBus,
}

impl ReplaySession {
    /// Enter replay at index 0, paused. `None` when `history` is empty.
    pub fn enter(history: SnapshotHistory, period: Duration, bus: EventBus) -> Option<Self> {
        let last = history.last_index()?;
        METRICS.inc_replays();
        obs::emit_replay_entered(history.len());
        bus.publish(EngineEvent::ReplayEntered { len: history.len() });
        Some(Self {
            history,
            last,
            cursor: Arc::new(Mutex::new(ReplayCursor::default())),
            autoplay: None,
            period: period.max(Duration::from_millis(1)),
            bus,
        })
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.last
    }

    pub fn cursor(&self) -> ReplayCursor {
        *lock(&self.cursor)
    }

    pub fn index(&self) -> usize {
        self.cursor().index
    }

    pub fn is_playing(&self) -> bool {
        self.cursor().playing
    }

    /// Snapshot under the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.history.get(self.index())
    }

    /// Move by `delta`, clamped to the history bounds.
    pub fn step(&mut self, delta: isize) {
        let target = (self.index() as isize).saturating_add(delta);
        self.scrub(target);
    }

    /// Jump to `target`, clamped to the history bounds.
    ///
    /// Landing on the final index while playing stops playback.
    pub fn scrub(&mut self, target: isize) {
        let cursor = {
            let mut guard = lock(&self.cursor);
            if !guard.move_to(target, self.last) {
                return;
            }
            if guard.playing && guard.index == self.last {
                guard.playing = false;
            }
            *guard
        };
        if !cursor.playing {
            self.autoplay = None;
        }
        self.publish_moved(cursor);
    }

    /// Start or stop autoplay.
    ///
    /// Starting at the final index does nothing; there is nowhere to go.
    pub fn toggle_play(&mut self) {
        let cursor = {
            let mut guard = lock(&self.cursor);
            if guard.playing {
                guard.playing = false;
            } else if guard.index < self.last {
                guard.playing = true;
            } else {
                debug!("toggle_play ignored: already at the final snapshot");
                return;
            }
            *guard
        };

        if cursor.playing {
            self.autoplay = AutoplayHandle::spawn(
                Arc::clone(&self.cursor),
                self.last,
                self.period,
                self.bus.clone(),
            );
            if self.autoplay.is_none() {
                lock(&self.cursor).playing = false;
                return;
            }
        } else {
            self.autoplay = None;
        }
        self.publish_moved(cursor);
    }

    /// Advance one autoplay tick by hand. Returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let cursor = {
            let mut guard = lock(&self.cursor);
            if !guard.tick(self.last) {
                return false;
            }
            *guard
        };
        if !cursor.playing {
            self.autoplay = None;
        }
        self.publish_moved(cursor);
        true
    }

    /// Whether a timer task is currently scheduled.
    pub fn has_timer(&self) -> bool {
        self.autoplay.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Leave replay, cancelling any running timer.
    pub fn exit(mut self) {
        self.autoplay = None;
        obs::emit_replay_exited(self.index());
        self.bus.publish(EngineEvent::ReplayExited);
    }

    fn publish_moved(&self, cursor: ReplayCursor) {
        self.bus.publish(EngineEvent::ReplayMoved {
            index: cursor.index,
            playing: cursor.playing,
        });
    }
}
