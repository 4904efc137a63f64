//! Global atomic counters for Synoptic observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. at the end of a run).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters: no allocations, no locking.
pub struct Metrics {
    runs_started: AtomicU64,
    snapshots_recorded: AtomicU64,
    replays_entered: AtomicU64,
    autoplay_ticks: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            runs_started: AtomicU64::new(0),
            snapshots_recorded: AtomicU64::new(0),
            replays_entered: AtomicU64::new(0),
            autoplay_ticks: AtomicU64::new(0),
        }
    }

    /// Increment the runs-started counter by one.
    pub fn inc_runs_started(&self) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "runs_started", "counter incremented");
    }

    /// Increment the snapshots-recorded counter by one.
    pub fn inc_snapshots(&self) {
        self.snapshots_recorded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "snapshots_recorded", "counter incremented");
    }

    /// Increment the replays-entered counter by one.
    pub fn inc_replays(&self) {
        self.replays_entered.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "replays_entered", "counter incremented");
    }

    /// Increment the autoplay-ticks counter by one.
    pub fn inc_autoplay_ticks(&self) {
        self.autoplay_ticks.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "autoplay_ticks", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    ///
    /// Call this at natural boundaries (end of a run, CLI exit)
    /// rather than on every increment.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            runs_started = self.runs_started(),
            snapshots_recorded = self.snapshots_recorded(),
            replays_entered = self.replays_entered(),
            autoplay_ticks = self.autoplay_ticks(),
        );
    }

    /// Read the current runs-started count.
    pub fn runs_started(&self) -> u64 {
        self.runs_started.load(Ordering::Relaxed)
    }

    /// Read the current snapshots-recorded count.
    pub fn snapshots_recorded(&self) -> u64 {
        self.snapshots_recorded.load(Ordering::Relaxed)
    }

    /// Read the current replays-entered count.
    pub fn replays_entered(&self) -> u64 {
        self.replays_entered.load(Ordering::Relaxed)
    }

    /// Read the current autoplay-ticks count.
    pub fn autoplay_ticks(&self) -> u64 {
        self.autoplay_ticks.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.runs_started.store(0, Ordering::Relaxed);
        self.snapshots_recorded.store(0, Ordering::Relaxed);
        self.replays_entered.store(0, Ordering::Relaxed);
        self.autoplay_ticks.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_increment() {
        let m = Metrics::new();
        assert_eq!(m.runs_started(), 0);
        m.inc_runs_started();
        m.inc_runs_started();
        assert_eq!(m.runs_started(), 2);

        m.inc_snapshots();
        assert_eq!(m.snapshots_recorded(), 1);

        m.inc_replays();
        m.inc_autoplay_ticks();
        m.inc_autoplay_ticks();
        assert_eq!(m.replays_entered(), 1);
        assert_eq!(m.autoplay_ticks(), 2);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.inc_runs_started();
        m.inc_snapshots();
        m.inc_replays();
        m.inc_autoplay_ticks();
        m.reset();
        assert_eq!(m.runs_started(), 0);
        assert_eq!(m.snapshots_recorded(), 0);
        assert_eq!(m.replays_entered(), 0);
        assert_eq!(m.autoplay_ticks(), 0);
    }
}
