//! Integration tests for replay navigation, autoplay timing, and isolation
//! from live state.

use std::time::Duration;

use synoptic_core::{
    AgentRegistry, Dashboard, DisplayMode, EngineConfig, EngineEvent, EventBus, EventLog,
    ReplaySession, RunController, SnapshotHistory, SnapshotRecorder,
};

const PERIOD: Duration = Duration::from_millis(1000);

fn history(len: usize) -> SnapshotHistory {
    let registry = AgentRegistry::new();
    let mut log = EventLog::new();
    let mut recorder = SnapshotRecorder::new();
    for i in 0..len {
        log.append(
            synoptic_core::LogSource::System,
            synoptic_core::Severity::Info,
            format!("entry {i}"),
        );
        recorder.record(&registry, &log);
    }
    recorder.history()
}

async fn finished_dashboard() -> Dashboard {
    let mut dashboard = Dashboard::new(RunController::new(
        EngineConfig::instant().with_rng_seed(11),
    ));
    dashboard.start_run("Evening update for Kolkata with sports news").await;
    dashboard.approve().await;
    dashboard
}

#[test]
fn scrub_clamps_to_bounds() {
    let mut session = ReplaySession::enter(history(6), PERIOD, EventBus::default()).unwrap();
    session.scrub(-5);
    assert_eq!(session.index(), 0);
    session.scrub(999);
    assert_eq!(session.index(), 5);
}

#[test]
fn step_at_boundaries_is_noop() {
    let bus = EventBus::default();
    let mut session = ReplaySession::enter(history(3), PERIOD, bus.clone()).unwrap();
    let mut rx = bus.subscribe();

    session.step(-1);
    assert_eq!(session.index(), 0);
    assert!(rx.try_recv().is_err());

    session.step(2);
    session.step(1);
    assert_eq!(session.index(), 2);
    assert_eq!(
        rx.try_recv().unwrap(),
        EngineEvent::ReplayMoved {
            index: 2,
            playing: false
        }
    );
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn autoplay_stops_at_last_index() {
    let mut session = ReplaySession::enter(history(4), PERIOD, EventBus::default()).unwrap();
    session.toggle_play();
    assert!(session.is_playing());

    tokio::time::sleep(PERIOD * 3 + PERIOD / 2).await;
    assert_eq!(session.index(), 3);
    assert!(!session.is_playing());

    // No wrap after further periods.
    tokio::time::sleep(PERIOD * 3).await;
    assert_eq!(session.index(), 3);
    assert!(!session.has_timer());
}

#[tokio::test(start_paused = true)]
async fn autoplay_advances_once_per_period() {
    let mut session = ReplaySession::enter(history(9), PERIOD, EventBus::default()).unwrap();
    session.toggle_play();

    tokio::time::sleep(PERIOD / 2).await;
    assert_eq!(session.index(), 0);
    tokio::time::sleep(PERIOD).await;
    assert_eq!(session.index(), 1);
    tokio::time::sleep(PERIOD).await;
    assert_eq!(session.index(), 2);
}

#[tokio::test(start_paused = true)]
async fn toggle_off_freezes_cursor() {
    let mut session = ReplaySession::enter(history(9), PERIOD, EventBus::default()).unwrap();
    session.toggle_play();
    tokio::time::sleep(PERIOD * 2 + PERIOD / 2).await;
    session.toggle_play();
    let paused_at = session.index();

    tokio::time::sleep(PERIOD * 4).await;
    assert_eq!(session.index(), paused_at);
    assert!(!session.is_playing());
}

#[tokio::test(start_paused = true)]
async fn scrub_to_last_during_autoplay_stops_immediately() {
    let bus = EventBus::default();
    let mut session = ReplaySession::enter(history(5), PERIOD, bus.clone()).unwrap();
    session.toggle_play();
    let mut rx = bus.subscribe();

    session.scrub(4);
    assert_eq!(session.index(), 4);
    assert!(!session.is_playing());
    assert_eq!(
        rx.try_recv().unwrap(),
        EngineEvent::ReplayMoved {
            index: 4,
            playing: false
        }
    );

    tokio::time::sleep(PERIOD * 3).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(session.index(), 4);
}

#[tokio::test(start_paused = true)]
async fn exit_cancels_timer() {
    let bus = EventBus::default();
    let mut session = ReplaySession::enter(history(9), PERIOD, bus.clone()).unwrap();
    session.toggle_play();
    tokio::time::sleep(PERIOD + PERIOD / 2).await;

    let mut rx = bus.subscribe();
    session.exit();
    tokio::time::sleep(PERIOD * 5).await;

    assert_eq!(rx.try_recv().unwrap(), EngineEvent::ReplayExited);
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn dropping_session_cancels_timer() {
    let bus = EventBus::default();
    let mut session = ReplaySession::enter(history(9), PERIOD, bus.clone()).unwrap();
    session.toggle_play();
    let mut rx = bus.subscribe();
    drop(session);

    tokio::time::sleep(PERIOD * 3).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn replay_cycle_leaves_live_state_unchanged() {
    let mut dashboard = finished_dashboard().await;
    let agents = serde_json::to_vec(dashboard.controller().agents()).unwrap();
    let logs = serde_json::to_vec(dashboard.controller().logs()).unwrap();
    let digest = dashboard.history_digest().unwrap();

    dashboard.enter_replay();
    assert_eq!(dashboard.mode(), DisplayMode::Replay);
    dashboard.scrub(3);
    dashboard.step(-10);
    dashboard.scrub(100);
    dashboard.exit_replay();

    assert_eq!(dashboard.mode(), DisplayMode::Live);
    assert_eq!(serde_json::to_vec(dashboard.controller().agents()).unwrap(), agents);
    assert_eq!(serde_json::to_vec(dashboard.controller().logs()).unwrap(), logs);
    assert_eq!(dashboard.history_digest().unwrap(), digest);
}

#[tokio::test]
async fn displayed_state_follows_cursor() {
    let mut dashboard = finished_dashboard().await;
    dashboard.enter_replay();

    let history = dashboard.controller().history();
    for index in [0usize, 4, 8] {
        dashboard.scrub(index as isize);
        let expected = history.get(index).unwrap();
        assert_eq!(dashboard.displayed_agents(), expected.agents.as_slice());
        assert_eq!(dashboard.displayed_logs(), expected.logs.as_slice());
    }

    let view = dashboard.view();
    assert_eq!(view.status_line, "Replaying State 9 / 9");
    assert_eq!(view.replay.unwrap().index, 8);
}
