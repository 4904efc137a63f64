//! Dashboard facade over the run controller and replay engine.
//!
//! Reads go through [`Dashboard::displayed_agents`] and
//! [`Dashboard::displayed_logs`], which resolve to the replay cursor's
//! snapshot while replay is active and to live state otherwise. Nothing is
//! cached across the mode switch.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::controller::{BriefingArtifact, RunController};
use crate::domain::{Agent, LogEntry, Result, SynopticError};
use crate::events::EngineEvent;
use crate::export::{self, Clipboard};
use crate::replay::{ReplayCursor, ReplaySession};

/// Which state the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Live,
    Replay,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub mode: DisplayMode,
    pub agents: Vec<Agent>,
    pub logs: Vec<LogEntry>,
    pub status_line: String,
    pub replay: Option<ReplayCursor>,
    pub snapshot_count: usize,
    pub awaiting_approval: bool,
    pub has_artifact: bool,
}

pub struct Dashboard {
    controller: RunController,
    replay: Option<ReplaySession>,
}

impl Dashboard {
    pub fn new(controller: RunController) -> Self {
        Self {
            controller,
            replay: None,
        }
    }

    pub fn controller(&self) -> &RunController {
        &self.controller
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.controller.subscribe()
    }

    pub fn mode(&self) -> DisplayMode {
        if self.replay.is_some() {
            DisplayMode::Replay
        } else {
            DisplayMode::Live
        }
    }

    pub fn replay(&self) -> Option<&ReplaySession> {
        self.replay.as_ref()
    }

    /// Start a run. Ignored while replaying.
    pub async fn start_run(&mut self, prompt: &str) {
        if self.replay.is_some() {
            debug!("start_run ignored: replay is active");
            return;
        }
        self.controller.start_run(prompt).await;
    }

    pub async fn approve(&mut self) {
        self.controller.approve().await;
    }

    pub async fn reject(&mut self) {
        self.controller.reject().await;
    }

    /// Enter replay over the current run's snapshots.
    ///
    /// Ignored when already replaying, while a run is in progress, or when
    /// nothing has been recorded.
    pub fn enter_replay(&mut self) {
        if self.replay.is_some() {
            return;
        }
        if self.controller.is_running() {
            debug!("enter_replay ignored: a run is in progress");
            return;
        }
        self.replay = ReplaySession::enter(
            self.controller.history(),
            self.controller.config().autoplay_period(),
            self.controller.event_bus().clone(),
        );
        if self.replay.is_none() {
            debug!("enter_replay ignored: no snapshots recorded");
        }
    }

    pub fn exit_replay(&mut self) {
        if let Some(session) = self.replay.take() {
            session.exit();
        }
    }

    pub fn step(&mut self, delta: isize) {
        if let Some(session) = self.replay.as_mut() {
            session.step(delta);
        }
    }

    pub fn scrub(&mut self, index: isize) {
        if let Some(session) = self.replay.as_mut() {
            session.scrub(index);
        }
    }

    pub fn toggle_play(&mut self) {
        if let Some(session) = self.replay.as_mut() {
            session.toggle_play();
        }
    }

    pub fn displayed_agents(&self) -> &[Agent] {
        match self.replay.as_ref().and_then(ReplaySession::current) {
            Some(snapshot) => &snapshot.agents,
            None => self.controller.agents(),
        }
    }

    pub fn displayed_logs(&self) -> &[LogEntry] {
        match self.replay.as_ref().and_then(ReplaySession::current) {
            Some(snapshot) => &snapshot.logs,
            None => self.controller.logs(),
        }
    }

    /// Latest result artifact, `None` until a run completes with one.
    pub fn artifact(&self) -> Option<&BriefingArtifact> {
        self.controller.artifact()
    }

    pub fn status_line(&self) -> String {
        if let Some(session) = self.replay.as_ref() {
            format!("Replaying State {} / {}", session.index() + 1, session.len())
        } else if self.controller.awaiting_approval() {
            "Awaiting Human Input...".to_string()
        } else if self.controller.is_running() {
            "Orchestration in progress...".to_string()
        } else {
            "System Idle".to_string()
        }
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            mode: self.mode(),
            agents: self.displayed_agents().to_vec(),
            logs: self.displayed_logs().to_vec(),
            status_line: self.status_line(),
            replay: self.replay.as_ref().map(ReplaySession::cursor),
            snapshot_count: self.controller.snapshot_count(),
            awaiting_approval: self.controller.awaiting_approval(),
            has_artifact: self.controller.artifact().is_some(),
        }
    }

    /// SHA-256 hex digest of the current run's snapshot history.
    pub fn history_digest(&self) -> Result<String> {
        self.controller.history().digest()
    }

    pub fn copy_artifact(&self, clipboard: &mut dyn Clipboard) -> Result<()> {
        let artifact = self.artifact().ok_or(SynopticError::NoArtifact)?;
        clipboard.write_text(&artifact.content)?;
        Ok(())
    }

    pub async fn download_artifact(&self, dir: &Path) -> Result<PathBuf> {
        let artifact = self.artifact().ok_or(SynopticError::NoArtifact)?;
        let path = export::download_artifact(dir, &artifact.content, Utc::now()).await?;
        Ok(path)
    }
}
