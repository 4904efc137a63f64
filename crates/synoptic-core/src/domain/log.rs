//! The append-only event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity tag of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Input,
    Action,
    Warn,
    Success,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Input => "INPUT",
            Severity::Action => "ACTION",
            Severity::Warn => "WARN",
            Severity::Success => "SUCCESS",
            Severity::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Which part of the system wrote an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogSource {
    System,
    User,
    Orchestrator,
    Weather,
    News,
}

impl std::fmt::Display for LogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogSource::System => "SYSTEM",
            LogSource::User => "USER",
            LogSource::Orchestrator => "ORCHESTRATOR",
            LogSource::Weather => "WEATHER",
            LogSource::News => "NEWS",
        };
        f.write_str(s)
    }
}

/// One immutable audit-trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub source: LogSource,
    pub severity: Severity,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {:<7} {}",
            self.timestamp.format("%H:%M:%S"),
            self.source,
            self.severity,
            self.message
        )
    }
}

/// Ordered, append-only sequence of [`LogEntry`] values.
///
/// Entries are never reordered, deduplicated, or edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log carrying the two boot entries shown before any run.
    pub fn booted() -> Self {
        let mut log = Self::new();
        log.append(LogSource::System, Severity::Info, "Synoptic OS v2.0 Initialized");
        log.append(
            LogSource::Orchestrator,
            Severity::Info,
            "Waiting for incoming briefing requests...",
        );
        log
    }

    /// Append an entry stamped with the current time.
    pub fn append(
        &mut self,
        source: LogSource,
        severity: Severity,
        message: impl Into<String>,
    ) -> &LogEntry {
        let idx = self.entries.len();
        self.entries.push(LogEntry {
            timestamp: Utc::now(),
            source,
            severity,
            message: message.into(),
        });
        &self.entries[idx]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Copy of the log's current extent.
    pub fn capture(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }
}
