//! Worker value objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of one worker slot (e.g. "agent-1").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Lifecycle state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Idle,
    /// Registered but its gateway has not answered a health check yet.
    #[default]
    Starting,
    Running,
    Error,
    Stopping,
}

impl WorkerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Idle => "idle",
            WorkerState::Starting => "starting",
            WorkerState::Running => "running",
            WorkerState::Error => "error",
            WorkerState::Stopping => "stopping",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            WorkerState::Idle => "🟢",
            WorkerState::Starting => "🟡",
            WorkerState::Running => "🔵",
            WorkerState::Error => "🔴",
            WorkerState::Stopping => "⚪",
        }
    }
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub worker_id: WorkerId,
    pub endpoint: String,
    pub state: WorkerState,
    pub assigned_subject: Option<String>,
    pub last_error: Option<String>,
    pub completed_tasks: u64,
    pub failed_tasks: u64,
    pub last_transition: DateTime<Utc>,
}

impl WorkerStatus {
    pub fn new(worker_id: WorkerId, endpoint: impl Into<String>) -> Self {
        Self {
            worker_id,
            endpoint: endpoint.into(),
            state: WorkerState::default(),
            assigned_subject: None,
            last_error: None,
            completed_tasks: 0,
            failed_tasks: 0,
            last_transition: Utc::now(),
        }
    }

    /// Move to `state`, stamping the transition time.
    pub fn transition(&mut self, state: WorkerState) {
        self.state = state;
        self.last_transition = Utc::now();
    }
}

/// Per-state worker counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub total: usize,
    pub idle: usize,
    pub running: usize,
    pub error: usize,
    pub starting: usize,
    pub stopping: usize,
}

impl PoolSummary {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a WorkerStatus>) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            summary.total += 1;
            match status.state {
                WorkerState::Idle => summary.idle += 1,
                WorkerState::Running => summary.running += 1,
                WorkerState::Error => summary.error += 1,
                WorkerState::Starting => summary.starting += 1,
                WorkerState::Stopping => summary.stopping += 1,
            }
        }
        summary
    }
}
