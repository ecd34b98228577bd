//! Task outcome value objects

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::worker::value_objects::WorkerId;

/// Why one subject's execution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ReasoningBackendUnavailable,
    ToolGatewayUnavailable,
    IterationLimitExceeded,
    MalformedDecision,
    Timeout,
    Cancelled,
    WorkerPanicked,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ReasoningBackendUnavailable => "reasoning_backend_unavailable",
            ErrorKind::ToolGatewayUnavailable => "tool_gateway_unavailable",
            ErrorKind::IterationLimitExceeded => "iteration_limit_exceeded",
            ErrorKind::MalformedDecision => "malformed_decision",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::WorkerPanicked => "worker_panicked",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of running one subject on one worker. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub subject: String,
    pub worker_id: Option<WorkerId>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub iterations: usize,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl TaskOutcome {
    pub fn success(subject: impl Into<String>, result_text: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            worker_id: None,
            success: true,
            result_text: Some(result_text.into()),
            error_kind: None,
            error_message: None,
            iterations: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn failure(subject: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            worker_id: None,
            success: false,
            result_text: None,
            error_kind: Some(kind),
            error_message: Some(message.into()),
            iterations: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_worker(mut self, worker_id: WorkerId) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }
}

pub(crate) mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}
