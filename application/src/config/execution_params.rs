//! Execution parameters: use case loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the agent
//! loop and the worker pool. These are application-layer concerns, not
//! domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution loop control parameters.
///
/// | Field | Used by |
/// |-------|---------|
/// | `max_iterations` | `AgentLoop` |
/// | `tool_retries`, `retry_backoff` | `AgentLoop` |
/// | `task_timeout` | `WorkerPool` |
/// | `default_count` | `CommandInterpreter` |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of reasoning calls per task.
    pub max_iterations: usize,
    /// Extra attempts after a gateway transport failure.
    pub tool_retries: usize,
    /// Base delay between gateway retries; attempt `n` waits `n * retry_backoff`.
    pub retry_backoff: Duration,
    /// Wall-clock limit for one subject's execution.
    pub task_timeout: Duration,
    /// Subjects to resolve when the command does not say how many.
    pub default_count: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            tool_retries: 2,
            retry_backoff: Duration::from_millis(500),
            task_timeout: Duration::from_secs(120),
            default_count: 5,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tool_retries(mut self, retries: usize) -> Self {
        self.tool_retries = retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Duration) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn with_default_count(mut self, count: usize) -> Self {
        self.default_count = count;
        self
    }
}
