//! Agent loop configuration from TOML (`[agent]` section)

use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_iterations = 30
/// tool_retries = 2
/// retry_backoff_ms = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Maximum reasoning calls per task
    pub max_iterations: usize,
    /// Extra attempts after a gateway transport failure
    pub tool_retries: usize,
    /// Base delay between gateway retries
    pub retry_backoff_ms: u64,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            tool_retries: 2,
            retry_backoff_ms: 500,
        }
    }
}
