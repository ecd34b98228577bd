//! Worker pool configuration from TOML (`[pool]` section)

use serde::{Deserialize, Serialize};

/// Raw pool configuration from TOML
///
/// # Example
///
/// ```toml
/// [pool]
/// task_timeout_secs = 120
///
/// [[pool.workers]]
/// id = "agent-1"
/// endpoint = "http://localhost:3011"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePoolConfig {
    /// Wall-clock limit for one subject's execution
    pub task_timeout_secs: u64,
    /// Registered workers, in dispatch order
    pub workers: Vec<FileWorkerConfig>,
}

/// One worker: an id and the MCP endpoint of its browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWorkerConfig {
    pub id: String,
    pub endpoint: String,
}

/// Default MCP port of the first browser; worker `n` uses `BASE_MCP_PORT + n - 1`.
const BASE_MCP_PORT: u16 = 3011;
const DEFAULT_WORKERS: u16 = 5;

impl Default for FilePoolConfig {
    fn default() -> Self {
        Self {
            task_timeout_secs: 120,
            workers: (1..=DEFAULT_WORKERS)
                .map(|n| FileWorkerConfig {
                    id: format!("agent-{}", n),
                    endpoint: format!("http://localhost:{}", BASE_MCP_PORT + n - 1),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_workers() {
        let pool = FilePoolConfig::default();
        assert_eq!(pool.workers.len(), 5);
        assert_eq!(pool.workers[0].id, "agent-1");
        assert_eq!(pool.workers[4].endpoint, "http://localhost:3015");
    }

    #[test]
    fn test_workers_replace_defaults() {
        let toml_str = r#"
[pool]
task_timeout_secs = 30

[[pool.workers]]
id = "w1"
endpoint = "http://browser-1:3001"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pool.task_timeout_secs, 30);
        assert_eq!(config.pool.workers.len(), 1);
        assert_eq!(config.pool.workers[0].id, "w1");
    }
}
