//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to application types at
//! wiring time.

mod agent;
mod classifier;
mod pool;
mod reasoning;
mod server;

pub use agent::FileAgentConfig;
pub use classifier::{ClassifierKind, FileClassifierConfig};
pub use pool::{FilePoolConfig, FileWorkerConfig};
pub use reasoning::FileReasoningConfig;
pub use server::{FileCatalogConfig, FileLoggingConfig, FileServerConfig};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use swarm_application::ExecutionParams;
use swarm_domain::{ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Worker registry and per-task timeout
    pub pool: FilePoolConfig,
    /// Agent loop limits
    pub agent: FileAgentConfig,
    /// Reasoning backend selection
    pub reasoning: FileReasoningConfig,
    /// Command classification
    pub classifier: FileClassifierConfig,
    /// Subject catalog location
    pub catalog: FileCatalogConfig,
    /// HTTP/WebSocket listener
    pub server: FileServerConfig,
    /// Log file output
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors make the configuration unusable; warnings are logged and the
    /// affected setting falls back to its default.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Worker registry
        if self.pool.workers.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoWorkers,
                "pool.workers: at least one worker is required",
            ));
        }
        let mut seen = HashSet::new();
        for worker in &self.pool.workers {
            if !seen.insert(worker.id.as_str()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateWorkerId,
                    format!("pool.workers: duplicate worker id '{}'", worker.id),
                ));
            }
            if !(worker.endpoint.starts_with("http://") || worker.endpoint.starts_with("https://")) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEndpoint,
                    format!(
                        "pool.workers: endpoint '{}' of worker '{}' is not an http(s) URL",
                        worker.endpoint, worker.id
                    ),
                ));
            }
        }

        // 2. Limits
        if self.pool.task_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTaskTimeout,
                "pool.task_timeout_secs must be greater than zero",
            ));
        }
        if self.agent.max_iterations == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroIterationLimit,
                "agent.max_iterations must be greater than zero",
            ));
        }

        // 3. Classifier
        issues.extend(self.classifier.parse_kind().1);
        if !self.pool.workers.is_empty() && self.classifier.default_count > self.pool.workers.len() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::DefaultCountExceedsPool,
                format!(
                    "classifier.default_count ({}) exceeds the pool size ({}); commands will be clamped",
                    self.classifier.default_count,
                    self.pool.workers.len()
                ),
            ));
        }

        // 4. Reasoning backend
        if !self.reasoning.provider.eq_ignore_ascii_case("gemini") {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnsupportedProvider,
                format!(
                    "reasoning.provider: '{}' is not supported (expected \"gemini\")",
                    self.reasoning.provider
                ),
            ));
        }
        if !self.reasoning.api_key_present() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingApiKey,
                format!(
                    "reasoning.api_key_env: environment variable {} is not set",
                    self.reasoning.api_key_env
                ),
            ));
        }

        issues
    }

    /// Loop control parameters for the application layer.
    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_iterations(self.agent.max_iterations)
            .with_tool_retries(self.agent.tool_retries)
            .with_retry_backoff(Duration::from_millis(self.agent.retry_backoff_ms))
            .with_task_timeout(Duration::from_secs(self.pool.task_timeout_secs))
            .with_default_count(self.classifier.default_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(issues: &[ConfigIssue]) -> Vec<ConfigIssueCode> {
        issues.iter().map(|i| i.code).collect()
    }

    /// Defaults with an API key variable that is guaranteed to be unset,
    /// so the environment of the test machine does not matter.
    fn base() -> FileConfig {
        let mut config = FileConfig::default();
        config.reasoning.api_key_env = "SWARM_TEST_UNSET_API_KEY".to_string();
        config
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[pool]
task_timeout_secs = 90

[[pool.workers]]
id = "agent-1"
endpoint = "http://browser-1:3001"

[[pool.workers]]
id = "agent-2"
endpoint = "http://browser-2:3001"

[agent]
max_iterations = 12

[reasoning]
model = "gemini-2.5-pro"

[classifier]
kind = "keyword"
default_count = 2

[server]
port = 9000

[logging]
directory = "/var/log/swarm"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pool.workers.len(), 2);
        assert_eq!(config.agent.max_iterations, 12);
        assert_eq!(config.agent.tool_retries, 2);
        assert_eq!(config.reasoning.model, "gemini-2.5-pro");
        assert_eq!(config.reasoning.provider, "gemini");
        assert_eq!(config.classifier.parse_kind().0, ClassifierKind::Keyword);
        assert_eq!(config.server.address(), "127.0.0.1:9000");
        assert!(config.logging.directory.is_some());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[server]\nhost = \"0.0.0.0\"\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.pool.workers.len(), 5);
    }

    #[test]
    fn test_defaults_only_warn_about_the_key() {
        let issues = base().validate();
        assert_eq!(codes(&issues), vec![ConfigIssueCode::MissingApiKey]);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_worker_errors() {
        let mut config = base();
        config.pool.workers = vec![
            FileWorkerConfig {
                id: "a".into(),
                endpoint: "http://localhost:3011".into(),
            },
            FileWorkerConfig {
                id: "a".into(),
                endpoint: "localhost:3012".into(),
            },
        ];

        let issues = config.validate();
        let codes = codes(&issues);
        assert!(codes.contains(&ConfigIssueCode::DuplicateWorkerId));
        assert!(codes.contains(&ConfigIssueCode::InvalidEndpoint));
        // default_count 5 > 2 workers
        assert!(codes.contains(&ConfigIssueCode::DefaultCountExceedsPool));
    }

    #[test]
    fn test_empty_pool_and_zero_limits() {
        let mut config = base();
        config.pool.workers.clear();
        config.pool.task_timeout_secs = 0;
        config.agent.max_iterations = 0;

        let issues = config.validate();
        let errors: Vec<_> = issues.iter().filter(|i| i.is_error()).map(|i| i.code).collect();
        assert_eq!(
            errors,
            vec![
                ConfigIssueCode::NoWorkers,
                ConfigIssueCode::ZeroTaskTimeout,
                ConfigIssueCode::ZeroIterationLimit,
            ]
        );
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let mut config = base();
        config.reasoning.provider = "openai".to_string();
        let issues = config.validate();
        assert!(
            issues
                .iter()
                .any(|i| i.code == ConfigIssueCode::UnsupportedProvider && i.is_error())
        );
    }

    #[test]
    fn test_execution_params() {
        let mut config = base();
        config.agent.retry_backoff_ms = 250;
        config.pool.task_timeout_secs = 45;

        let params = config.execution_params();
        assert_eq!(params.max_iterations, 30);
        assert_eq!(params.retry_backoff, Duration::from_millis(250));
        assert_eq!(params.task_timeout, Duration::from_secs(45));
        assert_eq!(params.default_count, 5);
    }
}
