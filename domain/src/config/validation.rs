//! Structured configuration issues.
//!
//! Configuration loaders report problems as [`ConfigIssue`] values instead of
//! failing on the first one, so the binary can print every problem at once and
//! decide which ones are fatal.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No worker endpoints are configured; nothing can be dispatched.
    NoWorkers,
    /// Two workers share the same id.
    DuplicateWorkerId,
    /// A worker endpoint is not an http(s) URL.
    InvalidEndpoint,
    /// `agent.max_iterations` is zero.
    ZeroIterationLimit,
    /// `pool.task_timeout_secs` is zero.
    ZeroTaskTimeout,
    /// The reasoning API key environment variable is not set.
    MissingApiKey,
    /// `classifier.default_count` exceeds the number of workers.
    DefaultCountExceedsPool,
    /// The configured classifier kind is not recognized.
    UnknownClassifier,
    /// `reasoning.provider` names a backend that is not implemented.
    UnsupportedProvider,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
