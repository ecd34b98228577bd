//! Command classifier configuration from TOML (`[classifier]` section)

use serde::{Deserialize, Serialize};
use swarm_domain::{ConfigIssue, ConfigIssueCode};

/// Which classifier interprets commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    /// Pattern tables only, no backend call
    Keyword,
    /// Reasoning backend, falling back to keywords
    #[default]
    Llm,
}

impl std::str::FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "keywords" => Ok(ClassifierKind::Keyword),
            "llm" | "model" => Ok(ClassifierKind::Llm),
            other => Err(format!("unknown classifier: {}", other)),
        }
    }
}

/// Raw classifier configuration from TOML
///
/// # Example
///
/// ```toml
/// [classifier]
/// kind = "llm"          # "llm" or "keyword"
/// default_count = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClassifierConfig {
    pub kind: String,
    /// Subjects to resolve when the command does not say how many
    pub default_count: usize,
}

impl Default for FileClassifierConfig {
    fn default() -> Self {
        Self {
            kind: "llm".to_string(),
            default_count: 5,
        }
    }
}

impl FileClassifierConfig {
    /// Parse `kind`, returning a warning and the default on failure.
    pub fn parse_kind(&self) -> (ClassifierKind, Vec<ConfigIssue>) {
        match self.kind.parse::<ClassifierKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::UnknownClassifier,
                    format!(
                        "classifier.kind: unknown value '{}', falling back to 'llm'",
                        self.kind
                    ),
                );
                (ClassifierKind::default(), vec![issue])
            }
        }
    }
}
