//! Command Classifier port
//!
//! The classification step turns free text into a rough [`Classification`].
//! Validation, clamping and subject resolution are done by the
//! `CommandInterpreter`, not by the classifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swarm_domain::{Action, QueryKind};
use thiserror::Error;

use super::reasoning_backend::ReasoningError;

/// Errors from a classifier
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier backend error: {0}")]
    Backend(#[from] ReasoningError),

    #[error("Classifier returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Raw classifier output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub query_kind: QueryKind,
    /// `None` when the command does not say how many subjects it wants.
    #[serde(default)]
    pub target_count: Option<usize>,
    #[serde(default)]
    pub specific_subjects: Vec<String>,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub rationale: String,
}

/// Port for command classification
#[async_trait]
pub trait CommandClassifier: Send + Sync {
    async fn classify(&self, command: &str) -> Result<Classification, ClassifierError>;
}
