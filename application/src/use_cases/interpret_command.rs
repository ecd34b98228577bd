//! Command Interpreter use case
//!
//! Turns free text into a [`TaskDescriptor`]. The classifier only proposes;
//! this module clamps counts to the pool, deduplicates explicit subjects and
//! resolves catalog subjects deterministically.

use crate::ports::classifier::{ClassifierError, CommandClassifier};
use std::sync::Arc;
use swarm_domain::{Subject, SubjectCatalog, TaskDescriptor};
use thiserror::Error;
use tracing::{debug, info};

/// Input errors: reported before any worker is touched
#[derive(Error, Debug)]
pub enum InterpretError {
    #[error("Command is empty")]
    EmptyCommand,

    #[error("Classification failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("No catalog subjects match {}", filter.as_deref().map(|f| format!("filter '{}'", f)).unwrap_or_else(|| "the command".to_string()))]
    NoMatchingSubjects { filter: Option<String> },

    #[error("{requested} subjects named but the pool has {capacity} workers")]
    TooManySubjectsForPoolSize { requested: usize, capacity: usize },
}

pub struct CommandInterpreter {
    classifier: Arc<dyn CommandClassifier>,
    catalog: Arc<SubjectCatalog>,
    pool_size: usize,
    default_count: usize,
}

impl CommandInterpreter {
    pub fn new(
        classifier: Arc<dyn CommandClassifier>,
        catalog: Arc<SubjectCatalog>,
        pool_size: usize,
        default_count: usize,
    ) -> Self {
        Self {
            classifier,
            catalog,
            pool_size,
            default_count,
        }
    }

    pub fn catalog(&self) -> &SubjectCatalog {
        &self.catalog
    }

    /// Interpret one command.
    pub async fn parse(&self, command: &str) -> Result<TaskDescriptor, InterpretError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(InterpretError::EmptyCommand);
        }

        let classification = self.classifier.classify(command).await?;
        debug!(?classification, "Command classified");

        let capacity = self.pool_size.max(1);
        let count = classification
            .target_count
            .unwrap_or(self.default_count)
            .clamp(1, capacity);

        let filter = classification
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let mut explicit = dedup_names(&classification.specific_subjects);
        explicit.truncate(count);

        let subjects: Vec<Subject> = if !explicit.is_empty() {
            if explicit.len() > self.pool_size {
                return Err(InterpretError::TooManySubjectsForPoolSize {
                    requested: explicit.len(),
                    capacity: self.pool_size,
                });
            }
            explicit
                .iter()
                .map(|name| {
                    self.catalog
                        .find(name)
                        .cloned()
                        .unwrap_or_else(|| Subject::named(name))
                })
                .collect()
        } else {
            let selected = self.catalog.select(count, filter.as_deref());
            if selected.is_empty() {
                return Err(InterpretError::NoMatchingSubjects { filter });
            }
            selected
        };

        let descriptor = TaskDescriptor::new(
            command,
            classification.action,
            classification.query_kind,
            subjects,
        )
        .with_explicit_subjects(explicit)
        .with_filter(filter)
        .with_rationale(classification.rationale);

        info!(
            action = %descriptor.action,
            query_kind = %descriptor.query_kind,
            count = descriptor.requested_count,
            "Resolved subjects: {}",
            descriptor.subject_names().join(", ")
        );
        Ok(descriptor)
    }
}

/// Trimmed, non-empty names with case-insensitive duplicates removed, first
/// spelling kept.
fn dedup_names(names: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let key = name.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(name.to_string());
        }
    }
    out
}
