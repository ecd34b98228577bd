//! Task value objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::entities::Subject;
use crate::prompt::PromptTemplate;

/// What the command asks the swarm to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Lookup,
    Analyze,
    Compare,
    Track,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Lookup => "lookup",
            Action::Analyze => "analyze",
            Action::Compare => "compare",
            Action::Track => "track",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lookup" | "look_up" | "find" | "search" => Ok(Action::Lookup),
            "analyze" | "analyse" | "research" => Ok(Action::Analyze),
            "compare" | "comparison" => Ok(Action::Compare),
            "track" | "monitor" => Ok(Action::Track),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

/// What kind of information each agent should collect about its subject.
///
/// The query kind also fixes the column schema of the aggregated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    #[default]
    Valuation,
    Overview,
    Team,
    Funding,
    Product,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Valuation => "valuation",
            QueryKind::Overview => "overview",
            QueryKind::Team => "team",
            QueryKind::Funding => "funding",
            QueryKind::Product => "product",
        }
    }

    pub fn all() -> [QueryKind; 5] {
        [
            QueryKind::Valuation,
            QueryKind::Overview,
            QueryKind::Team,
            QueryKind::Funding,
            QueryKind::Product,
        ]
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        QueryKind::all()
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| format!("unknown query kind: {}", s))
    }
}

/// Structured result of interpreting one free-text command.
///
/// Built by the command interpreter once subjects are resolved, so
/// `requested_count == resolved_subjects.len()` always holds and the
/// resolved subjects carry no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub action: Action,
    pub query_kind: QueryKind,
    pub requested_count: usize,
    /// Subjects the command named explicitly, deduplicated, in command order.
    pub explicit_subjects: Vec<String>,
    pub filter: Option<String>,
    pub rationale: String,
    pub raw_command: String,
    resolved_subjects: Vec<Subject>,
}

impl TaskDescriptor {
    pub fn new(
        raw_command: impl Into<String>,
        action: Action,
        query_kind: QueryKind,
        resolved_subjects: Vec<Subject>,
    ) -> Self {
        let mut unique: Vec<Subject> = Vec::with_capacity(resolved_subjects.len());
        for subject in resolved_subjects {
            if !unique
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(&subject.name))
            {
                unique.push(subject);
            }
        }

        Self {
            action,
            query_kind,
            requested_count: unique.len(),
            explicit_subjects: Vec::new(),
            filter: None,
            rationale: String::new(),
            raw_command: raw_command.into(),
            resolved_subjects: unique,
        }
    }

    pub fn with_explicit_subjects(mut self, names: Vec<String>) -> Self {
        self.explicit_subjects = names;
        self
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    pub fn resolved_subjects(&self) -> &[Subject] {
        &self.resolved_subjects
    }

    pub fn subject_names(&self) -> Vec<String> {
        self.resolved_subjects.iter().map(|s| s.name.clone()).collect()
    }

    /// One `(subject, prompt)` pair per resolved subject, in order.
    pub fn subject_tasks(&self) -> Vec<(String, String)> {
        self.resolved_subjects
            .iter()
            .map(|subject| {
                (
                    subject.name.clone(),
                    PromptTemplate::subject_task(self.query_kind, subject),
                )
            })
            .collect()
    }
}
