//! Aggregated artifact entity

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::extraction::{UNAVAILABLE, columns_for, extract_fields, unavailable_fields};
use crate::core::string::table_cell;
use crate::outcome::value_objects::{ErrorKind, TaskOutcome, duration_secs};
use crate::task::value_objects::QueryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "error_kind", rename_all = "lowercase")]
pub enum RowStatus {
    Ok,
    Failed(ErrorKind),
}

impl RowStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            RowStatus::Ok => "✓",
            RowStatus::Failed(_) => "✗",
        }
    }
}

/// One subject's line in the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRow {
    pub subject: String,
    /// `(column, value)` in column order.
    pub fields: Vec<(String, String)>,
    pub status: RowStatus,
}

impl ArtifactRow {
    pub fn from_outcome(outcome: &TaskOutcome, kind: QueryKind) -> Self {
        match (&outcome.result_text, outcome.success) {
            (Some(text), true) => Self {
                subject: outcome.subject.clone(),
                fields: extract_fields(kind, text),
                status: RowStatus::Ok,
            },
            _ => Self {
                subject: outcome.subject.clone(),
                fields: unavailable_fields(kind),
                status: RowStatus::Failed(outcome.error_kind.unwrap_or(ErrorKind::Cancelled)),
            },
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_ok(&self) -> bool {
        self.status == RowStatus::Ok
    }
}

/// Final reduced output of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedArtifact {
    pub query_kind: QueryKind,
    pub columns: Vec<String>,
    pub rows: Vec<ArtifactRow>,
    pub narrative_summary: String,
    pub succeeded_count: usize,
    pub failed_count: usize,
    #[serde(with = "duration_secs")]
    pub total_elapsed: Duration,
}

impl AggregatedArtifact {
    /// One row per outcome, in outcome order. The narrative starts empty.
    pub fn from_outcomes(outcomes: &[TaskOutcome], kind: QueryKind) -> Self {
        let rows: Vec<ArtifactRow> = outcomes
            .iter()
            .map(|o| ArtifactRow::from_outcome(o, kind))
            .collect();
        let succeeded_count = rows.iter().filter(|r| r.is_ok()).count();
        let total_elapsed = outcomes
            .iter()
            .map(|o| o.elapsed)
            .max()
            .unwrap_or(Duration::ZERO);

        Self {
            query_kind: kind,
            columns: columns_for(kind).iter().map(|c| c.to_string()).collect(),
            failed_count: rows.len() - succeeded_count,
            succeeded_count,
            rows,
            narrative_summary: String::new(),
            total_elapsed,
        }
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative_summary = narrative.into();
        self
    }

    pub fn with_total_elapsed(mut self, elapsed: Duration) -> Self {
        self.total_elapsed = elapsed;
        self
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn title(&self) -> &'static str {
        match self.query_kind {
            QueryKind::Valuation => "Company Valuations",
            QueryKind::Overview => "Company Overviews",
            QueryKind::Team => "Company Teams",
            QueryKind::Funding => "Company Funding",
            QueryKind::Product => "Company Products",
        }
    }

    /// Heading plus markdown table, one line per row.
    pub fn to_markdown_table(&self) -> String {
        let mut header = String::from("| Company |");
        let mut separator = String::from("|---------|");
        for column in &self.columns {
            header.push_str(&format!(" {} |", column));
            separator.push_str(&format!("{}|", "-".repeat(column.len() + 2)));
        }
        header.push_str(" Status |");
        separator.push_str("--------|");

        let mut out = format!("## {}\n\n{}\n{}\n", self.title(), header, separator);
        for row in &self.rows {
            out.push_str(&format!("| {} |", table_cell(&row.subject)));
            for column in &self.columns {
                let value = row.field(column).unwrap_or(UNAVAILABLE);
                out.push_str(&format!(" {} |", table_cell(value)));
            }
            out.push_str(&format!(" {} |\n", row.status.icon()));
        }
        out
    }
}
