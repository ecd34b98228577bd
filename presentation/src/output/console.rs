//! Console output formatter for aggregated artifacts

use colored::Colorize;
use swarm_domain::{AggregatedArtifact, OutputFormat, WorkerState, WorkerStatus};

/// Formats artifacts and worker tables for display.
///
/// [`ConsoleFormatter::markdown`] is plain text: it is also the `content` of
/// WebSocket responses, so it never carries terminal colors.
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format(artifact: &AggregatedArtifact, format: OutputFormat) -> String {
        match format {
            OutputFormat::Markdown => Self::markdown(artifact),
            OutputFormat::Json => Self::format_json(artifact),
        }
    }

    /// Table, narrative, then the timing footer.
    pub fn markdown(artifact: &AggregatedArtifact) -> String {
        let mut output = artifact.to_markdown_table();

        if !artifact.narrative_summary.is_empty() {
            output.push_str("\n### Summary\n\n");
            output.push_str(artifact.narrative_summary.trim());
            output.push('\n');
        }

        output.push('\n');
        output.push_str(&Self::footer(artifact));
        output
    }

    pub fn footer(artifact: &AggregatedArtifact) -> String {
        format!(
            "*Research completed in {:.1} seconds using {} parallel agents. {}/{} successful.*",
            artifact.total_elapsed.as_secs_f64(),
            artifact.total(),
            artifact.succeeded_count,
            artifact.total()
        )
    }

    pub fn format_json(artifact: &AggregatedArtifact) -> String {
        serde_json::to_string_pretty(artifact)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}", e))
    }

    /// Colored worker table for the terminal.
    pub fn format_workers(statuses: &[WorkerStatus]) -> String {
        let mut output = format!("{}\n", "Workers".cyan().bold());
        output.push_str(&"-".repeat(40));
        output.push('\n');

        for status in statuses {
            let label = status.state.as_str();
            let state = match status.state {
                WorkerState::Idle => label.green(),
                WorkerState::Running => label.blue(),
                WorkerState::Error => label.red(),
                WorkerState::Starting | WorkerState::Stopping => label.yellow(),
            };
            output.push_str(&format!(
                "{} {:<10} {:<9} {}",
                status.state.emoji(),
                status.worker_id.as_str().bold(),
                state,
                status.endpoint.dimmed()
            ));
            if let Some(error) = &status.last_error {
                output.push_str(&format!("  {}", error.red()));
            }
            output.push('\n');
        }
        output
    }

    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use swarm_domain::{ErrorKind, QueryKind, TaskOutcome, WorkerId};

    fn artifact() -> AggregatedArtifact {
        let outcomes = vec![
            TaskOutcome::success("A", "A: $10"),
            TaskOutcome::failure("B", ErrorKind::Timeout, "timed out"),
        ];
        AggregatedArtifact::from_outcomes(&outcomes, QueryKind::Valuation)
            .with_narrative("A is valued at $10.")
            .with_total_elapsed(Duration::from_millis(12_340))
    }

    #[test]
    fn test_markdown_has_table_summary_and_footer() {
        let text = ConsoleFormatter::markdown(&artifact());
        assert!(text.starts_with("## Company Valuations"));
        assert!(text.contains("### Summary\n\nA is valued at $10."));
        assert!(text.ends_with(
            "*Research completed in 12.3 seconds using 2 parallel agents. 1/2 successful.*"
        ));
    }

    #[test]
    fn test_markdown_without_narrative() {
        let bare = AggregatedArtifact::from_outcomes(&[], QueryKind::Funding);
        let text = ConsoleFormatter::markdown(&bare);
        assert!(!text.contains("### Summary"));
        assert!(text.contains("using 0 parallel agents. 0/0 successful."));
    }

    #[test]
    fn test_json_format() {
        let text = ConsoleFormatter::format(&artifact(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["succeeded_count"], 1);
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_worker_table_lists_every_worker() {
        colored::control::set_override(false);
        let statuses = vec![
            WorkerStatus::new(WorkerId::new("agent-1"), "http://localhost:3011"),
            WorkerStatus::new(WorkerId::new("agent-2"), "http://localhost:3012"),
        ];
        let table = ConsoleFormatter::format_workers(&statuses);
        assert!(table.contains("agent-1"));
        assert!(table.contains("http://localhost:3012"));
        assert!(table.contains("starting"));
    }
}
