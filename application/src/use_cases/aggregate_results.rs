//! Result Aggregator use case
//!
//! Reduces a batch of [`TaskOutcome`]s to one [`AggregatedArtifact`]: a row
//! per outcome plus a narrative synthesized from the successful answers.

use crate::ports::reasoning_backend::ReasoningBackend;
use std::sync::Arc;
use swarm_domain::{AggregatedArtifact, PromptTemplate, QueryKind, TaskOutcome};
use tracing::{debug, warn};

/// Narrative used when no execution succeeded.
pub const NO_RESULTS_SUMMARY: &str = "No results obtained: every agent failed to complete its research.";

pub struct ResultAggregator {
    backend: Arc<dyn ReasoningBackend>,
}

impl ResultAggregator {
    pub fn new(backend: Arc<dyn ReasoningBackend>) -> Self {
        Self { backend }
    }

    /// Never fails. A synthesis error only degrades the narrative.
    pub async fn aggregate(&self, outcomes: &[TaskOutcome], kind: QueryKind) -> AggregatedArtifact {
        let artifact = AggregatedArtifact::from_outcomes(outcomes, kind);

        let findings: Vec<(String, String)> = outcomes
            .iter()
            .filter(|o| o.success)
            .filter_map(|o| Some((o.subject.clone(), o.result_text.clone()?)))
            .collect();

        if findings.is_empty() {
            debug!("No successful outcomes, skipping synthesis");
            return artifact.with_narrative(NO_RESULTS_SUMMARY);
        }

        let prompt = PromptTemplate::synthesis_prompt(kind, &findings);
        let narrative = match self
            .backend
            .complete(PromptTemplate::synthesis_system(), &prompt)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Synthesis returned an empty summary");
                "Summary unavailable: the synthesis step returned no text.".to_string()
            }
            Err(e) => {
                warn!("Synthesis failed: {}", e);
                format!("Summary unavailable: {}", e)
            }
        };

        artifact.with_narrative(narrative)
    }
}
