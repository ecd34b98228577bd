//! Prompt templates for task construction, classification and synthesis

use crate::task::entities::Subject;
use crate::task::value_objects::QueryKind;

/// Templates for generating prompts outside the agent loop
pub struct PromptTemplate;

impl PromptTemplate {
    /// Research task for one subject.
    pub fn subject_task(kind: QueryKind, subject: &Subject) -> String {
        let name = &subject.name;
        let mut base_info = format!("Company: {}", name);
        if let Some(website) = &subject.website {
            base_info.push_str(&format!("\nWebsite: {}", website));
        }
        if let Some(description) = &subject.description {
            base_info.push_str(&format!("\nDescription: {}", description));
        }

        match kind {
            QueryKind::Valuation => format!(
                r#"Research the current valuation of {name}.

{base_info}

Please:
1. Navigate to search engines and financial news sites
2. Look for recent funding rounds, valuations, or market cap information
3. Find the most recent valuation estimate with its source
4. Report the valuation amount and the source of the information

Respond with the valuation amount (e.g., "$10B" or "$500M") and the source (e.g., "TechCrunch", "Forbes")."#
            ),
            QueryKind::Overview => format!(
                r#"Provide an overview of {name}.

{base_info}

Please research and provide:
1. What the company does
2. Key products or services
3. Target market
4. Notable achievements or news

Start your answer with a one-sentence summary."#
            ),
            QueryKind::Funding => format!(
                r#"Research the funding history of {name}.

{base_info}

Please find:
1. Total funding raised
2. Most recent funding round (Series A, B, etc.)
3. Key investors
4. Funding round dates

State the total as "raised $X" and name the lead investors as "led by ..."."#
            ),
            QueryKind::Team => format!(
                r#"Research the team at {name}.

{base_info}

Please find:
1. Founders and their backgrounds
2. Key executives
3. Team size
4. Notable advisors

Start your answer with a one-sentence summary."#
            ),
            QueryKind::Product => format!(
                r#"Research the product/service of {name}.

{base_info}

Please find:
1. Main product or service
2. Key features
3. Competitive advantages
4. Target customers

Start your answer with a one-sentence summary."#
            ),
        }
    }

    /// System prompt for command classification
    pub fn classification_system() -> &'static str {
        r#"You analyze research requests for a swarm of browser agents.
You never answer the request itself. You only describe how to execute it, as JSON."#
    }

    /// Classification prompt for one command
    pub fn classification_prompt(command: &str, max_count: usize) -> String {
        format!(
            r#"Analyze this user request and describe how to execute it with multiple browser agents.

User request: "{command}"

Respond with one JSON object:
{{
    "action": "lookup" | "analyze" | "compare" | "track",
    "query_kind": "valuation" | "overview" | "team" | "funding" | "product",
    "target_count": <number 1-{max_count}, or null if the request does not say>,
    "specific_subjects": ["names the user listed explicitly"],
    "filter": "<category or keyword narrowing the subjects, or null>",
    "rationale": "<one sentence>"
}}

Examples:

Input: "Look up Stripe, Airbnb, and Coinbase"
Output: {{"action": "lookup", "query_kind": "valuation", "target_count": 3, "specific_subjects": ["Stripe", "Airbnb", "Coinbase"], "filter": null, "rationale": "Three named companies"}}

Input: "Compare funding for 4 fintech startups"
Output: {{"action": "compare", "query_kind": "funding", "target_count": 4, "specific_subjects": [], "filter": "fintech", "rationale": "Four catalog companies in fintech"}}"#
        )
    }

    /// System prompt for the final synthesis
    pub fn synthesis_system() -> &'static str {
        r#"You are a research editor combining findings from several browser agents.
Be factual. Only use the findings you are given. Mention disagreements between sources."#
    }

    /// Synthesis prompt over successful answers only.
    pub fn synthesis_prompt(kind: QueryKind, findings: &[(String, String)]) -> String {
        let mut prompt = format!(
            "Summarize these {} research results into a short, cohesive response.\n\nResults from research:\n",
            kind
        );

        for (subject, text) in findings {
            prompt.push_str(&format!("\n### {}\n{}\n", subject, text));
        }

        prompt.push_str(
            "\nWrite two or three short paragraphs. Highlight notable comparisons between the subjects.",
        );
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_task_includes_metadata() {
        let subject = Subject::named("Stripe")
            .with_website("https://stripe.com")
            .with_description("Payments infrastructure");
        let prompt = PromptTemplate::subject_task(QueryKind::Valuation, &subject);
        assert!(prompt.starts_with("Research the current valuation of Stripe."));
        assert!(prompt.contains("Company: Stripe\nWebsite: https://stripe.com\nDescription: Payments infrastructure"));
    }

    #[test]
    fn test_subject_task_without_metadata() {
        let prompt = PromptTemplate::subject_task(QueryKind::Team, &Subject::named("Ramp"));
        assert!(prompt.contains("Company: Ramp\n\n"));
        assert!(prompt.contains("Founders and their backgrounds"));
    }

    #[test]
    fn test_classification_prompt_mentions_bound() {
        let prompt = PromptTemplate::classification_prompt("find 3 companies", 5);
        assert!(prompt.contains("User request: \"find 3 companies\""));
        assert!(prompt.contains("<number 1-5"));
    }

    #[test]
    fn test_synthesis_prompt_lists_findings() {
        let findings = vec![
            ("A".to_string(), "A: $10".to_string()),
            ("C".to_string(), "C: $30".to_string()),
        ];
        let prompt = PromptTemplate::synthesis_prompt(QueryKind::Valuation, &findings);
        assert!(prompt.contains("### A\nA: $10"));
        assert!(prompt.contains("### C\nC: $30"));
        assert!(prompt.contains("valuation research results"));
    }
}
