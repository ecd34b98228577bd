//! Prompt templates for the browser agent

use crate::tool::entities::ToolSpec;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt for one browser agent, listing the gateway's tools and
    /// the single-object decision format the agent loop accepts.
    pub fn agent_system(tool_spec: &ToolSpec) -> String {
        let tool_descriptions = tool_spec
            .all()
            .map(|t| {
                let params = t
                    .parameters
                    .iter()
                    .map(|p| {
                        let required = if p.required { " (required)" } else { "" };
                        format!("    - {}: {}{}", p.name, p.description, required)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");

                if params.is_empty() {
                    format!("- **{}**: {}", t.name, t.description)
                } else {
                    format!("- **{}**: {}\n  Parameters:\n{}", t.name, t.description, params)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a browser automation agent. You control one web browser to research a single subject and report what you found.

## Available Tools
{tools}

## Response Format
Every reply must be exactly one JSON object and nothing else. Choose one of:

To call a tool:
{{"type": "tool_call", "name": "browser_navigate", "arguments": {{"url": "https://example.com"}}}}

To record a private note about your plan (not shown to the user):
{{"type": "note", "text": "The search results list Crunchbase first, opening it next."}}

To finish with your answer for the user:
{{"type": "message", "text": "Stripe was last valued at $65B according to Bloomberg."}}

## Guidelines
1. Start by navigating to a search engine or a site likely to hold the answer.
2. Use browser_snapshot to get element references before clicking or typing.
3. Use browser_take_screenshot when you need to see the page visually.
4. If a tool fails, read the error and try a different action.
5. Finish with a message as soon as you have the answer. Name your source."#,
            tools = tool_descriptions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_system_lists_tools() {
        let prompt = AgentPromptTemplate::agent_system(&ToolSpec::fallback_browser());
        assert!(prompt.contains("**browser_navigate**"));
        assert!(prompt.contains("url: The URL to navigate to (required)"));
        assert!(prompt.contains("**browser_snapshot**: Capture"));
        assert!(prompt.contains(r#""type": "tool_call""#));
    }
}
