//! Strict parsing of reasoning backend replies into [`AgentDecision`].
//!
//! Accepted shapes (and nothing else):
//!
//! ```json
//! {"type": "note", "text": "..."}
//! {"type": "message", "text": "..."}
//! {"type": "tool_call", "name": "browser_navigate", "arguments": {"url": "..."}}
//! ```
//!
//! The object may be the whole reply or the content of a single
//! ` ```json ` (or bare ` ``` `) fence.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use super::decision::AgentDecision;
use crate::tool::entities::ToolCall;

/// Why a reply could not be read as a decision.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecisionParseError {
    #[error("reply is empty")]
    Empty,

    #[error("reply is not a JSON object: {0}")]
    NotJson(String),

    #[error("reply does not match any decision shape: {0}")]
    UnknownShape(String),

    #[error("decision field '{0}' is empty")]
    EmptyField(&'static str),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireDecision {
    Note {
        text: String,
    },
    Message {
        text: String,
    },
    ToolCall {
        name: String,
        #[serde(default)]
        arguments: HashMap<String, serde_json::Value>,
    },
}

/// Strip one surrounding code fence, if the whole reply is fenced.
pub fn unfence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    match body.split_once('\n') {
        Some((info, content)) if !info.trim().starts_with('{') => content.trim(),
        _ => body.trim(),
    }
}

/// Parse one reasoning reply into exactly one decision.
pub fn parse_decision(reply: &str) -> Result<AgentDecision, DecisionParseError> {
    let body = unfence(reply);
    if body.is_empty() {
        return Err(DecisionParseError::Empty);
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| DecisionParseError::NotJson(e.to_string()))?;
    if !value.is_object() {
        return Err(DecisionParseError::NotJson("top-level value is not an object".to_string()));
    }

    let wire: WireDecision = serde_json::from_value(value)
        .map_err(|e| DecisionParseError::UnknownShape(e.to_string()))?;

    match wire {
        WireDecision::Note { text } => {
            if text.trim().is_empty() {
                return Err(DecisionParseError::EmptyField("text"));
            }
            Ok(AgentDecision::InternalNote(text))
        }
        WireDecision::Message { text } => {
            if text.trim().is_empty() {
                return Err(DecisionParseError::EmptyField("text"));
            }
            Ok(AgentDecision::UserMessage(text))
        }
        WireDecision::ToolCall { name, arguments } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(DecisionParseError::EmptyField("name"));
            }
            Ok(AgentDecision::ToolCall(ToolCall {
                tool_name: name.to_string(),
                arguments,
            }))
        }
    }
}
