//! Agent decision entity

use crate::tool::entities::ToolCall;

/// One reasoning step's outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentDecision {
    /// Private reasoning; logged into the context, never shown to the caller.
    InternalNote(String),
    /// Final answer for the caller; terminates the loop.
    UserMessage(String),
    /// Request to run one tool.
    ToolCall(ToolCall),
}

impl AgentDecision {
    pub fn kind(&self) -> &'static str {
        match self {
            AgentDecision::InternalNote(_) => "note",
            AgentDecision::UserMessage(_) => "message",
            AgentDecision::ToolCall(_) => "tool_call",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentDecision::UserMessage(_))
    }
}
