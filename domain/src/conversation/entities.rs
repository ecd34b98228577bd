//! Conversation entities

use serde::{Deserialize, Serialize};

use crate::tool::value_objects::ToolOutcome;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    ToolResult,
}

/// Binary observation attached to a turn (usually a screenshot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub mime_type: String,
    /// Base64-encoded bytes, as delivered by the tool gateway.
    pub data: String,
}

impl Image {
    pub fn png(data: impl Into<String>) -> Self {
        Self {
            mime_type: "image/png".to_string(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    /// Internal notes are fed back to the reasoning backend but never
    /// surfaced to the caller.
    #[serde(default)]
    pub internal: bool,
}

/// Ordered history of one agent's task.
///
/// Grows monotonically while the task runs; a new task starts from a fresh
/// context built with [`ConversationContext::for_task`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub system_prompt: String,
    turns: Vec<Turn>,
}

impl ConversationContext {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            turns: Vec::new(),
        }
    }

    /// Fresh context seeded with the task prompt as the first user turn.
    pub fn for_task(system_prompt: impl Into<String>, task_prompt: impl Into<String>) -> Self {
        let mut ctx = Self::new(system_prompt);
        ctx.push_user(task_prompt);
        ctx
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::User,
            content: content.into(),
            image: None,
            internal: false,
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::Assistant,
            content: content.into(),
            image: None,
            internal: false,
        });
    }

    /// Log-only assistant turn.
    pub fn push_note(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::Assistant,
            content: content.into(),
            image: None,
            internal: true,
        });
    }

    /// Append the result of a tool call, success or failure.
    pub fn push_tool_outcome(&mut self, outcome: &ToolOutcome) {
        self.turns.push(Turn {
            role: Role::ToolResult,
            content: outcome.to_turn_text(),
            image: outcome.image.clone(),
            internal: false,
        });
    }

    /// Error tool-result turn for a call that never reached a tool.
    pub fn push_tool_error(&mut self, tool_name: &str, message: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::ToolResult,
            content: format!("Tool '{}' failed with error: {}", tool_name, message.into()),
            image: None,
            internal: false,
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Turns that may be shown outside the agent.
    pub fn visible_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| !t.internal)
    }
}
