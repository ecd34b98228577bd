//! UI message protocol
//!
//! Client to server: `{"type":"message","content":"<command>"}` runs a
//! command, `{"type":"status"}` asks for the worker table. Server to client:
//! any number of `status` messages, then one `response` or `error` per
//! command.

use crate::output::console::ConsoleFormatter;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use swarm_application::SwarmEvent;
use swarm_domain::{PoolSummary, WorkerStatus};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Message {
        #[serde(default)]
        content: String,
    },
    Status,
    #[serde(other)]
    Unsupported,
}

impl ClientMessage {
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Status,
    Response,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ServerMessage {
    fn new(kind: MessageType, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            task_id: None,
            data: None,
        }
    }

    pub fn status(content: impl Into<String>) -> Self {
        Self::new(MessageType::Status, content)
    }

    pub fn response(content: impl Into<String>) -> Self {
        Self::new(MessageType::Response, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageType::Error, content)
    }

    pub fn with_task_id(mut self, task_id: Option<&str>) -> Self {
        self.task_id = task_id.map(String::from);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Worker table snapshot, as sent on connect and on `{"type":"status"}`.
    pub fn workers(content: impl Into<String>, statuses: &[WorkerStatus], summary: PoolSummary) -> Self {
        Self::status(content).with_data(json!({
            "workers": statuses,
            "summary": summary,
        }))
    }

    pub fn invalid_json() -> Self {
        Self::error("Invalid JSON message")
    }

    /// Map one progress event to the message a client sees.
    ///
    /// `Completed` becomes the `response`, `Failed` the `error`; everything
    /// else is a `status` update.
    pub fn from_event(event: &SwarmEvent, task_id: Option<&str>) -> Self {
        let message = match event {
            SwarmEvent::CommandReceived { command, .. } => {
                Self::status(format!("Processing command: {}", command))
            }
            SwarmEvent::Dispatching {
                count, subjects, ..
            } => Self::status(format!(
                "Starting parallel research on {} companies...",
                count
            ))
            .with_data(json!({ "companies": subjects })),
            SwarmEvent::Completed { artifact, .. } => {
                Self::response(ConsoleFormatter::markdown(artifact))
                    .with_data(json!({ "artifact": artifact }))
            }
            SwarmEvent::Failed { message, .. } => {
                Self::error(format!("Error processing command: {}", message))
            }
            other => {
                let status = Self::status(other.describe());
                match serde_json::to_value(other) {
                    Ok(data) => status.with_data(data),
                    Err(_) => status,
                }
            }
        };
        message.with_task_id(task_id)
    }

    pub fn is_terminal(&self) -> bool {
        self.kind != MessageType::Status
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            json!({ "type": "error", "content": format!("Failed to serialize message: {}", e) })
                .to_string()
        })
    }
}
