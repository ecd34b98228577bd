//! Tool domain value objects

use serde::{Deserialize, Serialize};

use crate::conversation::entities::Image;

/// Result of one tool invocation as reported by the gateway.
///
/// A failed outcome means the tool ran and reported an error (element not
/// found, navigation refused). Gateway transport failures never become a
/// `ToolOutcome`; they surface as errors from the gateway port instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub tool_name: String,
    pub success: bool,
    /// Text payload (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Error text (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

impl ToolOutcome {
    pub fn success(tool_name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            payload: Some(payload.into()),
            error: None,
            image: None,
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            payload: None,
            error: Some(error.into()),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    /// Text appended to the conversation as the tool-result turn.
    pub fn to_turn_text(&self) -> String {
        if self.success {
            let payload = self.payload.as_deref().unwrap_or("");
            if payload.is_empty() && self.image.is_some() {
                format!("Tool '{}' executed. Result: [image attached]", self.tool_name)
            } else {
                format!("Tool '{}' executed. Result: {}", self.tool_name, payload)
            }
        } else {
            format!(
                "Tool '{}' failed with error: {}",
                self.tool_name,
                self.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
