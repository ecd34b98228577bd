//! JSON-RPC protocol types for MCP communication.
//!
//! - **Requests**: `initialize`, `tools/list`, `tools/call`
//! - **Notifications**: `notifications/initialized` (no `id`, no response)
//! - **Responses**: `result` or `error`

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use swarm_domain::{Image, ToolDefinition, ToolOutcome, ToolSpec};

/// MCP protocol revision announced in `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Global request ID counter for JSON-RPC requests.
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: serde_json::Value,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with an auto-generated ID.
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_id(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification (client → server, no response expected)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: serde_json::Value,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<u64>,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: &'static str,
    pub capabilities: serde_json::Value,
    pub client_info: ClientInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for InitializeParams {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: serde_json::json!({}),
            client_info: ClientInfo {
                name: "browser-swarm",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}

/// `tools/list` result
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListToolsResult {
    #[serde(default)]
    pub tools: Vec<McpTool>,
}

/// One tool as published by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_schema: serde_json::Value,
}

impl ListToolsResult {
    /// Domain catalog for the published tools, with the browser aliases.
    pub fn to_tool_spec(&self) -> ToolSpec {
        self.tools
            .iter()
            .fold(ToolSpec::new(), |spec, tool| {
                spec.register(ToolDefinition::from_input_schema(
                    &tool.name,
                    &tool.description,
                    &tool.input_schema,
                ))
            })
            .with_browser_aliases()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// `tools/call` result
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub is_error: bool,
}

/// Content item of a tool result
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType", default = "default_mime")]
        mime_type: String,
    },
    #[serde(other)]
    Other,
}

fn default_mime() -> String {
    "image/png".to_string()
}

impl CallToolResult {
    /// Convert to a domain outcome. Text blocks are joined; the first image
    /// is attached.
    pub fn into_outcome(self, tool_name: &str) -> ToolOutcome {
        let mut texts = Vec::new();
        let mut image = None;
        for block in self.content {
            match block {
                ContentBlock::Text { text } => texts.push(text),
                ContentBlock::Image { data, mime_type } if image.is_none() => {
                    image = Some(Image { mime_type, data });
                }
                _ => {}
            }
        }
        let text = texts.join("\n");

        if self.is_error {
            let message = if text.is_empty() {
                "Tool reported an error".to_string()
            } else {
                text
            };
            return ToolOutcome::failure(tool_name, message);
        }

        let outcome = ToolOutcome::success(tool_name, text);
        match image {
            Some(image) => outcome.with_image(image),
            None => outcome,
        }
    }
}
