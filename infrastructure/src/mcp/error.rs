//! Error types for the MCP adapter

use swarm_application::ToolGatewayError;
use thiserror::Error;

/// Result type alias for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur when talking to an MCP server
#[derive(Error, Debug)]
pub enum McpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server answered with status {0}")]
    Status(u16),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("JSON-RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl McpError {
    /// Transport-level problems mean the gateway itself is unreachable.
    pub fn is_transport(&self) -> bool {
        matches!(self, McpError::Http(_) | McpError::Status(_))
    }
}

impl From<McpError> for ToolGatewayError {
    fn from(err: McpError) -> Self {
        match err {
            McpError::Http(e) if e.is_timeout() => ToolGatewayError::Timeout,
            e @ (McpError::Http(_) | McpError::Status(_)) => {
                ToolGatewayError::Unavailable(e.to_string())
            }
            e => ToolGatewayError::Protocol(e.to_string()),
        }
    }
}
