//! MCP Tool Gateway implementation

use crate::mcp::error::{McpError, Result};
use crate::mcp::protocol::{
    CallToolParams, CallToolResult, InitializeParams, JsonRpcNotification, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult,
};
use async_trait::async_trait;
use std::sync::RwLock;
use std::time::Duration;
use swarm_application::{ToolGateway, ToolGatewayError};
use swarm_domain::{ToolCall, ToolOutcome, ToolSpec};
use tracing::{debug, info, warn};

/// Tool gateway for one browser automation server.
///
/// Until discovery succeeds the gateway publishes the fallback browser
/// catalog, so an agent can still try the standard tools.
pub struct McpToolGateway {
    endpoint: String,
    client: reqwest::Client,
    tools: RwLock<ToolSpec>,
}

impl McpToolGateway {
    pub fn new(endpoint: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self::with_client(endpoint, client))
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
            tools: RwLock::new(ToolSpec::fallback_browser()),
        }
    }

    fn message_url(&self) -> String {
        format!("{}/message", self.endpoint)
    }

    async fn request(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let request = JsonRpcRequest::new(method, params);
        debug!(endpoint = %self.endpoint, id = request.id, method, "MCP request");

        let response = self
            .client
            .post(self.message_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(McpError::Status(status.as_u16()));
        }

        let body: JsonRpcResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(McpError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        body.result
            .ok_or_else(|| McpError::UnexpectedResponse(format!("'{}' returned no result", method)))
    }

    async fn notify(&self, method: &str, params: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(self.message_url())
            .json(&JsonRpcNotification::new(method, params))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(McpError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn discover(&self) -> Result<ToolSpec> {
        let result = self.request("tools/list", serde_json::json!({})).await?;
        let listed: ListToolsResult = serde_json::from_value(result)?;
        if listed.tools.is_empty() {
            return Err(McpError::UnexpectedResponse("server published no tools".into()));
        }
        Ok(listed.to_tool_spec())
    }

    fn set_tools(&self, spec: ToolSpec) {
        *self.tools.write().unwrap_or_else(|e| e.into_inner()) = spec;
    }
}

#[async_trait]
impl ToolGateway for McpToolGateway {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `initialize` → `notifications/initialized` → `tools/list`.
    async fn connect(&self) -> std::result::Result<(), ToolGatewayError> {
        let params = serde_json::to_value(InitializeParams::default())
            .map_err(|e| ToolGatewayError::Protocol(e.to_string()))?;

        let init = self.request("initialize", params).await;
        if let Err(e) = init {
            warn!(endpoint = %self.endpoint, "MCP initialize failed: {}", e);
            self.set_tools(ToolSpec::fallback_browser());
            return Err(e.into());
        }

        if let Err(e) = self
            .notify("notifications/initialized", serde_json::json!({}))
            .await
        {
            warn!(endpoint = %self.endpoint, "Failed to send initialized notification: {}", e);
        }

        match self.discover().await {
            Ok(spec) => {
                info!(endpoint = %self.endpoint, "Loaded {} tools from MCP server", spec.len());
                for tool in spec.all() {
                    debug!(endpoint = %self.endpoint, "  {}", tool.signature());
                }
                self.set_tools(spec);
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, "Tool discovery failed, using fallback tools: {}", e);
                self.set_tools(ToolSpec::fallback_browser());
            }
        }
        Ok(())
    }

    fn catalog(&self) -> ToolSpec {
        self.tools.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn invoke(&self, call: &ToolCall) -> std::result::Result<ToolOutcome, ToolGatewayError> {
        let params = serde_json::to_value(CallToolParams {
            name: call.tool_name.clone(),
            arguments: call.arguments_json(),
        })
        .map_err(|e| ToolGatewayError::Protocol(e.to_string()))?;

        match self.request("tools/call", params).await {
            Ok(value) => {
                let result: CallToolResult = serde_json::from_value(value)
                    .map_err(|e| ToolGatewayError::Protocol(e.to_string()))?;
                Ok(result.into_outcome(&call.tool_name))
            }
            // The server understood the call and refused it: the tool failed,
            // the gateway did not.
            Err(McpError::Rpc { code, message }) => Ok(ToolOutcome::failure(
                &call.tool_name,
                format!("{} (code {})", message, code),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn health(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(endpoint = %self.endpoint, "Health check failed: {}", e);
                false
            }
        }
    }
}
