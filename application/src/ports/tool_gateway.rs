//! Tool Gateway port
//!
//! Defines the interface for driving one remote browser-control endpoint.

use async_trait::async_trait;
use swarm_domain::{ToolCall, ToolOutcome, ToolSpec};
use thiserror::Error;

/// Transport-level gateway failures.
///
/// A tool that runs and reports an error is not a gateway error; it comes
/// back as a failed [`ToolOutcome`].
#[derive(Error, Debug)]
pub enum ToolGatewayError {
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    #[error("Gateway protocol error: {0}")]
    Protocol(String),

    #[error("Timeout")]
    Timeout,
}

/// Port for one tool gateway
///
/// Each worker owns exactly one gateway; implementations never need to be
/// shared across concurrent executions.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// Endpoint label for status reporting and logs.
    fn endpoint(&self) -> &str;

    /// Open the session and discover the published catalog.
    async fn connect(&self) -> Result<(), ToolGatewayError> {
        Ok(())
    }

    /// Currently published tool catalog.
    fn catalog(&self) -> ToolSpec;

    /// Invoke one tool.
    async fn invoke(&self, call: &ToolCall) -> Result<ToolOutcome, ToolGatewayError>;

    /// Cheap reachability probe.
    async fn health(&self) -> bool;
}
