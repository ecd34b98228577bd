//! Reasoning Backend port
//!
//! Defines the interface for consulting the language-model backend.

use async_trait::async_trait;
use swarm_domain::ConversationContext;
use thiserror::Error;

/// Errors that can occur during reasoning backend calls
#[derive(Error, Debug)]
pub enum ReasoningError {
    #[error("Reasoning backend unavailable: {0}")]
    Unavailable(String),

    #[error("Reasoning backend rejected the request: {0}")]
    Rejected(String),

    #[error("Reasoning backend returned no content")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,
}

/// Gateway to the language-model backend
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    /// Ask for the next agent decision given the whole conversation so far.
    ///
    /// Returns the raw reply text; the agent loop parses it strictly.
    async fn decide(&self, context: &ConversationContext) -> Result<String, ReasoningError>;

    /// Single-shot completion used for classification and synthesis.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasoningError>;
}
