//! Infrastructure layer for browser-swarm
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod gemini;
pub mod mcp;

// Re-export commonly used types
pub use catalog::{CatalogError, CatalogLoader};
pub use classifier::{KeywordClassifier, LlmClassifier, parse_classification};
pub use config::{ClassifierKind, ConfigLoader, FileConfig};
pub use gemini::{backend::GeminiReasoningBackend, error::GeminiError};
pub use mcp::{error::McpError, gateway::McpToolGateway};
