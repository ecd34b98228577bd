//! Prompt domain
//!
//! Templates for every prompt the swarm sends to the reasoning backend:
//! the browser agent system prompt, per-subject research tasks, command
//! classification and final synthesis.

pub mod agent;
mod template;

pub use agent::AgentPromptTemplate;
pub use template::PromptTemplate;
