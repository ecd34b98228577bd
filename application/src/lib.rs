//! Application layer for browser-swarm
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    classifier::{Classification, ClassifierError, CommandClassifier},
    events::{EventSink, SwarmEvent},
    reasoning_backend::{ReasoningBackend, ReasoningError},
    tool_gateway::{ToolGateway, ToolGatewayError},
};
pub use use_cases::aggregate_results::{NO_RESULTS_SUMMARY, ResultAggregator};
pub use use_cases::agent_loop::AgentLoop;
pub use use_cases::interpret_command::{CommandInterpreter, InterpretError};
pub use use_cases::orchestrator::{Orchestrator, OrchestratorError};
pub use use_cases::worker_pool::{PoolError, StatusTable, WorkerPool};
