//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod aggregate_results;
pub mod agent_loop;
pub mod interpret_command;
pub mod orchestrator;
pub mod worker_pool;
