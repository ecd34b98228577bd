//! Port definitions (interfaces for external dependencies)
//!
//! Ports define the boundaries between the application layer and
//! external systems. Adapters in the infrastructure layer implement them.

pub mod classifier;
pub mod events;
pub mod reasoning_backend;
pub mod tool_gateway;
