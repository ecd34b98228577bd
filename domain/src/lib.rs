//! Domain layer for browser-swarm
//!
//! This crate contains the core entities, value objects and pure rules of
//! the swarm. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Task
//!
//! A free-text command is interpreted into a [`TaskDescriptor`]: an
//! [`Action`], a [`QueryKind`] and an ordered, duplicate-free list of
//! [`Subject`]s drawn from the [`SubjectCatalog`].
//!
//! ## Agent
//!
//! Each subject is researched by one browser agent that alternates between
//! asking the reasoning backend for an [`AgentDecision`] and running the
//! requested [`ToolCall`] against its gateway, recording everything in its
//! own [`ConversationContext`].
//!
//! ## Aggregation
//!
//! Per-subject [`TaskOutcome`]s are reduced into one [`AggregatedArtifact`]
//! whose rows follow a fixed column schema per query kind.

pub mod agent;
pub mod aggregation;
pub mod config;
pub mod conversation;
pub mod core;
pub mod outcome;
pub mod prompt;
pub mod task;
pub mod tool;
pub mod worker;

// Re-export commonly used types
pub use agent::{AgentDecision, DecisionParseError, parse_decision, unfence};
pub use aggregation::{AggregatedArtifact, ArtifactRow, RowStatus, UNAVAILABLE};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use conversation::{ConversationContext, Image, Role, Turn};
pub use core::error::DomainError;
pub use outcome::{ErrorKind, TaskOutcome};
pub use prompt::{AgentPromptTemplate, PromptTemplate};
pub use task::{Action, QueryKind, Subject, SubjectCatalog, TaskDescriptor};
pub use tool::{ToolCall, ToolDefinition, ToolOutcome, ToolParameter, ToolSpec};
pub use worker::{PoolSummary, WorkerId, WorkerState, WorkerStatus};
