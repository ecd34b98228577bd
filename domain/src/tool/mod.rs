//! Tool domain module
//!
//! Each agent drives one remote tool gateway (a browser-control surface).
//! The gateway publishes a [`ToolSpec`]; the agent asks for tools by name
//! through a [`ToolCall`] and receives a [`ToolOutcome`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolOutcome  │
//! │ (catalog)    │    │ (invocation) │    │ (text/image) │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "navigate" → "browser_navigate"
//!        └─ tools:   "browser_navigate" → ToolDefinition
//! ```
//!
//! # Tool Name Aliases
//!
//! Models regularly drop the `browser_` prefix or invent near-miss names.
//! [`ToolSpec::resolve`] maps known aliases onto canonical names before the
//! call is validated, so a harmless naming slip does not cost an iteration.

pub mod entities;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::ToolOutcome;
