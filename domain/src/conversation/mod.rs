//! Conversation context owned by one agent loop for one task.

pub mod entities;

pub use entities::{ConversationContext, Image, Role, Turn};
