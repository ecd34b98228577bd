//! Presentation layer for browser-swarm
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the HTTP/WebSocket interface.

pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use progress::{ProgressObserver, follow};
pub use server::{ServerState, protocol::ServerMessage, router, run_command, serve};
