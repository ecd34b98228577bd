//! MCP tool gateway adapter
//!
//! Talks JSON-RPC 2.0 over HTTP POST to a browser automation server that
//! speaks the Model Context Protocol.

pub mod error;
pub mod gateway;
pub mod protocol;
