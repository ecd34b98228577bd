//! Gemini reasoning backend adapter
//!
//! Calls the `generateContent` REST endpoint. Decisions are requested with a
//! JSON response MIME type; synthesis and classification use plain text.

pub mod backend;
pub mod error;
pub mod wire;
