//! Agent decisions and their strict parser.
//!
//! Each reasoning step yields exactly one [`AgentDecision`]. The reasoning
//! backend is asked for a single JSON object; [`parse_decision`] accepts that
//! object bare or inside one fenced code block and rejects everything else
//! with a [`DecisionParseError`], which the agent loop reports as a malformed
//! decision instead of guessing.

pub mod decision;
pub mod decision_parser;

pub use decision::AgentDecision;
pub use decision_parser::{DecisionParseError, parse_decision, unfence};
