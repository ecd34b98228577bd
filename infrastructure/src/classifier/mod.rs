//! Command classifiers
//!
//! - [`KeywordClassifier`]: pattern tables, no network
//! - [`LlmClassifier`]: asks the reasoning backend, optionally falling back
//!   to keywords when the reply is unusable

mod keyword;
mod llm;

pub use keyword::KeywordClassifier;
pub use llm::{LlmClassifier, parse_classification};
