//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid subject catalog: {0}")]
    InvalidCatalog(String),
}
