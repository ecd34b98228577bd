//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: UTF-8 safe text helpers used when rendering rows and prompts

pub mod error;
pub mod string;
