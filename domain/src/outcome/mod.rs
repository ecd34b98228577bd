//! Per-subject task outcomes.

pub mod value_objects;

pub use value_objects::{ErrorKind, TaskOutcome};
