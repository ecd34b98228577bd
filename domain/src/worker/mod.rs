//! Worker status value objects.
//!
//! The worker pool owns one [`WorkerStatus`] per registered worker for the
//! lifetime of the process. Everyone else sees copies.

pub mod value_objects;

pub use value_objects::{PoolSummary, WorkerId, WorkerState, WorkerStatus};
