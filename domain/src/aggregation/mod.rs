//! Aggregation domain module
//!
//! Per-subject [`TaskOutcome`](crate::outcome::TaskOutcome)s are reduced into
//! one [`AggregatedArtifact`]: a row per subject (failed subjects included,
//! filled with [`UNAVAILABLE`]) plus a narrative summary.
//!
//! Columns are fixed per [`QueryKind`](crate::task::QueryKind) by
//! [`extraction::columns_for`]; values are pulled out of the agent's free-text
//! answer with the heuristics in [`extraction`].

pub mod artifact;
pub mod extraction;

pub use artifact::{AggregatedArtifact, ArtifactRow, RowStatus};
pub use extraction::{UNAVAILABLE, columns_for, extract_fields};
