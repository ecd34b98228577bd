//! Task domain module
//!
//! A free-text command becomes a [`TaskDescriptor`]: what to do
//! ([`Action`]), what to find out ([`QueryKind`]) and which [`Subject`]s
//! from the [`SubjectCatalog`] to research.
//!
//! ```text
//! "compare funding for 3 fintech companies"
//!        │
//!        ▼  classifier + interpreter
//! ┌────────────────────────────────────────────┐
//! │ TaskDescriptor                             │
//! │   action:     Compare                      │
//! │   query_kind: Funding                      │
//! │   filter:     Some("fintech")              │
//! │   resolved:   [Brex, Mercury, Ramp]        │
//! └────────────────────────────────────────────┘
//!        │
//!        ▼  subject_tasks()
//!   [(subject, prompt), ...]  →  worker pool
//! ```

pub mod entities;
pub mod value_objects;

pub use entities::{Subject, SubjectCatalog};
pub use value_objects::{Action, QueryKind, TaskDescriptor};
