//! BREMS Core - profile-request review kernel
//!
//! This crate turns a pending employee profile request into what an
//! administrator reviews, including:
//! - Lenient, section-organized employee record models
//! - Adapters for both shapes of "current data" returned by the API
//! - Proposal normalization (object, JSON-encoded string, or nothing)
//! - The change-set builder with configurable suppression policy
//! - Markdown rendering of change sets
//! - The changed-only proposal builder used when a request is submitted
//!
//! The crate performs no I/O apart from reading an optional config file.

pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod policy;
pub mod proposal;
pub mod snapshot;

// Re-export commonly used types
pub use config::ReviewConfig;
pub use diff::{build_change_sections, render_human_summary, ChangeRow, ChangeSection, ChangeSetBuilder};
pub use errors::{BremsError, ExError, ExErrorKind, Result};
pub use model::{FieldValue, ProposedChanges, ProposedInput, RecordSnapshot, RequestType, ReviewRequest};
pub use policy::{DefaultValueSuppression, EntityKind, NeverSuppress, SuppressionPolicy};
pub use proposal::changed_only;
pub use snapshot::CurrentShape;
