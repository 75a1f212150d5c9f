//! Profile-request change sets.
//!
//! Compares the current employee record with a proposed update and produces
//! the section-organized rows a reviewer approves or rejects.
//!
//! ## Entry point
//!
//! ```
//! use brems_core::diff::{build_change_sections, render_human_summary};
//! use brems_core::model::ProposedInput;
//! use serde_json::json;
//!
//! let current = json!({"personal_info": {"phone": "01711111111"}});
//! let proposed = ProposedInput::from(json!({"personal_info": {"phone": "01722222222"}}));
//!
//! let sections = build_change_sections(&current, &proposed);
//! assert_eq!(sections[0].title, "Personal information");
//! let summary = render_human_summary(&sections);
//! assert!(summary.contains("| Phone | 01711111111 | 01722222222 |"));
//! ```
//!
//! ## Guarantees
//!
//! - **Fixed order**: sections appear as document update, personal
//!   information, family, addresses, academic records; rows follow the label
//!   tables.
//! - **No noise**: unchanged fields, empty proposals and (by default) clears
//!   never produce rows; empty sections are dropped.
//! - **Total**: malformed or partial input degrades to fewer rows, never to
//!   an error or a panic.

pub mod compare;
pub mod engine;
pub mod human_summary;
pub mod labels;
pub mod model;

pub use compare::is_same;
pub use engine::{build_change_sections, ChangeSetBuilder};
pub use human_summary::render_human_summary;
pub use model::{ChangeRow, ChangeSection, SectionKind};
