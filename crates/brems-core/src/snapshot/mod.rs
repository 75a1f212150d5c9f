//! Current-data adapters.
//!
//! The request-detail API returns the current record in one of two shapes:
//!
//! - **Sectioned**: already organized into `personal_info`, `family`,
//!   `addresses`, `academics`.
//! - **Employee**: the flat employee record, with personal fields at the top
//!   level, a `family` list discriminated by `relation` and an `addresses`
//!   list discriminated by `type`.
//!
//! Both converge on one [`RecordSnapshot`](crate::model::RecordSnapshot)
//! before any comparison runs.

pub mod adapter;

pub use adapter::{canonicalize_current, from_employee, from_sectioned, CurrentShape};
