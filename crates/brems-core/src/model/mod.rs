pub mod record;
pub mod request;
pub mod value;

pub use record::{Addresses, Family, FlatRecord, ProposedChanges, RecordSnapshot};
pub use request::{parse_proposed_strict, ProposedInput, RequestType, ReviewRequest};
pub use value::FieldValue;
