//! Canonical schema constants for structured logging and events
//!
//! These constants keep log field names identical between the library,
//! the CLI and any log consumer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Review identifiers
pub const FIELD_APPROVAL_REQUEST_ID: &str = "approval_request_id";
pub const FIELD_REQUEST_TYPE: &str = "request_type";
pub const FIELD_SECTION: &str = "section";
pub const FIELD_FIELD: &str = "field";

// Result sizes
pub const FIELD_SECTION_COUNT: &str = "section_count";
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_RECOVERED: &str = "recovered";
