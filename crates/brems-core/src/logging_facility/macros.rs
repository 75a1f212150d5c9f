//! Canonical logging macros
//!
//! Every review operation logs a `start` event and exactly one `end` or
//! `end_error` event, all tagged with `component` and `op`. Anomalies that
//! the operation absorbs are logged as `recovered` warnings.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use brems_core::log_op_start;
/// log_op_start!("build_change_sections");
/// log_op_start!("build_for_request", approval_request_id = "42", request_type = "Profile Update");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = brems_core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use brems_core::log_op_end;
/// log_op_end!("build_change_sections", duration_ms = 3);
/// log_op_end!("build_change_sections", duration_ms = 3, section_count = 2usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = brems_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log an operation that ended in an error
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError)
/// and logs its kind and stable code.
///
/// # Example
///
/// ```
/// # use brems_core::{log_op_error, errors::BremsError};
/// let err = BremsError::ConfigParse { message: "bad".to_string() };
/// log_op_error!("load_config", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = brems_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)*)?
        );
    }};
}

/// Log an anomaly that was absorbed locally
///
/// Takes an `ExError` describing what was wrong with the input; the
/// operation carries on with a default.
///
/// # Example
///
/// ```
/// # use brems_core::log_recovered;
/// # use brems_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::InvalidProposal).with_message("not json");
/// log_recovered!("normalize_proposed", &err);
/// ```
#[macro_export]
macro_rules! log_recovered {
    ($op:expr, $err:expr) => {{
        let ex_err: &$crate::errors::ExError = $err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = brems_core_types::schema::EVENT_RECOVERED,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            section = ex_err.section().unwrap_or(""),
            field = ex_err.field().unwrap_or(""),
            detail = ex_err.message(),
        );
    }};
}
