//! Subcommands and the file I/O they share

pub mod propose;
pub mod review;

use brems_core::{ExError, ExErrorKind};
use brems_core_types::RequestContext;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Read a file as text, tagging failures with the run's request id.
fn read_text(path: &Path, op: &str, ctx: &RequestContext) -> Result<String, ExError> {
    std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op(op)
            .with_request_id(ctx.request_id.clone())
            .with_message(format!("{}: {}", path.display(), e))
    })
}

/// Read and parse a JSON file.
pub(crate) fn read_json(path: &Path, op: &str, ctx: &RequestContext) -> Result<Value, ExError> {
    let text = read_text(path, op, ctx)?;
    serde_json::from_str(&text).map_err(|e| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op(op)
            .with_request_id(ctx.request_id.clone())
            .with_message(format!("{} is not valid JSON: {}", path.display(), e))
    })
}

/// Write `text` to `output`, or to stdout when no path is given.
pub(crate) fn write_output(
    output: Option<&PathBuf>,
    text: &str,
    op: &str,
    ctx: &RequestContext,
) -> Result<(), ExError> {
    match output {
        Some(path) => std::fs::write(path, text).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_request_id(ctx.request_id.clone())
                .with_message(format!("{}: {}", path.display(), e))
        }),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}
