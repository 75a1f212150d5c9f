//! Propose command: reduce an edit-form submission to its changes

use super::{read_json, write_output};
use brems_core::{changed_only, log_op_end, log_op_error, log_op_start, BremsError, ExError};
use brems_core_types::RequestContext;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ProposeArgs {
    /// Current employee record (employee shape)
    #[arg(long)]
    pub current: PathBuf,

    /// Full edit-form submission
    #[arg(long)]
    pub form: PathBuf,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ProposeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::new();
    log_op_start!("cli_propose", request_id = %ctx.request_id);
    let start = std::time::Instant::now();

    match run(&args, &ctx) {
        Ok(()) => {
            log_op_end!(
                "cli_propose",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id
            );
            Ok(())
        }
        Err(err) => {
            log_op_error!(
                "cli_propose",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id
            );
            Err(err.into())
        }
    }
}

fn run(args: &ProposeArgs, ctx: &RequestContext) -> Result<(), ExError> {
    let current = read_json(&args.current, "load_form", ctx)?;
    let form = read_json(&args.form, "load_form", ctx)?;

    let proposed = changed_only(&current, &form);
    let mut text = serde_json::to_string_pretty(&proposed).map_err(|e| {
        ExError::from(BremsError::Serialization {
            message: e.to_string(),
        })
        .with_request_id(ctx.request_id.clone())
    })?;
    text.push('\n');
    write_output(args.output.as_ref(), &text, "cli_propose", ctx)
}
