//! Review command: build the change set a reviewer sees

use super::{read_json, write_output};
use brems_core::config::CONFIG_ENV_VAR;
use brems_core::model::parse_proposed_strict;
use brems_core::{
    log_op_end, log_op_error, log_op_start, render_human_summary, ChangeSetBuilder, CurrentShape,
    ExError, ProposedInput, RequestType, ReviewConfig, ReviewRequest,
};
use brems_core_types::RequestContext;
use clap::{Args, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown tables, one per section
    Markdown,
    /// The change sections as JSON
    Json,
}

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Request-detail payload (id, request_type, details, current_data, proposed_changes)
    #[arg(long, conflicts_with_all = ["current", "proposed", "request_type", "details"])]
    pub request: Option<PathBuf>,

    /// Current record, sectioned or employee shaped
    #[arg(long, required_unless_present = "request")]
    pub current: Option<PathBuf>,

    /// Proposed changes: a JSON object, or a JSON string holding encoded JSON
    #[arg(long)]
    pub proposed: Option<PathBuf>,

    /// Request type label (used with --current)
    #[arg(long)]
    pub request_type: Option<String>,

    /// Free-text request details, shown when a document update carries no document diff
    #[arg(long)]
    pub details: Option<String>,

    /// Shape of the current record
    #[arg(long, default_value = "auto")]
    pub shape: CurrentShape,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// TOML review configuration
    #[arg(long, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Override the configured date display format (strftime)
    #[arg(long)]
    pub date_format: Option<String>,

    /// Fail on malformed proposed changes instead of treating them as empty
    #[arg(long)]
    pub strict: bool,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ReviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = RequestContext::new();
    log_op_start!("cli_review", request_id = %ctx.request_id);
    let start = std::time::Instant::now();

    match run(&args, &mut ctx) {
        Ok(rows) => {
            log_op_end!(
                "cli_review",
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id,
                approval_request_id = ctx.approval_request_id.as_deref().unwrap_or(""),
                row_count = rows
            );
            Ok(())
        }
        Err(err) => {
            log_op_error!(
                "cli_review",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = %ctx.request_id
            );
            Err(err.into())
        }
    }
}

fn run(args: &ReviewArgs, ctx: &mut RequestContext) -> Result<usize, ExError> {
    let builder = builder_for(args, ctx)?;
    let request = load_request(args, ctx)?;
    ctx.approval_request_id = request.id_text();

    if args.strict {
        check_proposed(&request.proposed_changes, ctx)?;
    }

    let sections = builder.build_for_request(&request);
    let rows = sections.iter().map(|s| s.rows.len()).sum();

    let text = match args.format {
        OutputFormat::Markdown => render_human_summary(&sections),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&sections).map_err(|e| {
                ExError::from(brems_core::BremsError::Serialization {
                    message: e.to_string(),
                })
                .with_request_id(ctx.request_id.clone())
            })?;
            json.push('\n');
            json
        }
    };
    write_output(args.output.as_ref(), &text, "cli_review", ctx)?;
    Ok(rows)
}

fn builder_for(args: &ReviewArgs, ctx: &RequestContext) -> Result<ChangeSetBuilder, ExError> {
    let config = match &args.config {
        Some(path) => ReviewConfig::load(path)
            .map_err(|e| ExError::from(e).with_request_id(ctx.request_id.clone()))?,
        None => ReviewConfig::default(),
    };
    let builder = ChangeSetBuilder::from_config(&config).with_shape(args.shape);
    match &args.date_format {
        Some(format) => builder
            .with_date_format(format.clone())
            .map_err(|e| ExError::from(e).with_request_id(ctx.request_id.clone())),
        None => Ok(builder),
    }
}

fn load_request(args: &ReviewArgs, ctx: &RequestContext) -> Result<ReviewRequest, ExError> {
    if let Some(path) = &args.request {
        let value = read_json(path, "load_request", ctx)?;
        return serde_json::from_value(value).map_err(|e| {
            ExError::from(brems_core::BremsError::InvalidInput {
                reason: format!("{} is not a request payload: {}", path.display(), e),
            })
            .with_op("load_request")
            .with_request_id(ctx.request_id.clone())
        });
    }

    let current_data = match &args.current {
        Some(path) => read_json(path, "load_request", ctx)?,
        None => Value::Null,
    };
    let proposed_changes = match &args.proposed {
        Some(path) => ProposedInput::from(read_json(path, "load_request", ctx)?),
        None => ProposedInput::Missing,
    };

    Ok(ReviewRequest {
        request_type: args
            .request_type
            .as_deref()
            .map(RequestType::from)
            .unwrap_or_default(),
        details: args.details.clone(),
        current_data,
        proposed_changes,
        ..ReviewRequest::default()
    })
}

fn check_proposed(proposed: &ProposedInput, ctx: &RequestContext) -> Result<(), ExError> {
    let text = match proposed {
        ProposedInput::Missing => return Ok(()),
        ProposedInput::Object(value) => value.to_string(),
        ProposedInput::Encoded(text) => text.clone(),
    };
    parse_proposed_strict(&text)
        .map(|_| ())
        .map_err(|e| e.with_request_id(ctx.request_id.clone()))
}

