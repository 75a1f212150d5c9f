use brems_core_types::RequestId;
use thiserror::Error;

/// Result type alias using BremsError
pub type Result<T> = std::result::Result<T, BremsError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable by callers, tests and log
/// consumers. The change-set builder itself never returns these: it recovers
/// locally and only logs the code of what it recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    /// Proposed changes are not a JSON object (or not JSON at all)
    InvalidProposal,
    /// A current-data section has an unexpected shape
    InvalidSnapshot,
    /// A scalar position held a structured value
    UnexpectedValueShape,

    // Configuration
    InvalidConfig,
    InvalidDateFormat,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidProposal => "ERR_INVALID_PROPOSAL",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::UnexpectedValueShape => "ERR_UNEXPECTED_VALUE_SHAPE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidDateFormat => "ERR_INVALID_DATE_FORMAT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging (which operation, which section, which field).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    section: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            section: None,
            field: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add record section context (e.g. `family`)
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Add field context (e.g. `dob`)
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the section context, if any
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Get the field context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(section) = &self.section {
            write!(f, " (section: {})", section)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised at the edges of the review tooling
/// (configuration, strict parsing, file access).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BremsError {
    /// Proposed changes could not be parsed as a JSON object
    #[error("Invalid proposed changes: {reason}")]
    InvalidProposal { reason: String },

    /// Input file or argument is unusable
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Configuration file could not be read
    #[error("Cannot read config {path}: {message}")]
    ConfigRead { path: String, message: String },

    /// Configuration file is not valid TOML or has the wrong shape
    #[error("Invalid config: {message}")]
    ConfigParse { message: String },

    /// Configured date display format is not a valid strftime pattern
    #[error("Invalid date format '{format}'")]
    InvalidDateFormat { format: String },

    /// Unknown entity name in a suppression table
    #[error("Unknown family entity '{entity}' in suppress_defaults")]
    UnknownEntity { entity: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Filesystem error
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<BremsError> for ExError {
    fn from(err: BremsError) -> Self {
        match err {
            BremsError::InvalidProposal { reason } => ExError::new(ExErrorKind::InvalidProposal)
                .with_op("parse_proposed")
                .with_message(reason),

            BremsError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            BremsError::ConfigRead { path, message } => ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("{}: {}", path, message)),

            BremsError::ConfigParse { message } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(message),

            BremsError::InvalidDateFormat { format } => {
                ExError::new(ExErrorKind::InvalidDateFormat)
                    .with_op("load_config")
                    .with_field("date_format")
                    .with_message(format!("'{}' is not a valid strftime pattern", format))
            }

            BremsError::UnknownEntity { entity } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_section("suppress_defaults")
                .with_message(format!("unknown entity '{}'", entity)),

            BremsError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            BremsError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to BremsError
impl From<serde_json::Error> for BremsError {
    fn from(err: serde_json::Error) -> Self {
        BremsError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from std::io::Error to BremsError
impl From<std::io::Error> for BremsError {
    fn from(err: std::io::Error) -> Self {
        BremsError::Io {
            message: err.to_string(),
        }
    }
}
