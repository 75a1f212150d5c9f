//! Review request payloads: the proposal in whichever form it arrives,
//! the request type and the request envelope returned by the API.

use crate::errors::{BremsError, ExError, ExErrorKind};
use crate::log_recovered;
use crate::model::record::{ProposedChanges, RecordSnapshot};
use crate::model::value::FieldValue;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Proposed changes as received, before normalization.
///
/// Requests stored by older clients carry the proposal as a JSON-encoded
/// string; newer ones carry the object itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProposedInput {
    #[default]
    Missing,
    Object(Value),
    Encoded(String),
}

impl ProposedInput {
    /// Resolve to a concrete snapshot. Never fails: undecodable or
    /// non-object input becomes an empty snapshot and the recovery is logged.
    pub fn normalize(&self) -> ProposedChanges {
        match self {
            ProposedInput::Missing => RecordSnapshot::default(),
            ProposedInput::Object(value) => {
                if value.is_object() {
                    RecordSnapshot::from_value(value)
                } else {
                    let err = ExError::new(ExErrorKind::InvalidProposal)
                        .with_op("normalize_proposed")
                        .with_message("proposed changes are not an object");
                    log_recovered!("normalize_proposed", &err);
                    RecordSnapshot::default()
                }
            }
            ProposedInput::Encoded(text) => match parse_proposed_strict(text) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    log_recovered!("normalize_proposed", &err);
                    RecordSnapshot::default()
                }
            },
        }
    }
}

impl From<Value> for ProposedInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ProposedInput::Missing,
            Value::String(s) => ProposedInput::Encoded(s),
            other => ProposedInput::Object(other),
        }
    }
}

impl From<&str> for ProposedInput {
    fn from(s: &str) -> Self {
        ProposedInput::Encoded(s.to_string())
    }
}

impl<'de> Deserialize<'de> for ProposedInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ProposedInput::from)
    }
}

impl Serialize for ProposedInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProposedInput::Missing => serializer.serialize_none(),
            ProposedInput::Object(v) => v.serialize(serializer),
            ProposedInput::Encoded(s) => serializer.serialize_str(s),
        }
    }
}

/// Parse a JSON-encoded proposal, rejecting anything that is not an object.
///
/// # Errors
///
/// `InvalidProposal` when the text is not JSON or its root is not an object.
pub fn parse_proposed_strict(text: &str) -> Result<ProposedChanges, ExError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        ExError::from(BremsError::InvalidProposal {
            reason: format!("proposed changes are not valid JSON: {}", e),
        })
    })?;
    if !value.is_object() {
        return Err(ExError::from(BremsError::InvalidProposal {
            reason: "proposed changes JSON root must be an object".to_string(),
        }));
    }
    Ok(RecordSnapshot::from_value(&value))
}

/// Kind of profile request. Only `Document Update` changes builder behavior.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestType {
    DocumentUpdate,
    #[default]
    ProfileUpdate,
    Other(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            RequestType::DocumentUpdate => "Document Update",
            RequestType::ProfileUpdate => "Profile Update",
            RequestType::Other(s) => s,
        }
    }

    pub fn is_document_update(&self) -> bool {
        matches!(self, RequestType::DocumentUpdate)
    }
}

impl From<&str> for RequestType {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Document Update" => RequestType::DocumentUpdate,
            "Profile Update" => RequestType::ProfileUpdate,
            other => RequestType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RequestType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(RequestType::from).unwrap_or_default())
    }
}

/// A profile request as returned by the request-detail endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub id: FieldValue,
    #[serde(default)]
    pub request_type: RequestType,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Current record in either the sectioned or the employee shape
    #[serde(default)]
    pub current_data: Value,
    #[serde(default)]
    pub proposed_changes: ProposedInput,
}

impl ReviewRequest {
    /// Request ID as text, for log correlation.
    pub fn id_text(&self) -> Option<String> {
        self.id.raw_text().map(|s| s.into_owned())
    }
}
