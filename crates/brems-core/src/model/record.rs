//! Canonical section-organized employee record.
//!
//! Construction from JSON is lenient: a section with the wrong shape
//! becomes its empty default and the recovery is logged. A record never
//! fails to build.

use crate::errors::{ExError, ExErrorKind};
use crate::log_recovered;
use crate::model::value::{FieldValue, ABSENT};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field name → value mapping for one flat entity (personal info, a
/// parent, an address, an academic credential, ...).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub struct FlatRecord(BTreeMap<String, FieldValue>);

impl FlatRecord {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from a JSON object; anything else yields an empty record.
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(obj) => Self::from_object(obj),
            None => Self::new(),
        }
    }

    pub fn from_object(obj: &Map<String, Value>) -> Self {
        Self(
            obj.iter()
                .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                .collect(),
        )
    }

    /// Value for `key`, [`FieldValue::Absent`] when missing.
    pub fn get(&self, key: &str) -> &FieldValue {
        self.0.get(key).unwrap_or(&ABSENT)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every field is absent (or there are no fields).
    pub fn is_blank(&self) -> bool {
        self.0.values().all(FieldValue::is_absent)
    }
}

impl From<Value> for FlatRecord {
    fn from(value: Value) -> Self {
        FlatRecord::from_value(&value)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FlatRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for FlatRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Family section: both parents plus ordered spouse and child lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Family {
    pub father: FlatRecord,
    pub mother: FlatRecord,
    pub spouses: Vec<FlatRecord>,
    pub children: Vec<FlatRecord>,
}

impl Family {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = section_object(value, "family") else {
            return Self::default();
        };
        Self {
            father: obj.get("father").map(FlatRecord::from_value).unwrap_or_default(),
            mother: obj.get("mother").map(FlatRecord::from_value).unwrap_or_default(),
            spouses: record_list(obj.get("spouses"), "family.spouses"),
            children: record_list(obj.get("children"), "family.children"),
        }
    }
}

impl From<Value> for Family {
    fn from(value: Value) -> Self {
        Family::from_value(&value)
    }
}

/// Present and permanent address pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Addresses {
    pub present: FlatRecord,
    pub permanent: FlatRecord,
}

impl Addresses {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = section_object(value, "addresses") else {
            return Self::default();
        };
        Self {
            present: obj.get("present").map(FlatRecord::from_value).unwrap_or_default(),
            permanent: obj
                .get("permanent")
                .map(FlatRecord::from_value)
                .unwrap_or_default(),
        }
    }
}

impl From<Value> for Addresses {
    fn from(value: Value) -> Self {
        Addresses::from_value(&value)
    }
}

/// Section-organized snapshot of an employee record.
///
/// Used for both sides of a review: the current persisted state and the
/// (sparse) proposed changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RecordSnapshot {
    pub personal_info: FlatRecord,
    pub family: Family,
    pub addresses: Addresses,
    pub academics: Vec<FlatRecord>,
    /// Pending file/document change (`type`, `uploaded_at`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_update: Option<FlatRecord>,
}

/// Proposed changes share the snapshot shape; only changed fields need be present.
pub type ProposedChanges = RecordSnapshot;

impl RecordSnapshot {
    /// Build from a section-organized JSON object.
    ///
    /// Missing sections default to empty. A non-object root yields an empty
    /// snapshot.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            if !value.is_null() {
                log_recovered!(
                    "record_from_value",
                    &ExError::new(ExErrorKind::InvalidSnapshot)
                        .with_message("record root is not an object")
                );
            }
            return Self::default();
        };

        let personal_info = match obj.get("personal_info") {
            Some(v) => section_object(v, "personal_info")
                .map(FlatRecord::from_object)
                .unwrap_or_default(),
            None => FlatRecord::new(),
        };

        Self {
            personal_info,
            family: obj.get("family").map(Family::from_value).unwrap_or_default(),
            addresses: obj
                .get("addresses")
                .map(Addresses::from_value)
                .unwrap_or_default(),
            academics: record_list(obj.get("academics"), "academics"),
            document_update: obj
                .get("document_update")
                .and_then(Value::as_object)
                .map(FlatRecord::from_object),
        }
    }

    /// True when no section carries any non-absent value.
    pub fn is_blank(&self) -> bool {
        self.personal_info.is_blank()
            && self.family.father.is_blank()
            && self.family.mother.is_blank()
            && self.family.spouses.iter().all(FlatRecord::is_blank)
            && self.family.children.iter().all(FlatRecord::is_blank)
            && self.addresses.present.is_blank()
            && self.addresses.permanent.is_blank()
            && self.academics.iter().all(FlatRecord::is_blank)
            && self
                .document_update
                .as_ref()
                .map_or(true, FlatRecord::is_blank)
    }
}

impl From<Value> for RecordSnapshot {
    fn from(value: Value) -> Self {
        RecordSnapshot::from_value(&value)
    }
}

/// Object view of a section, logging (and rejecting) any other shape.
/// `null` counts as a missing section and is not logged.
pub(crate) fn section_object<'a>(value: &'a Value, section: &str) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(obj) => Some(obj),
        Value::Null => None,
        _ => {
            log_recovered!(
                "record_from_value",
                &ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_section(section)
                    .with_message("expected an object; section treated as empty")
            );
            None
        }
    }
}

/// Ordered list of records. Non-object entries keep their index as empty
/// records; a non-array value yields an empty list.
pub(crate) fn record_list(value: Option<&Value>, section: &str) -> Vec<FlatRecord> {
    match value {
        Some(Value::Array(items)) => items.iter().map(FlatRecord::from_value).collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(_) => {
            log_recovered!(
                "record_from_value",
                &ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_section(section)
                    .with_message("expected a list; section treated as empty")
            );
            Vec::new()
        }
    }
}
