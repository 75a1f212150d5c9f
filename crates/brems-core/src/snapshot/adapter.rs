use crate::diff::labels::{ACADEMIC_FIELDS, PERSONAL_INFO_LABELS};
use crate::errors::{BremsError, ExError, ExErrorKind};
use crate::log_recovered;
use crate::model::record::{record_list, Addresses, Family, FlatRecord, RecordSnapshot};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Shape the current record arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrentShape {
    /// Decide from the payload itself
    #[default]
    Auto,
    Sectioned,
    Employee,
}

impl CurrentShape {
    /// Resolve `Auto` against a payload.
    ///
    /// A payload with a `personal_info` key, or an object-valued `family` or
    /// `addresses`, is sectioned; everything else is treated as an employee
    /// record.
    pub fn resolve(self, value: &Value) -> CurrentShape {
        match self {
            CurrentShape::Auto => {
                let sectioned = value.as_object().is_some_and(|obj| {
                    obj.contains_key("personal_info")
                        || obj.get("family").is_some_and(Value::is_object)
                        || obj.get("addresses").is_some_and(Value::is_object)
                });
                if sectioned {
                    CurrentShape::Sectioned
                } else {
                    CurrentShape::Employee
                }
            }
            other => other,
        }
    }
}

impl FromStr for CurrentShape {
    type Err = BremsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(CurrentShape::Auto),
            "sectioned" => Ok(CurrentShape::Sectioned),
            "employee" => Ok(CurrentShape::Employee),
            other => Err(BremsError::InvalidInput {
                reason: format!("unknown current-data shape '{}'", other),
            }),
        }
    }
}

/// Build the canonical snapshot from current data in the given shape.
pub fn canonicalize_current(value: &Value, shape: CurrentShape) -> RecordSnapshot {
    match shape.resolve(value) {
        CurrentShape::Employee => from_employee(value),
        _ => from_sectioned(value),
    }
}

/// Current data that is already section-organized.
pub fn from_sectioned(value: &Value) -> RecordSnapshot {
    RecordSnapshot::from_value(value)
}

/// Current data in the flat employee-record shape.
///
/// - personal fields are lifted from the top level (known personal keys only)
/// - `family` is a list; `father`/`mother` take the first entry with that
///   `relation`, `spouse`/`child` entries keep their list order
/// - `addresses` is a list; `present`/`permanent` take the first entry with
///   that `type`
/// - each academic entry is narrowed to the four credential fields
pub fn from_employee(value: &Value) -> RecordSnapshot {
    let Some(obj) = value.as_object() else {
        if !value.is_null() {
            log_recovered!(
                "canonicalize_current",
                &ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_op("canonicalize_current")
                    .with_message("employee record is not an object")
            );
        }
        return RecordSnapshot::default();
    };

    let personal_info: FlatRecord = PERSONAL_INFO_LABELS
        .iter()
        .filter_map(|(key, _)| obj.get(*key).map(|v| (*key, v.clone())))
        .collect();

    let family_list = entity_list(obj, "family");
    let family = Family {
        father: first_with(&family_list, "relation", "father"),
        mother: first_with(&family_list, "relation", "mother"),
        spouses: all_with(&family_list, "relation", "spouse"),
        children: all_with(&family_list, "relation", "child"),
    };

    let address_list = entity_list(obj, "addresses");
    let addresses = Addresses {
        present: first_with(&address_list, "type", "present"),
        permanent: first_with(&address_list, "type", "permanent"),
    };

    let academics: Vec<FlatRecord> = record_list(obj.get("academics"), "academics")
        .into_iter()
        .map(|entry| {
            ACADEMIC_FIELDS
                .iter()
                .map(|(key, _)| (*key, entry.get(key).clone()))
                .collect::<FlatRecord>()
        })
        .collect();

    RecordSnapshot {
        personal_info,
        family,
        addresses,
        academics,
        document_update: obj
            .get("document_update")
            .and_then(Value::as_object)
            .map(FlatRecord::from_object),
    }
}

fn entity_list<'a>(obj: &'a Map<String, Value>, key: &str) -> Vec<&'a Map<String, Value>> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        None | Some(Value::Null) => Vec::new(),
        Some(_) => {
            log_recovered!(
                "canonicalize_current",
                &ExError::new(ExErrorKind::InvalidSnapshot)
                    .with_op("canonicalize_current")
                    .with_section(key)
                    .with_message("expected a list of entities")
            );
            Vec::new()
        }
    }
}

fn has_tag(entity: &Map<String, Value>, tag_key: &str, tag: &str) -> bool {
    entity
        .get(tag_key)
        .and_then(Value::as_str)
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(tag))
}

fn first_with(list: &[&Map<String, Value>], tag_key: &str, tag: &str) -> FlatRecord {
    list.iter()
        .find(|e| has_tag(e, tag_key, tag))
        .map(|e| FlatRecord::from_object(e))
        .unwrap_or_default()
}

fn all_with(list: &[&Map<String, Value>], tag_key: &str, tag: &str) -> Vec<FlatRecord> {
    list.iter()
        .filter(|e| has_tag(e, tag_key, tag))
        .map(|e| FlatRecord::from_object(e))
        .collect()
}
