//! Changed-only proposal builder.
//!
//! The edit form submits the whole employee profile. Before a profile
//! request is stored, the submission is narrowed to the sections and fields
//! that actually differ from the current employee record, so reviewers (and
//! [`ChangeSetBuilder`](crate::diff::ChangeSetBuilder)) see only real edits.

use crate::diff::compare::is_same;
use crate::diff::labels::{ACADEMIC_FIELDS, ADDRESS_LABELS, PERSONAL_INFO_LABELS};
use crate::model::{FlatRecord, RecordSnapshot};
use crate::snapshot::from_employee;
use crate::{log_op_end, log_op_start};
use serde_json::{Map, Value};

/// Fields a parent entry owns on the edit form.
const PARENT_FIELDS: &[&str] = &["name", "name_bn", "nid", "dob", "occupation", "is_alive"];

/// Build a sparse `proposed_changes` object from a full form submission.
///
/// - `personal_info`: form fields (read from the top level of `form`) that
///   are non-empty and differ from the current record
/// - `family.father` / `family.mother`: differing parent fields; a field the
///   form leaves empty is sent as `null` to clear it
/// - `family.spouses` / `family.children`: the whole submitted list when it
///   differs in length or content
/// - `addresses.present` / `addresses.permanent`: differing non-empty fields
/// - `academics`: the whole submitted list, narrowed to the credential
///   fields, when it differs in length or any entry
///
/// Sections the form does not carry, or where nothing changed, are omitted.
/// A non-object form yields `{}`.
pub fn changed_only(current_employee: &Value, form: &Value) -> Value {
    let Some(form_obj) = form.as_object() else {
        return Value::Object(Map::new());
    };
    log_op_start!("changed_only");
    let start = std::time::Instant::now();

    let current = from_employee(current_employee);
    let mut out = Map::new();

    if let Some(personal) = changed_personal(&current.personal_info, &FlatRecord::from_object(form_obj)) {
        out.insert("personal_info".to_string(), personal);
    }
    if let Some(family) = form_obj.get("family").and_then(|f| changed_family(&current, f)) {
        out.insert("family".to_string(), family);
    }
    if let Some(addresses) = form_obj
        .get("addresses")
        .and_then(|a| changed_addresses(&current, a))
    {
        out.insert("addresses".to_string(), addresses);
    }
    if let Some(academics) = form_obj
        .get("academics")
        .and_then(|a| changed_academics(&current.academics, a))
    {
        out.insert("academics".to_string(), academics);
    }

    log_op_end!(
        "changed_only",
        duration_ms = start.elapsed().as_millis() as u64,
        section_count = out.len()
    );
    Value::Object(out)
}

fn non_empty(map: Map<String, Value>) -> Option<Value> {
    (!map.is_empty()).then_some(Value::Object(map))
}

fn changed_personal(current: &FlatRecord, form: &FlatRecord) -> Option<Value> {
    let out: Map<String, Value> = PERSONAL_INFO_LABELS
        .iter()
        .filter_map(|(key, _)| {
            let next = form.get(key);
            (!next.is_absent() && !is_same(current.get(key), next, key))
                .then(|| (key.to_string(), next.to_value()))
        })
        .collect();
    non_empty(out)
}

fn changed_parent(current: &FlatRecord, proposed: &FlatRecord) -> Option<Value> {
    let out: Map<String, Value> = PARENT_FIELDS
        .iter()
        .filter_map(|key| {
            let (prev, next) = (current.get(key), proposed.get(key));
            (!is_same(prev, next, key)).then(|| (key.to_string(), next.to_value()))
        })
        .collect();
    non_empty(out)
}

fn changed_family(current: &RecordSnapshot, form_family: &Value) -> Option<Value> {
    let form_family = form_family.as_object()?;
    let parent = |key: &str| {
        form_family
            .get(key)
            .map(FlatRecord::from_value)
            .unwrap_or_default()
    };
    let list = |key: &str| -> (Vec<FlatRecord>, Value) {
        match form_family.get(key) {
            Some(Value::Array(items)) => (
                items.iter().map(FlatRecord::from_value).collect(),
                Value::Array(items.clone()),
            ),
            _ => (Vec::new(), Value::Array(Vec::new())),
        }
    };

    let mut out = Map::new();
    if let Some(father) = changed_parent(&current.family.father, &parent("father")) {
        out.insert("father".to_string(), father);
    }
    if let Some(mother) = changed_parent(&current.family.mother, &parent("mother")) {
        out.insert("mother".to_string(), mother);
    }
    let (spouses, raw_spouses) = list("spouses");
    if spouses != current.family.spouses {
        out.insert("spouses".to_string(), raw_spouses);
    }
    let (children, raw_children) = list("children");
    if children != current.family.children {
        out.insert("children".to_string(), raw_children);
    }
    non_empty(out)
}

fn changed_address(current: &FlatRecord, proposed: &FlatRecord) -> Option<Value> {
    let out: Map<String, Value> = ADDRESS_LABELS
        .iter()
        .filter_map(|(key, _)| {
            let next = proposed.get(key);
            (!next.is_absent() && !is_same(current.get(key), next, key))
                .then(|| (key.to_string(), next.to_value()))
        })
        .collect();
    non_empty(out)
}

fn changed_addresses(current: &RecordSnapshot, form_addresses: &Value) -> Option<Value> {
    let form_addresses = form_addresses.as_object()?;
    let mut out = Map::new();
    for (kind, cur) in [
        ("present", &current.addresses.present),
        ("permanent", &current.addresses.permanent),
    ] {
        let proposed = form_addresses
            .get(kind)
            .map(FlatRecord::from_value)
            .unwrap_or_default();
        if let Some(changed) = changed_address(cur, &proposed) {
            out.insert(kind.to_string(), changed);
        }
    }
    non_empty(out)
}

/// Academic entry narrowed to the credential fields, empty ones as `""`.
fn academic_entry(record: &FlatRecord) -> Map<String, Value> {
    ACADEMIC_FIELDS
        .iter()
        .map(|(key, _)| {
            let value = match record.get(key) {
                v if v.is_absent() => Value::String(String::new()),
                v => v.to_value(),
            };
            (key.to_string(), value)
        })
        .collect()
}

fn changed_academics(current: &[FlatRecord], form_academics: &Value) -> Option<Value> {
    let proposed: Vec<FlatRecord> = match form_academics {
        Value::Array(items) => items.iter().map(FlatRecord::from_value).collect(),
        _ => Vec::new(),
    };
    let changed = current.len() != proposed.len()
        || proposed.iter().zip(current).any(|(p, c)| {
            ACADEMIC_FIELDS
                .iter()
                .any(|(key, _)| !is_same(c.get(key), p.get(key), key))
        });
    changed.then(|| {
        Value::Array(
            proposed
                .iter()
                .map(|p| Value::Object(academic_entry(p)))
                .collect(),
        )
    })
}
