//! Change-set computation engine.
//!
//! The core entry points are [`build_change_sections`] and
//! [`ChangeSetBuilder::build_for_request`]. Both take the current record in
//! either shape and the proposal in any of its encodings, and produce the
//! ordered, non-empty [`ChangeSection`]s a reviewer sees.

use crate::config::{validate_date_format, ReviewConfig};
use crate::diff::compare::{
    format_date_value, format_upload_time, format_value, is_same, ABSENT_DISPLAY,
    DEFAULT_DATE_FORMAT,
};
use crate::diff::labels::{
    is_date_key, label_for, ordered_keys, LabelTable, ACADEMIC_FIELDS, ADDRESS_LABELS,
    FAMILY_FIELD_LABELS, NESTED_SKIP_KEYS, PERSONAL_INFO_LABELS, PREFIX_SEPARATOR,
};
use crate::diff::model::{row_count, ChangeRow, ChangeSection, SectionKind};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{FieldValue, FlatRecord, ProposedChanges, ProposedInput, RecordSnapshot, ReviewRequest};
use crate::policy::{DefaultValueSuppression, EntityKind, SuppressionPolicy};
use crate::snapshot::{canonicalize_current, CurrentShape};
use crate::{log_op_end, log_op_start, log_recovered};
use serde_json::Value;
use std::fmt;

/// Label of the single row in the document fallback section.
pub const FALLBACK_SUMMARY_LABEL: &str = "Summary";

/// Computes review rows from a current record and a proposal.
///
/// Holds only immutable configuration; share it freely across threads.
pub struct ChangeSetBuilder {
    policy: Box<dyn SuppressionPolicy>,
    date_format: String,
    shape: CurrentShape,
}

impl fmt::Debug for ChangeSetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeSetBuilder")
            .field("date_format", &self.date_format)
            .field("shape", &self.shape)
            .field("report_cleared_fields", &self.policy.report_cleared_fields())
            .finish_non_exhaustive()
    }
}

impl Default for ChangeSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeSetBuilder {
    /// Builder with the default suppression rules and date format.
    pub fn new() -> Self {
        Self {
            policy: Box::new(DefaultValueSuppression::default()),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            shape: CurrentShape::Auto,
        }
    }

    /// Builder configured from a validated [`ReviewConfig`].
    pub fn from_config(config: &ReviewConfig) -> Self {
        Self {
            policy: Box::new(config.suppression_policy()),
            date_format: config.date_format.clone(),
            shape: CurrentShape::Auto,
        }
    }

    pub fn with_policy(mut self, policy: impl SuppressionPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Force the current-data shape instead of detecting it.
    pub fn with_shape(mut self, shape: CurrentShape) -> Self {
        self.shape = shape;
        self
    }

    /// # Errors
    ///
    /// `InvalidDateFormat` when `format` is not a valid strftime pattern.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        validate_date_format(&format)?;
        self.date_format = format;
        Ok(self)
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Rows for canonical snapshots, in fixed section order, empty sections dropped.
    pub fn build(&self, current: &RecordSnapshot, proposed: &ProposedChanges) -> Vec<ChangeSection> {
        log_op_start!("build_change_sections");
        let start = std::time::Instant::now();

        let sections = self.sections(current, proposed);

        log_op_end!(
            "build_change_sections",
            duration_ms = start.elapsed().as_millis() as u64,
            section_count = sections.len(),
            row_count = row_count(&sections)
        );
        sections
    }

    /// Rows for raw inputs: `current` in either shape, the proposal in any encoding.
    pub fn build_from_json(&self, current: &Value, proposed: &ProposedInput) -> Vec<ChangeSection> {
        let current = canonicalize_current(current, self.shape);
        let proposed = proposed.normalize();
        self.build(&current, &proposed)
    }

    /// Rows for a stored profile request.
    ///
    /// For `Document Update` requests whose proposal yields no rows at all,
    /// the request's `details` text is shown as a one-row document section.
    pub fn build_for_request(&self, request: &ReviewRequest) -> Vec<ChangeSection> {
        let request_id = request.id_text().unwrap_or_default();
        log_op_start!(
            "build_for_request",
            approval_request_id = request_id.as_str(),
            request_type = request.request_type.as_str()
        );
        let start = std::time::Instant::now();

        let current = canonicalize_current(&request.current_data, self.shape);
        let proposed = request.proposed_changes.normalize();
        let mut sections = self.sections(&current, &proposed);

        if request.request_type.is_document_update() {
            if let Some(fallback) = document_fallback(&sections, request.details.as_deref()) {
                tracing::debug!(
                    op = "build_for_request",
                    approval_request_id = request_id.as_str(),
                    "empty change set; showing request details"
                );
                sections.push(fallback);
            }
        }

        log_op_end!(
            "build_for_request",
            duration_ms = start.elapsed().as_millis() as u64,
            approval_request_id = request_id.as_str(),
            section_count = sections.len(),
            row_count = row_count(&sections)
        );
        sections
    }

    fn sections(&self, current: &RecordSnapshot, proposed: &ProposedChanges) -> Vec<ChangeSection> {
        SectionKind::ORDERED
            .into_iter()
            .filter_map(|kind| {
                let rows = match kind {
                    SectionKind::DocumentUpdate => self.diff_document(proposed),
                    SectionKind::PersonalInfo => {
                        self.diff_flat(&current.personal_info, &proposed.personal_info)
                    }
                    SectionKind::Family => self.diff_family(current, proposed),
                    SectionKind::Addresses => self.diff_addresses(current, proposed),
                    SectionKind::Academics => {
                        self.diff_academics(&current.academics, &proposed.academics)
                    }
                };
                (!rows.is_empty()).then(|| ChangeSection::new(kind, rows))
            })
            .collect()
    }

    /// A difference becomes a row unless the values match or the proposal
    /// clears the field (clears only show when the policy asks for them).
    fn is_reportable(&self, key: &str, previous: &FieldValue, proposed: &FieldValue) -> bool {
        if is_same(previous, proposed, key) {
            return false;
        }
        !proposed.is_absent() || self.policy.report_cleared_fields()
    }

    fn display(&self, section: SectionKind, key: &str, value: &FieldValue) -> String {
        if matches!(value, FieldValue::Structured(_)) {
            recover_structured(section, key);
        }
        if is_date_key(key) {
            format_date_value(value, &self.date_format)
        } else {
            format_value(value)
        }
    }

    fn row(
        &self,
        section: SectionKind,
        label: String,
        key: &str,
        previous: &FieldValue,
        proposed: &FieldValue,
    ) -> ChangeRow {
        ChangeRow::new(
            label,
            self.display(section, key, previous),
            self.display(section, key, proposed),
        )
    }

    fn diff_document(&self, proposed: &ProposedChanges) -> Vec<ChangeRow> {
        let Some(doc) = proposed.document_update.as_ref() else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        let kind = doc.get("type");
        if let Some(text) = kind.raw_text() {
            if matches!(kind, FieldValue::Structured(_)) {
                recover_structured(SectionKind::DocumentUpdate, "type");
            }
            rows.push(ChangeRow::new("Document / file type", ABSENT_DISPLAY, text));
        }
        let uploaded_at = doc.get("uploaded_at");
        if !is_unset_timestamp(uploaded_at) {
            if matches!(uploaded_at, FieldValue::Structured(_)) {
                recover_structured(SectionKind::DocumentUpdate, "uploaded_at");
            }
            rows.push(ChangeRow::new(
                "Uploaded at",
                ABSENT_DISPLAY,
                format_upload_time(uploaded_at, &self.date_format),
            ));
        }
        rows
    }

    fn diff_flat(&self, current: &FlatRecord, proposed: &FlatRecord) -> Vec<ChangeRow> {
        let keys = ordered_keys(PERSONAL_INFO_LABELS, current.keys().chain(proposed.keys()));
        keys.into_iter()
            .filter_map(|key| {
                let (prev, next) = (current.get(key), proposed.get(key));
                self.is_reportable(key, prev, next).then(|| {
                    self.row(
                        SectionKind::PersonalInfo,
                        label_for(PERSONAL_INFO_LABELS, key),
                        key,
                        prev,
                        next,
                    )
                })
            })
            .collect()
    }

    fn diff_nested(
        &self,
        entity: EntityKind,
        index: Option<usize>,
        current: &FlatRecord,
        proposed: &FlatRecord,
    ) -> Vec<ChangeRow> {
        let prefix = entity.prefix(index);
        let keys = ordered_keys(FAMILY_FIELD_LABELS, current.keys().chain(proposed.keys()));
        keys.into_iter()
            .filter(|key| !NESTED_SKIP_KEYS.contains(key))
            .filter_map(|key| {
                let (prev, next) = (current.get(key), proposed.get(key));
                if !self.is_reportable(key, prev, next)
                    || self.policy.suppress_nested(entity, key, prev, next)
                {
                    return None;
                }
                let label = format!(
                    "{}{}{}",
                    prefix,
                    PREFIX_SEPARATOR,
                    label_for(FAMILY_FIELD_LABELS, key)
                );
                Some(self.row(SectionKind::Family, label, key, prev, next))
            })
            .collect()
    }

    fn diff_nested_list(
        &self,
        entity: EntityKind,
        current: &[FlatRecord],
        proposed: &[FlatRecord],
    ) -> Vec<ChangeRow> {
        let empty = FlatRecord::new();
        (0..current.len().max(proposed.len()))
            .flat_map(|i| {
                self.diff_nested(
                    entity,
                    Some(i),
                    current.get(i).unwrap_or(&empty),
                    proposed.get(i).unwrap_or(&empty),
                )
            })
            .collect()
    }

    fn diff_family(&self, current: &RecordSnapshot, proposed: &ProposedChanges) -> Vec<ChangeRow> {
        let (cur, prop) = (&current.family, &proposed.family);
        let mut rows = self.diff_nested(EntityKind::Father, None, &cur.father, &prop.father);
        rows.extend(self.diff_nested(EntityKind::Mother, None, &cur.mother, &prop.mother));
        rows.extend(self.diff_nested_list(EntityKind::Spouse, &cur.spouses, &prop.spouses));
        rows.extend(self.diff_nested_list(EntityKind::Child, &cur.children, &prop.children));
        rows
    }

    /// Compare only the keys of a fixed table, with each label prefixed.
    fn diff_fixed(
        &self,
        section: SectionKind,
        table: LabelTable,
        prefix: &str,
        current: &FlatRecord,
        proposed: &FlatRecord,
    ) -> Vec<ChangeRow> {
        table
            .iter()
            .filter_map(|(key, label)| {
                let (prev, next) = (current.get(key), proposed.get(key));
                self.is_reportable(key, prev, next).then(|| {
                    let label = format!("{}{}{}", prefix, PREFIX_SEPARATOR, label);
                    self.row(section, label, key, prev, next)
                })
            })
            .collect()
    }

    fn diff_addresses(&self, current: &RecordSnapshot, proposed: &ProposedChanges) -> Vec<ChangeRow> {
        let (cur, prop) = (&current.addresses, &proposed.addresses);
        let mut rows = self.diff_fixed(
            SectionKind::Addresses,
            ADDRESS_LABELS,
            "Present address",
            &cur.present,
            &prop.present,
        );
        rows.extend(self.diff_fixed(
            SectionKind::Addresses,
            ADDRESS_LABELS,
            "Permanent address",
            &cur.permanent,
            &prop.permanent,
        ));
        rows
    }

    fn diff_academics(&self, current: &[FlatRecord], proposed: &[FlatRecord]) -> Vec<ChangeRow> {
        let empty = FlatRecord::new();
        (0..current.len().max(proposed.len()))
            .flat_map(|i| {
                self.diff_fixed(
                    SectionKind::Academics,
                    ACADEMIC_FIELDS,
                    &format!("Academic {}", i + 1),
                    current.get(i).unwrap_or(&empty),
                    proposed.get(i).unwrap_or(&empty),
                )
            })
            .collect()
    }
}

/// `uploaded_at` values that mean "not uploaded": absent, `false` or zero.
fn is_unset_timestamp(value: &FieldValue) -> bool {
    match value {
        FieldValue::Absent | FieldValue::Bool(false) => true,
        FieldValue::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn recover_structured(section: SectionKind, key: &str) {
    log_recovered!(
        "build_change_sections",
        &ExError::new(ExErrorKind::UnexpectedValueShape)
            .with_op("build_change_sections")
            .with_section(section.key())
            .with_field(key)
            .with_message("structured value in a scalar field; shown as JSON")
    );
}

/// Fallback document section built from request details, when the change
/// set is otherwise empty and the details are not blank.
fn document_fallback(sections: &[ChangeSection], details: Option<&str>) -> Option<ChangeSection> {
    if !sections.is_empty() {
        return None;
    }
    let details = details.map(str::trim).filter(|d| !d.is_empty())?;
    Some(ChangeSection::new(
        SectionKind::DocumentUpdate,
        vec![ChangeRow::new(FALLBACK_SUMMARY_LABEL, ABSENT_DISPLAY, details)],
    ))
}

/// Rows for `current` (either shape, auto-detected) against `proposed`,
/// using the default suppression rules.
///
/// Never fails: malformed input degrades to empty sections. An empty result
/// means nothing reportable changed.
pub fn build_change_sections(current: &Value, proposed: &ProposedInput) -> Vec<ChangeSection> {
    ChangeSetBuilder::new().build_from_json(current, proposed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::NeverSuppress;
    use serde_json::json;

    fn build(current: Value, proposed: Value) -> Vec<ChangeSection> {
        build_change_sections(&current, &ProposedInput::from(proposed))
    }

    #[test]
    fn test_phone_change_produces_single_row() {
        let sections = build(
            json!({"personal_info": {"phone": "01711111111", "first_name": "Rahim"}}),
            json!({"personal_info": {"phone": "01722222222", "first_name": "Rahim"}}),
        );
        assert_eq!(
            sections,
            vec![ChangeSection::new(
                SectionKind::PersonalInfo,
                vec![ChangeRow::new("Phone", "01711111111", "01722222222")]
            )]
        );
    }

    #[test]
    fn test_personal_rows_follow_table_then_sorted_unknown() {
        let sections = build(
            json!({"personal_info": {}}),
            json!({"personal_info": {
                "tin_number": "1",
                "phone": "2",
                "first_name": "3",
                "emergency_contact": "4"
            }}),
        );
        let labels: Vec<_> = sections[0].rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["First name", "Phone", "Emergency Contact", "Tin Number"]);
    }

    #[test]
    fn test_dob_rendered_and_compared_as_calendar_date() {
        let unchanged = build(
            json!({"personal_info": {"dob": "1990-05-01"}}),
            json!({"personal_info": {"dob": "1990-05-01T00:00:00.000Z"}}),
        );
        assert!(unchanged.is_empty());

        let changed = build(
            json!({"personal_info": {"dob": "1990-05-01"}}),
            json!({"personal_info": {"dob": "1991-06-02"}}),
        );
        assert_eq!(
            changed[0].rows,
            vec![ChangeRow::new("Date of birth", "01 May 1990", "02 Jun 1991")]
        );
    }

    #[test]
    fn test_clear_not_reported_by_default() {
        let current = json!({"personal_info": {"passport": "A123"}});
        let proposed = json!({"personal_info": {"passport": ""}});
        assert!(build(current.clone(), proposed.clone()).is_empty());

        let builder = ChangeSetBuilder::new().with_policy(NeverSuppress);
        let sections = builder.build_from_json(&current, &ProposedInput::from(proposed));
        assert_eq!(sections[0].rows, vec![ChangeRow::new("Passport", "A123", "—")]);
    }

    #[test]
    fn test_nested_rows_are_prefixed_and_skip_bookkeeping() {
        let sections = build(
            json!({"family": {"father": {"id": 3, "name": "Karim", "relation": "father"}}}),
            json!({"family": {"father": {"id": 4, "name": "Karim Uddin", "updated_at": "x"}}}),
        );
        assert_eq!(
            sections,
            vec![ChangeSection::new(
                SectionKind::Family,
                vec![ChangeRow::new("Father – Name", "Karim", "Karim Uddin")]
            )]
        );
    }

    #[test]
    fn test_is_alive_default_suppressed_but_real_change_shown() {
        let suppressed = build(
            json!({"family": {"father": {"name": "Karim"}}}),
            json!({"family": {"father": {"name": "Karim", "is_alive": true}}}),
        );
        assert!(suppressed.is_empty());

        let shown = build(
            json!({"family": {"mother": {"is_alive": true}}}),
            json!({"family": {"mother": {"is_alive": false}}}),
        );
        assert_eq!(shown[0].rows, vec![ChangeRow::new("Mother – Alive", "Yes", "No")]);
    }

    #[test]
    fn test_list_growth_reports_new_entries() {
        let sections = build(
            json!({"family": {"children": [{"name": "Sara"}]}}),
            json!({"family": {"children": [{"name": "Sara"}, {"name": "Omar", "dob": "2015-01-09"}]}}),
        );
        assert_eq!(
            sections[0].rows,
            vec![
                ChangeRow::new("Child 2 – Name", "—", "Omar"),
                ChangeRow::new("Child 2 – Date of birth", "—", "09 Jan 2015"),
            ]
        );
    }

    #[test]
    fn test_addresses_and_academics_use_fixed_keys() {
        let sections = build(
            json!({
                "addresses": {"present": {"district": "Dhaka"}},
                "academics": [{"exam_name": "SSC", "result": "4.50"}]
            }),
            json!({
                "addresses": {"present": {"district": "Khulna", "zip": "9000"}},
                "academics": [{"exam_name": "SSC", "result": "5.00", "board": "Dhaka"}]
            }),
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(
            sections[0].rows,
            vec![ChangeRow::new("Present address – District", "Dhaka", "Khulna")]
        );
        assert_eq!(sections[1].title, "Academic records");
        assert_eq!(
            sections[1].rows,
            vec![ChangeRow::new("Academic 1 – Result", "4.50", "5.00")]
        );
    }

    #[test]
    fn test_document_rows_come_first() {
        let sections = build(
            json!({"personal_info": {"phone": "1"}}),
            json!({
                "personal_info": {"phone": "2"},
                "document_update": {"type": "NID", "uploaded_at": "2024-03-05T10:00:00Z"}
            }),
        );
        assert_eq!(sections[0].title, "Document / file update");
        assert_eq!(
            sections[0].rows,
            vec![
                ChangeRow::new("Document / file type", "—", "NID"),
                ChangeRow::new("Uploaded at", "—", "05 Mar 2024"),
            ]
        );
        assert_eq!(sections[1].title, "Personal information");
    }

    #[test]
    fn test_unset_upload_time_has_no_row() {
        for uploaded_at in [json!(false), json!(0), json!(0.0), json!(""), json!(null)] {
            let sections = build(
                json!({}),
                json!({"document_update": {"type": "NID", "uploaded_at": uploaded_at}}),
            );
            assert_eq!(
                sections[0].rows,
                vec![ChangeRow::new("Document / file type", "—", "NID")],
                "uploaded_at = {}",
                uploaded_at
            );
        }

        let sections = build(json!({}), json!({"document_update": {"uploaded_at": 1700000000}}));
        assert_eq!(
            sections[0].rows,
            vec![ChangeRow::new("Uploaded at", "—", "1700000000")]
        );
    }

    #[test]
    fn test_document_fallback_from_details() {
        let request: ReviewRequest = serde_json::from_value(json!({
            "request_type": "Document Update",
            "details": "  Uploaded new NID scan  ",
            "current_data": {},
            "proposed_changes": {}
        }))
        .unwrap();
        let sections = ChangeSetBuilder::new().build_for_request(&request);
        assert_eq!(
            sections,
            vec![ChangeSection::new(
                SectionKind::DocumentUpdate,
                vec![ChangeRow::new("Summary", "—", "Uploaded new NID scan")]
            )]
        );
    }

    #[test]
    fn test_fallback_only_for_document_requests_with_details() {
        let profile: ReviewRequest = serde_json::from_value(json!({
            "request_type": "Profile Update",
            "details": "something"
        }))
        .unwrap();
        assert!(ChangeSetBuilder::new().build_for_request(&profile).is_empty());

        let blank: ReviewRequest = serde_json::from_value(json!({
            "request_type": "Document Update",
            "details": "   "
        }))
        .unwrap();
        assert!(ChangeSetBuilder::new().build_for_request(&blank).is_empty());
    }

    #[test]
    fn test_no_fallback_when_other_sections_changed() {
        let request: ReviewRequest = serde_json::from_value(json!({
            "request_type": "Document Update",
            "details": "Birth certificate",
            "current_data": {"personal_info": {"phone": "1"}},
            "proposed_changes": "{\"personal_info\": {\"phone\": \"2\"}}"
        }))
        .unwrap();
        let sections = ChangeSetBuilder::new().build_for_request(&request);
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Personal information"]);
    }

    #[test]
    fn test_custom_date_format() {
        let builder = ChangeSetBuilder::new().with_date_format("%Y/%m/%d").unwrap();
        let sections = builder.build_from_json(
            &json!({"personal_info": {}}),
            &ProposedInput::from(json!({"personal_info": {"dob": "1990-05-01"}})),
        );
        assert_eq!(sections[0].rows[0].proposed, "1990/05/01");
        assert!(ChangeSetBuilder::new().with_date_format("%Q").is_err());
    }

    #[test]
    fn test_builder_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChangeSetBuilder>();
    }
}
