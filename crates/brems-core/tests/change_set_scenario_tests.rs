//! End-to-end change-set scenarios over both current-data shapes.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use brems_core::diff::{build_change_sections, render_human_summary, ChangeRow, ChangeSection};
use brems_core::model::{ProposedInput, ReviewRequest};
use brems_core::snapshot::CurrentShape;
use brems_core::{ChangeSetBuilder, NeverSuppress};
use common::{employee_current, sectioned_current};
use serde_json::{json, Value};

fn rows(sections: &[ChangeSection], title: &str) -> Vec<ChangeRow> {
    sections
        .iter()
        .find(|s| s.title == title)
        .map(|s| s.rows.clone())
        .unwrap_or_default()
}

fn titles(sections: &[ChangeSection]) -> Vec<&str> {
    sections.iter().map(|s| s.title.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_phone_change() {
    let sections = build_change_sections(
        &json!({"personal_info": {"phone": "01711111111"}}),
        &ProposedInput::from(json!({"personal_info": {"phone": "01722222222"}})),
    );

    assert_eq!(
        sections,
        vec![ChangeSection {
            title: "Personal information".to_string(),
            rows: vec![ChangeRow::new("Phone", "01711111111", "01722222222")],
        }]
    );
}

#[test]
fn test_scenario_document_update_fallback() {
    let request: ReviewRequest = serde_json::from_value(json!({
        "id": 88,
        "request_type": "Document Update",
        "details": "Updated NID copy",
        "current_data": sectioned_current(),
        "proposed_changes": null
    }))
    .unwrap();

    let sections = ChangeSetBuilder::new().build_for_request(&request);

    assert_eq!(
        sections,
        vec![ChangeSection {
            title: "Document / file update".to_string(),
            rows: vec![ChangeRow::new("Summary", "—", "Updated NID copy")],
        }]
    );
}

#[test]
fn test_document_rows_suppress_fallback() {
    let request: ReviewRequest = serde_json::from_value(json!({
        "request_type": "Document Update",
        "details": "Updated NID copy",
        "current_data": sectioned_current(),
        "proposed_changes": {"document_update": {"type": "NID", "uploaded_at": "2024-11-02"}}
    }))
    .unwrap();

    let sections = ChangeSetBuilder::new().build_for_request(&request);

    assert_eq!(titles(&sections), vec!["Document / file update"]);
    assert_eq!(
        sections[0].rows,
        vec![
            ChangeRow::new("Document / file type", "—", "NID"),
            ChangeRow::new("Uploaded at", "—", "02 Nov 2024"),
        ]
    );
}

#[test]
fn test_field_changes_suppress_fallback() {
    let request: ReviewRequest = serde_json::from_value(json!({
        "request_type": "Document Update",
        "details": "Uploaded new NID scan",
        "current_data": {"personal_info": {"phone": "01711111111"}},
        "proposed_changes": {"personal_info": {"phone": "01722222222"}}
    }))
    .unwrap();

    let sections = ChangeSetBuilder::new().build_for_request(&request);

    assert_eq!(titles(&sections), vec!["Personal information"]);
    assert!(sections
        .iter()
        .flat_map(|s| &s.rows)
        .all(|r| r.label != "Summary"));
}

#[test]
fn test_scenario_father_is_alive_default_hidden() {
    let sections = build_change_sections(
        &json!({"family": {"father": {"name": "Karim"}}}),
        &ProposedInput::from(json!({"family": {"father": {"name": "Karim", "is_alive": true}}})),
    );
    assert!(sections.is_empty());
}

#[test]
fn test_is_alive_default_hidden_for_list_members() {
    let sections = build_change_sections(
        &sectioned_current(),
        &ProposedInput::from(json!({"family": {
            "spouses": [{"name": "Nadia", "is_active_marriage": true, "is_alive": true}],
            "children": [{"name": "Sara", "dob": "2015-01-09", "is_alive": true}]
        }})),
    );
    assert!(sections.is_empty(), "got {:?}", sections);
}

#[test]
fn test_no_suppression_policy_shows_default_flags() {
    let builder = ChangeSetBuilder::new().with_policy(NeverSuppress);
    let sections = builder.build_from_json(
        &json!({"family": {"father": {"name": "Karim"}}}),
        &ProposedInput::from(json!({"family": {"father": {"is_alive": true}}})),
    );
    // NeverSuppress also reports the name being cleared
    assert_eq!(
        rows(&sections, "Family"),
        vec![
            ChangeRow::new("Father – Name", "Karim", "—"),
            ChangeRow::new("Father – Alive", "—", "Yes"),
        ]
    );
}

#[test]
fn test_empty_and_missing_proposals_yield_nothing() {
    for proposed in [json!(null), json!({}), json!("{}"), json!("not json"), json!([1, 2])] {
        let sections = build_change_sections(&sectioned_current(), &ProposedInput::from(proposed.clone()));
        assert!(sections.is_empty(), "proposal {} produced rows", proposed);
    }
}

#[test]
fn test_identical_proposal_yields_nothing() {
    let current = sectioned_current();
    let sections = build_change_sections(&current, &ProposedInput::from(current.clone()));
    assert!(sections.is_empty());
}

#[test]
fn test_full_profile_update_section_order() {
    let proposed = json!({
        "academics": [
            {"exam_name": "SSC", "institute": "Bogura Zilla School", "passing_year": 2004, "result": "5.00"},
            {"exam_name": "HSC", "institute": "Dhaka College", "passing_year": 2006, "result": "4.80"}
        ],
        "addresses": {"present": {"upazila": "Uttara"}},
        "family": {"children": [{"name": "Sara", "dob": "2015-01-09"}, {"name": "Omar"}]},
        "personal_info": {"blood_group": "B+"}
    });

    let sections = build_change_sections(&sectioned_current(), &ProposedInput::from(proposed));

    assert_eq!(
        titles(&sections),
        vec!["Personal information", "Family", "Addresses", "Academic records"]
    );
    assert_eq!(
        rows(&sections, "Personal information"),
        vec![ChangeRow::new("Blood group", "—", "B+")]
    );
    assert_eq!(
        rows(&sections, "Family"),
        vec![ChangeRow::new("Child 2 – Name", "—", "Omar")]
    );
    assert_eq!(
        rows(&sections, "Addresses"),
        vec![ChangeRow::new("Present address – Upazila", "Mirpur", "Uttara")]
    );
    assert_eq!(
        rows(&sections, "Academic records"),
        vec![
            ChangeRow::new("Academic 2 – Exam name", "—", "HSC"),
            ChangeRow::new("Academic 2 – Institute", "—", "Dhaka College"),
            ChangeRow::new("Academic 2 – Passing year", "—", "2006"),
            ChangeRow::new("Academic 2 – Result", "—", "4.80"),
        ]
    );
}

#[test]
fn test_list_shrink_is_a_clear() {
    let current = json!({"family": {"children": [
        {"id": 14, "relation": "child", "name": "Sara", "dob": "2015-01-09"}
    ]}});
    let proposed = json!({"family": {"children": []}});
    let sections = build_change_sections(&current, &ProposedInput::from(proposed.clone()));
    assert!(sections.is_empty());

    let builder = ChangeSetBuilder::new().with_policy(NeverSuppress);
    let sections = builder.build_from_json(&current, &ProposedInput::from(proposed));
    assert_eq!(
        rows(&sections, "Family"),
        vec![
            ChangeRow::new("Child 1 – Name", "Sara", "—"),
            ChangeRow::new("Child 1 – Date of birth", "09 Jan 2015", "—"),
        ]
    );
}

// ---------------------------------------------------------------------------
// Current-data shapes
// ---------------------------------------------------------------------------

fn typical_update() -> Value {
    json!({
        "personal_info": {"phone": "01722222222", "dob": "1988-02-10"},
        "family": {
            "father": {"name": "Karim Uddin", "is_alive": false},
            "spouses": [{"name": "Nadia Rahman", "is_active_marriage": true}]
        },
        "addresses": {"permanent": {"district": "Joypurhat"}}
    })
}

#[test]
fn test_both_shapes_produce_the_same_sections() {
    let proposed = ProposedInput::from(typical_update());

    let from_sectioned = build_change_sections(&sectioned_current(), &proposed);
    let from_employee = build_change_sections(&employee_current(), &proposed);

    assert_eq!(from_sectioned, from_employee);
    assert_eq!(
        rows(&from_employee, "Family"),
        vec![
            ChangeRow::new("Father – Alive", "Yes", "No"),
            ChangeRow::new("Spouse 1 – Name", "Nadia", "Nadia Rahman"),
        ]
    );
}

#[test]
fn test_forced_shape_overrides_detection() {
    // read as sectioned, the employee record has no personal_info section
    let builder = ChangeSetBuilder::new().with_shape(CurrentShape::Sectioned);
    let sections = builder.build_from_json(
        &employee_current(),
        &ProposedInput::from(json!({"personal_info": {"phone": "01711111111"}})),
    );
    assert_eq!(
        rows(&sections, "Personal information"),
        vec![ChangeRow::new("Phone", "—", "01711111111")]
    );
}

#[test]
fn test_string_and_object_proposals_are_equivalent() {
    let as_object = ProposedInput::from(typical_update());
    let as_string = ProposedInput::from(json!(typical_update().to_string()));

    assert_eq!(
        build_change_sections(&sectioned_current(), &as_object),
        build_change_sections(&sectioned_current(), &as_string)
    );
}

#[test]
fn test_malformed_sections_degrade_gracefully() {
    let sections = build_change_sections(
        &json!({"personal_info": [], "family": {"father": "Karim", "children": {"0": {}}}}),
        &ProposedInput::from(json!({
            "personal_info": {"height": {"ft": 5, "in": 8}},
            "family": "oops",
            "academics": [null, {"exam_name": "JSC"}]
        })),
    );

    assert_eq!(
        titles(&sections),
        vec!["Personal information", "Academic records"]
    );
    assert_eq!(
        rows(&sections, "Personal information"),
        vec![ChangeRow::new("Height", "—", r#"{"ft":5,"in":8}"#)]
    );
    assert_eq!(
        rows(&sections, "Academic records"),
        vec![ChangeRow::new("Academic 2 – Exam name", "—", "JSC")]
    );
}

#[test]
fn test_summary_for_request() {
    let request: ReviewRequest = serde_json::from_value(json!({
        "id": 5,
        "request_type": "Profile Update",
        "status": "pending",
        "current_data": employee_current(),
        "proposed_changes": typical_update().to_string()
    }))
    .unwrap();

    let summary = render_human_summary(&ChangeSetBuilder::new().build_for_request(&request));

    assert!(summary.contains("### Personal information"));
    assert!(summary.contains("| Phone | 01711111111 | 01722222222 |"));
    assert!(summary.contains("| Permanent address – District | Bogura | Joypurhat |"));
    assert!(!summary.contains("Date of birth"));
}
