//! Change-set output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Rows and sections are plain display strings so they can be handed to any
//! renderer unchanged.

use serde::{Deserialize, Serialize};

/// One changed field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeRow {
    /// Display label, prefixed for nested entities (`Father – Name`)
    pub label: String,
    /// Current value as displayed, `—` when absent
    pub previous: String,
    /// Proposed value as displayed
    pub proposed: String,
}

impl ChangeRow {
    pub fn new(
        label: impl Into<String>,
        previous: impl Into<String>,
        proposed: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            previous: previous.into(),
            proposed: proposed.into(),
        }
    }
}

/// A titled group of rows. Never emitted empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeSection {
    pub title: String,
    pub rows: Vec<ChangeRow>,
}

impl ChangeSection {
    pub fn new(kind: SectionKind, rows: Vec<ChangeRow>) -> Self {
        Self {
            title: kind.title().to_string(),
            rows,
        }
    }
}

/// Review sections in display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    DocumentUpdate,
    PersonalInfo,
    Family,
    Addresses,
    Academics,
}

impl SectionKind {
    pub const ORDERED: [SectionKind; 5] = [
        SectionKind::DocumentUpdate,
        SectionKind::PersonalInfo,
        SectionKind::Family,
        SectionKind::Addresses,
        SectionKind::Academics,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::DocumentUpdate => "Document / file update",
            SectionKind::PersonalInfo => "Personal information",
            SectionKind::Family => "Family",
            SectionKind::Addresses => "Addresses",
            SectionKind::Academics => "Academic records",
        }
    }

    /// Snapshot key the section is read from.
    pub fn key(&self) -> &'static str {
        match self {
            SectionKind::DocumentUpdate => "document_update",
            SectionKind::PersonalInfo => "personal_info",
            SectionKind::Family => "family",
            SectionKind::Addresses => "addresses",
            SectionKind::Academics => "academics",
        }
    }
}

/// Total number of rows across sections.
pub fn row_count(sections: &[ChangeSection]) -> usize {
    sections.iter().map(|s| s.rows.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_titles_in_order() {
        let titles: Vec<_> = SectionKind::ORDERED.iter().map(|k| k.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Document / file update",
                "Personal information",
                "Family",
                "Addresses",
                "Academic records"
            ]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let section = ChangeSection::new(
            SectionKind::PersonalInfo,
            vec![ChangeRow::new("Phone", "—", "01700000000")],
        );
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Personal information",
                "rows": [{"label": "Phone", "previous": "—", "proposed": "01700000000"}]
            })
        );
        assert_eq!(row_count(&[section.clone(), section]), 2);
    }
}
