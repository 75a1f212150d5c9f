//! Human-readable summary renderer for change sets.

use crate::diff::model::ChangeSection;

/// Render a Markdown review document for `sections`.
///
/// Intended for approval inboxes and CLI output. An empty change set
/// renders the "no changes" line instead of an empty document.
pub fn render_human_summary(sections: &[ChangeSection]) -> String {
    let mut out = String::new();

    out.push_str("## Proposed changes\n\n");

    if sections.is_empty() {
        out.push_str("_No changes detected._\n");
        return out;
    }

    for section in sections {
        out.push_str(&format!("### {}\n\n", section.title));
        out.push_str("| Field | Previous | Proposed |\n|---|---|---|\n");
        for row in &section.rows {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&row.label),
                cell(&row.previous),
                cell(&row.proposed)
            ));
        }
        out.push('\n');
    }

    out
}

/// Escape a table cell: pipes would split the column, newlines the row.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
