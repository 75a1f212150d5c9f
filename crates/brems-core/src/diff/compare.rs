//! Value normalization for comparison and display.

use crate::diff::labels::is_date_key;
use crate::model::FieldValue;
use chrono::{DateTime, NaiveDate};
use std::fmt::Write as _;

/// Display text for an absent value.
pub const ABSENT_DISPLAY: &str = "—";

/// Default calendar display format (`01 May 1990`).
pub const DEFAULT_DATE_FORMAT: &str = "%d %b %Y";

/// Whether `prev` and `next` count as the same value for field `key`.
///
/// - absent, `null` and `""` are all equal
/// - numbers compare numerically, also against numeric text (`"2005"` = `2005`)
/// - for date keys only the calendar-date part is compared, so
///   `1990-05-01` equals `1990-05-01T00:00:00.000Z`
pub fn is_same(prev: &FieldValue, next: &FieldValue, key: &str) -> bool {
    match (prev, next) {
        (FieldValue::Absent, FieldValue::Absent) => true,
        (FieldValue::Absent, _) | (_, FieldValue::Absent) => false,
        _ if values_equal(prev, next) => true,
        _ if is_date_key(key) => same_calendar_date(prev, next),
        _ => false,
    }
}

fn values_equal(a: &FieldValue, b: &FieldValue) -> bool {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (FieldValue::Number(n), FieldValue::Text(t)) | (FieldValue::Text(t), FieldValue::Number(n)) => {
            match (n.as_f64(), t.trim().parse::<f64>()) {
                (Some(x), Ok(y)) => x == y,
                _ => false,
            }
        }
        _ => a == b,
    }
}

fn same_calendar_date(a: &FieldValue, b: &FieldValue) -> bool {
    let (Some(a), Some(b)) = (a.raw_text(), b.raw_text()) else {
        return false;
    };
    let (pa, pb) = (date_prefix(&a), date_prefix(&b));
    match (parse_ymd(pa), parse_ymd(pb)) {
        (Some(da), Some(db)) => da == db,
        _ => pa == pb,
    }
}

/// First ten characters (the `YYYY-MM-DD` part of an ISO timestamp).
fn date_prefix(s: &str) -> &str {
    match s.char_indices().nth(10) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn parse_ymd(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn is_ymd_shaped(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

fn starts_with_year_month(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
}

/// Display text for a value.
pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Absent => ABSENT_DISPLAY.to_string(),
        FieldValue::Bool(true) => "Yes".to_string(),
        FieldValue::Bool(false) => "No".to_string(),
        other => other
            .raw_text()
            .map(|s| s.into_owned())
            .unwrap_or_else(|| ABSENT_DISPLAY.to_string()),
    }
}

/// Display text for a date field: an exact `YYYY-MM-DD` value or an RFC 3339
/// timestamp is rendered with `format`; anything else falls back to
/// [`format_value`].
pub fn format_date_value(value: &FieldValue, format: &str) -> String {
    if let FieldValue::Text(text) = value {
        if let Some(date) = calendar_date(text) {
            if let Some(out) = render_date(date, format) {
                return out;
            }
        }
    }
    format_value(value)
}

/// Display text for an upload timestamp. Values starting with `YYYY-MM` are
/// date-formatted when a calendar date can be read from them; any other
/// value is shown as-is.
pub fn format_upload_time(value: &FieldValue, format: &str) -> String {
    if let FieldValue::Text(text) = value {
        if starts_with_year_month(text) {
            let date = calendar_date(text).or_else(|| parse_ymd(date_prefix(text)));
            if let Some(out) = date.and_then(|d| render_date(d, format)) {
                return out;
            }
        }
        return text.clone();
    }
    format_value(value)
}

fn calendar_date(text: &str) -> Option<NaiveDate> {
    if is_ymd_shaped(text) {
        return parse_ymd(text);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}

fn render_date(date: NaiveDate, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}
