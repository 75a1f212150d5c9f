use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::borrow::Cow;

/// A single field of an employee record.
///
/// `null`, a missing key and the empty string all collapse to
/// [`FieldValue::Absent`]. Arrays and objects found where a scalar is
/// expected are kept as [`FieldValue::Structured`] so they can still be
/// displayed (as compact JSON).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Absent,
    Text(String),
    Number(Number),
    Bool(bool),
    Structured(Value),
}

/// Shared absent value for lookups of missing keys.
pub(crate) static ABSENT: FieldValue = FieldValue::Absent;

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            FieldValue::Absent
        } else {
            FieldValue::Text(s)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Plain string form of the value, `None` when absent.
    ///
    /// Numbers that hold a whole float (`1990.0`) render without the
    /// fractional part, booleans as `true`/`false`.
    pub fn raw_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Number(n) => Some(Cow::Owned(number_text(n))),
            FieldValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            FieldValue::Structured(v) => Some(Cow::Owned(v.to_string())),
        }
    }

    /// JSON form of the value (`null` when absent).
    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::Absent => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Structured(v) => v.clone(),
        }
    }
}

fn number_text(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::String(s) if s.is_empty() => FieldValue::Absent,
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Number(n.clone()),
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Array(_) | Value::Object(_) => FieldValue::Structured(value.clone()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::text(s),
            other => FieldValue::from(&other),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_string_and_null_are_absent() {
        assert!(FieldValue::from(json!(null)).is_absent());
        assert!(FieldValue::from(json!("")).is_absent());
        assert!(FieldValue::text("").is_absent());
        assert!(!FieldValue::from(json!(" ")).is_absent());
    }

    #[test]
    fn test_structured_values_are_kept() {
        let v = FieldValue::from(json!({"a": 1}));
        assert_eq!(v.raw_text().as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_whole_float_renders_as_integer() {
        let v = FieldValue::from(json!(2005.0));
        assert_eq!(v.raw_text().as_deref(), Some("2005"));
        let v = FieldValue::from(json!(4.5));
        assert_eq!(v.raw_text().as_deref(), Some("4.5"));
    }

    #[test]
    fn test_absent_serializes_as_null() {
        assert_eq!(serde_json::to_value(FieldValue::Absent).unwrap(), json!(null));
        let v: FieldValue = serde_json::from_str("\"\"").unwrap();
        assert!(v.is_absent());
    }
}
