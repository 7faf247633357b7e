//! Field-level parse helpers shared by the record constructors

use serde_json::{Map, Value};

use crate::errors::{CityPermitError, Result};

/// Validate that a payload node is a JSON object
pub(crate) fn ensure_object<'a>(value: &'a Value, label: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CityPermitError::Parse(format!("expected {label} object")))
}

/// Validate that a payload node is a JSON array
pub(crate) fn ensure_array<'a>(value: &'a Value, label: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| CityPermitError::Parse(format!("expected {label} list")))
}

/// Parse an integer field that the service sends as a number or a numeric
/// string (permit media codes arrive as strings)
pub(crate) fn parse_i64(value: Option<&Value>, field: &str) -> Result<i64> {
    let invalid = || CityPermitError::Parse(format!("invalid int for {field}: {value:?}"));
    match value {
        Some(Value::Number(number)) => number.as_i64().ok_or_else(invalid),
        Some(Value::String(raw)) => raw.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Parse a required string field
pub(crate) fn parse_str(value: Option<&Value>, field: &str) -> Result<String> {
    match value {
        Some(Value::String(raw)) => Ok(raw.clone()),
        other => Err(CityPermitError::Parse(format!("invalid str for {field}: {other:?}"))),
    }
}

/// Parse an optional string field; explicit `null` counts as absent
pub(crate) fn parse_optional_str(value: Option<&Value>, field: &str) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => Ok(Some(raw.clone())),
        other => Err(CityPermitError::Parse(format!("invalid str for {field}: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_i64_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_i64(Some(&json!(42)), "f").unwrap(), 42);
        assert_eq!(parse_i64(Some(&json!("32600")), "f").unwrap(), 32600);
    }

    #[test]
    fn parse_i64_rejects_other_shapes() {
        assert!(parse_i64(Some(&json!("not-a-number")), "f").is_err());
        assert!(parse_i64(Some(&json!(null)), "f").is_err());
        assert!(parse_i64(None, "f").is_err());
    }

    #[test]
    fn parse_optional_str_treats_null_as_absent() {
        assert_eq!(parse_optional_str(Some(&json!(null)), "f").unwrap(), None);
        assert_eq!(parse_optional_str(None, "f").unwrap(), None);
        assert_eq!(parse_optional_str(Some(&json!("x")), "f").unwrap(), Some("x".to_string()));
        assert!(parse_optional_str(Some(&json!(5)), "f").is_err());
    }
}
