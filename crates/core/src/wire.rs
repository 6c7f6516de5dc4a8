//! Lenient coercions for loosely-typed backend JSON.
//!
//! Every helper fails closed: a value of the wrong shape yields `None` (or
//! the documented default) instead of an error.

use serde_json::Value;

/// Strip an optional `{"data": ...}` envelope. A `null` envelope counts as absent.
pub(crate) fn unwrap_envelope(raw: &Value) -> &Value {
    match raw.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => raw,
    }
}

/// Field lookup that treats `null` the same as a missing key.
pub(crate) fn field<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// Render a scalar as text. Strings pass through, numbers and booleans are
/// formatted, anything else is `None`.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text of a non-empty string field, used for `a || b` style fallbacks.
pub(crate) fn non_empty_text(obj: &Value, key: &str) -> Option<String> {
    field(obj, key).and_then(text).filter(|s| !s.is_empty())
}

pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

pub(crate) fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coerce to a non-negative whole number (sizes, counters).
pub(crate) fn whole(value: &Value) -> Option<u32> {
    let n = number(value)?;
    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

/// Truthiness of a flag field: `null`, `false`, zero, `""` and `"0"` are
/// false, everything else is true.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_is_optional() {
        let wrapped = json!({"data": {"name": "x"}});
        let bare = json!({"name": "x"});
        assert_eq!(unwrap_envelope(&wrapped), &json!({"name": "x"}));
        assert_eq!(unwrap_envelope(&bare), &bare);
        let null_data = json!({"data": null, "name": "y"});
        assert_eq!(unwrap_envelope(&null_data), &null_data);
    }

    #[test]
    fn truthiness_matches_flag_semantics() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("0")));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("yes")));
        assert!(truthy(&json!(true)));
    }

    #[test]
    fn whole_rejects_fractions_and_negatives() {
        assert_eq!(whole(&json!("38")), Some(38));
        assert_eq!(whole(&json!(40)), Some(40));
        assert_eq!(whole(&json!(40.5)), None);
        assert_eq!(whole(&json!(-2)), None);
        assert_eq!(whole(&json!("abc")), None);
    }
}
