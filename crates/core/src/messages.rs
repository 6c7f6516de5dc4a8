//! Human-readable messages from backend error bodies.
//!
//! Error bodies look like `{"message": "...", "errors": {"field": ["..."]}}`
//! with either part optional.

use serde_json::Value;

use crate::wire;

/// Which part of an error body is preferred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessagePreference {
    /// Top-level `message`, then the first validation error.
    #[default]
    MessageFirst,
    /// First validation error, then `message` (the login form's order).
    ErrorsFirst,
}

/// The first message of a field-keyed `errors` map. Values may be a single
/// string or a list of strings; the first non-empty one wins.
pub fn first_validation_error(body: &Value) -> Option<String> {
    let Some(Value::Object(errors)) = wire::field(body, "errors") else {
        return None;
    };
    errors.values().find_map(|entry| match entry {
        Value::Array(list) => list.iter().filter_map(wire::text).find(|s| !s.is_empty()),
        other => wire::text(other).filter(|s| !s.is_empty()),
    })
}

pub fn top_level_message(body: &Value) -> Option<String> {
    wire::non_empty_text(body, "message")
}

/// Pick the message to show for an error body, if it carries one.
pub fn extract(body: &Value, preference: MessagePreference) -> Option<String> {
    match preference {
        MessagePreference::MessageFirst => {
            top_level_message(body).or_else(|| first_validation_error(body))
        }
        MessagePreference::ErrorsFirst => {
            first_validation_error(body).or_else(|| top_level_message(body))
        }
    }
}

/// Like [`extract`] but always yields text, using `fallback` last.
pub fn extract_or(body: &Value, preference: MessagePreference, fallback: &str) -> String {
    extract(body, preference).unwrap_or_else(|| fallback.to_string())
}
