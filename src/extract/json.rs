//! Scalar-mode extraction: track one evolving value inside a JSON body.

use serde_json::Value;

/// Walks a dot-delimited path through a JSON document and stringifies the
/// addressed scalar.
///
/// A leading dot is tolerated. When the addressed value is an array, its
/// last element is taken (the newest entry of an append-style endpoint).
/// Strings are returned verbatim, numbers and booleans via their canonical
/// display form. Missing paths, nulls, objects, and empty arrays yield
/// `None` — the caller reports those as "nothing extracted".
pub fn scalar_at(json: &Value, path: &str) -> Option<String> {
    let mut current = json;
    for part in path.trim_start_matches('.').split('.') {
        current = current.get(part)?;
    }

    let current = match current {
        Value::Array(items) => items.last()?,
        other => other,
    };

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}
