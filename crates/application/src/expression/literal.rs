//! Literal classification.

use serde_json::Value;

/// Returns `true` when `expression` is a JSON-encoded string, number,
/// boolean, or `null`.
///
/// Literal expressions carry their value directly and never need a scope.
/// Arrays, objects, and anything that fails strict JSON decoding are
/// expressions, including the empty string.
#[must_use]
pub fn is_literal(expression: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(expression),
        Ok(Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null)
    )
}
