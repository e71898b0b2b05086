//! Literal expression helpers.
//!
//! Every field of a resource is stored as an expression string. A literal
//! is the JSON encoding of a string, number, boolean, or `null`.

use serde_json::Value;

/// The expression for an empty string literal (`""`).
pub const EMPTY_STRING_LITERAL: &str = "\"\"";

/// Encodes a value as a literal expression.
#[must_use]
pub fn encode_literal(value: &Value) -> String {
    value.to_string()
}

/// Encodes a string as a literal expression.
#[must_use]
pub fn string_literal(text: &str) -> String {
    encode_literal(&Value::String(text.to_string()))
}
