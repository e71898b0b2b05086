//! Variable key encoding.
//!
//! Expressions refer to variables through identifiers derived from their
//! ids. Ids may contain `-`, which is not an identifier character, so it is
//! spelled out as `__DASH__`.

const PREFIX: &str = "$ws$dataSource$";
const DASH: &str = "__DASH__";

/// Encodes a variable id as an expression identifier.
#[must_use]
pub fn encode_variable_id(id: &str) -> String {
    format!("{PREFIX}{}", id.replace('-', DASH))
}

/// Recovers a variable id from an encoded identifier.
///
/// Returns `None` for identifiers that were not produced by
/// [`encode_variable_id`].
#[must_use]
pub fn decode_variable_id(key: &str) -> Option<String> {
    key.strip_prefix(PREFIX).map(|rest| rest.replace(DASH, "-"))
}
