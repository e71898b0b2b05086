//! Static inspection of expressions without evaluating them.

use std::collections::{BTreeMap, BTreeSet};

use super::lexer::identifier_spans;
use super::literal::is_literal;

/// Identifiers an expression reads, in sorted order.
///
/// Property names after `.` and text inside string literals are not
/// references. Literals reference nothing.
#[must_use]
pub fn referenced_variables(expression: &str) -> BTreeSet<String> {
    if is_literal(expression) {
        return BTreeSet::new();
    }
    identifier_spans(expression)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

/// Rewrites identifiers to their display aliases.
///
/// Identifiers without an alias are left unchanged.
#[must_use]
pub fn humanize(expression: &str, aliases: &BTreeMap<String, String>) -> String {
    if is_literal(expression) {
        return expression.to_string();
    }
    let mut text = expression.to_string();
    // replace from the end so earlier spans stay valid
    for (name, span) in identifier_spans(expression).into_iter().rev() {
        if let Some(alias) = aliases.get(&name) {
            text.replace_range(span, alias);
        }
    }
    text
}
