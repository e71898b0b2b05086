//! Resource definitions.
//!
//! A resource describes a network request (url, method, headers, body)
//! whose fields are expression strings. Resources are only defined here;
//! nothing in this workspace executes them.

mod draft;
mod method;

pub use draft::{DraftField, ResourceDraft};
pub use method::ResourceMethod;

use serde::{Deserialize, Serialize};

use crate::literal::EMPTY_STRING_LITERAL;

/// A single request header. The value is an expression string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHeader {
    /// Header name, stored as typed.
    pub name: String,
    /// Header value expression.
    pub value: String,
}

impl ResourceHeader {
    /// Creates a header from a name and a value expression.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A blank header row: empty name, empty string literal value.
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", EMPTY_STRING_LITERAL)
    }
}

/// A persisted resource definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL expression.
    pub url: String,
    /// Request method.
    #[serde(default)]
    pub method: ResourceMethod,
    /// Ordered headers; duplicate names are allowed.
    #[serde(default)]
    pub headers: Vec<ResourceHeader>,
    /// Body expression.
    #[serde(default = "empty_literal")]
    pub body: String,
}

fn empty_literal() -> String {
    EMPTY_STRING_LITERAL.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_header() {
        let header = ResourceHeader::blank();
        assert_eq!(header.name, "");
        assert_eq!(header.value, "\"\"");
    }

    #[test]
    fn test_resource_defaults_when_deserializing() {
        let json = r#"{"id": "r1", "name": "users", "url": "\"https://example.com\""}"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.method, ResourceMethod::Get);
        assert!(resource.headers.is_empty());
        assert_eq!(resource.body, EMPTY_STRING_LITERAL);
    }
}
