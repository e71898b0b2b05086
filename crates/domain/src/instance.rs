//! Instance selectors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{DomainError, DomainResult};

/// An ordered path identifying a location in the component tree.
///
/// The first element is the selected instance, followed by its ancestors
/// up to the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceSelector(Vec<String>);

impl InstanceSelector {
    /// Creates a selector from a non-empty path.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptySelector`] for an empty path and
    /// [`DomainError::InvalidIdentifier`] if any id is blank.
    pub fn new<I, S>(path: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        if path.is_empty() {
            return Err(DomainError::EmptySelector);
        }
        if let Some(blank) = path.iter().find(|id| id.trim().is_empty()) {
            return Err(DomainError::InvalidIdentifier(blank.clone()));
        }
        Ok(Self(path))
    }

    /// Parses a comma separated path such as `box,body`.
    ///
    /// # Errors
    ///
    /// Same as [`InstanceSelector::new`].
    pub fn parse(path: &str) -> DomainResult<Self> {
        Self::new(path.split(',').map(str::trim))
    }

    /// The selected instance id.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        // new() rejects empty paths
        self.0.first().map_or("", String::as_str)
    }

    /// The full path.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.0
    }

    /// The key used to index live variable values, the JSON array form of
    /// the path.
    #[must_use]
    pub fn key(&self) -> String {
        Value::from(self.0.clone()).to_string()
    }
}

impl fmt::Display for InstanceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_is_json_array() {
        let selector = InstanceSelector::new(["box", "body"]).unwrap();
        assert_eq!(selector.key(), r#"["box","body"]"#);
        assert_eq!(selector.instance_id(), "box");
    }

    #[test]
    fn test_parse_trims() {
        let selector = InstanceSelector::parse("box, body").unwrap();
        assert_eq!(selector.path(), ["box".to_string(), "body".to_string()]);
        assert_eq!(selector.to_string(), "box,body");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            InstanceSelector::new(Vec::<String>::new()),
            Err(DomainError::EmptySelector)
        );
        assert!(InstanceSelector::parse("box,,body").is_err());
    }
}
