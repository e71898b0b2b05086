//! Expression scope.
//!
//! A scope is derived state: the variables visible at one editing location,
//! keyed by their encoded identifier, plus the display name for each key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Variables visible to an expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    /// Encoded identifier to live value.
    #[serde(rename = "scope")]
    pub values: BTreeMap<String, Value>,
    /// Encoded identifier to display name.
    pub aliases: BTreeMap<String, String>,
}

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a visible variable.
    pub fn insert(&mut self, key: impl Into<String>, value: Value, alias: impl Into<String>) {
        let key = key.into();
        self.aliases.insert(key.clone(), alias.into());
        self.values.insert(key, value);
    }

    /// Removes a key from both maps.
    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.aliases.remove(key);
    }

    /// The live value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The display name for a key.
    #[must_use]
    pub fn alias(&self, key: &str) -> Option<&str> {
        self.aliases.get(key).map(String::as_str)
    }

    /// Whether a key is visible.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of visible variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
