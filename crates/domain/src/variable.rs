//! Variable declarations (data sources).
//!
//! A variable is declared on an instance of the component tree and is
//! visible to expressions evaluated at that instance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The typed default of a plain variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum VariableValue {
    /// Numeric value.
    Number(f64),
    /// String value.
    String(String),
    /// Boolean value.
    Boolean(bool),
    /// Arbitrary JSON.
    Json(Value),
    /// List of strings.
    #[serde(rename = "string[]")]
    StringList(Vec<String>),
}

impl VariableValue {
    /// Converts the declared default into a runtime value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(number) => serde_json::Number::from_f64(*number)
                .map_or(Value::Null, Value::Number),
            Self::String(text) => Value::String(text.clone()),
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::Json(value) => value.clone(),
            Self::StringList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// What a variable is. The set is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VariableKind {
    /// A plain variable with a declared default.
    Variable {
        /// Declared default value.
        value: VariableValue,
    },
    /// A value passed in by the surrounding component.
    Parameter,
    /// A variable whose value is the result of a resource.
    #[serde(rename_all = "camelCase")]
    Resource {
        /// The resource this variable points at.
        resource_id: String,
    },
}

/// A declared variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Unique identifier.
    pub id: String,
    /// Human display name.
    pub name: String,
    /// Instance the variable is declared on.
    pub scope_instance_id: String,
    /// Variable kind and kind-specific payload.
    #[serde(flatten)]
    pub kind: VariableKind,
}

impl Variable {
    /// Creates a resource variable.
    #[must_use]
    pub fn resource(
        id: impl Into<String>,
        name: impl Into<String>,
        scope_instance_id: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scope_instance_id: scope_instance_id.into(),
            kind: VariableKind::Resource {
                resource_id: resource_id.into(),
            },
        }
    }

    /// Creates a plain variable with a default value.
    #[must_use]
    pub fn with_value(
        id: impl Into<String>,
        name: impl Into<String>,
        scope_instance_id: impl Into<String>,
        value: VariableValue,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scope_instance_id: scope_instance_id.into(),
            kind: VariableKind::Variable { value },
        }
    }

    /// Creates a parameter.
    #[must_use]
    pub fn parameter(
        id: impl Into<String>,
        name: impl Into<String>,
        scope_instance_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scope_instance_id: scope_instance_id.into(),
            kind: VariableKind::Parameter,
        }
    }

    /// Whether this variable is backed by a resource.
    #[must_use]
    pub const fn is_resource(&self) -> bool {
        matches!(self.kind, VariableKind::Resource { .. })
    }

    /// The referenced resource id, for resource variables only.
    #[must_use]
    pub fn resource_id(&self) -> Option<&str> {
        match &self.kind {
            VariableKind::Resource { resource_id } => Some(resource_id),
            VariableKind::Variable { .. } | VariableKind::Parameter => None,
        }
    }
}
