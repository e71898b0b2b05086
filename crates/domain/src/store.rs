//! Shared store state.
//!
//! The maps below are owned by the collaborative store. Only the commit
//! transaction writes declarations and resources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::instance::InstanceSelector;
use crate::resource::Resource;
use crate::variable::Variable;

/// Variable id to declaration.
pub type DataSources = BTreeMap<String, Variable>;

/// Resource id to resource.
pub type Resources = BTreeMap<String, Resource>;

/// Variable id to live value.
pub type VariableValues = BTreeMap<String, Value>;

/// Serialized instance selector to the live values visible there.
pub type VariableValuesByInstance = BTreeMap<String, VariableValues>;

/// A point-in-time copy of the whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Variable declarations.
    #[serde(default)]
    pub data_sources: DataSources,
    /// Resource definitions.
    #[serde(default)]
    pub resources: Resources,
    /// Live values per instance selector.
    #[serde(default)]
    pub variable_values: VariableValuesByInstance,
    /// The currently selected instance, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_instance: Option<InstanceSelector>,
}
