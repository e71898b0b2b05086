//! Scopebind Domain - Core types
//!
//! This crate defines the domain model of the resource editor engine:
//! variables, resources, instance selectors, scopes and the form draft.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod instance;
pub mod literal;
pub mod resource;
pub mod scope;
pub mod settings;
pub mod store;
pub mod variable;

pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use instance::InstanceSelector;
pub use literal::{EMPTY_STRING_LITERAL, encode_literal, string_literal};
pub use resource::{DraftField, Resource, ResourceDraft, ResourceHeader, ResourceMethod};
pub use scope::Scope;
pub use settings::EditorSettings;
pub use store::{DataSources, Resources, StoreSnapshot, VariableValues, VariableValuesByInstance};
pub use variable::{Variable, VariableKind, VariableValue};
