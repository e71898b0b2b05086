//! Scopebind Application - Use cases and ports
//!
//! This crate holds the engine behind the resource form: the expression
//! language, scope construction, the commit transaction and the editing
//! session. External systems are reached only through the traits in
//! [`ports`].

pub mod editor;
pub mod error;
pub mod expression;
pub mod ports;
pub mod scope;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use editor::{EditorError, FieldBinding, ResourceEditor};
pub use error::{ApplicationError, ApplicationResult};
pub use scope::{ScopeMemo, build_scope};
