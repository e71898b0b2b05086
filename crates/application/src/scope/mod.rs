//! Scope building and memoization.

mod builder;
mod memo;

pub use builder::build_scope;
pub use memo::ScopeMemo;
