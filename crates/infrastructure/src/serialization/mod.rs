//! Deterministic JSON serialization for snapshot and settings files.
//!
//! Output is stable across runs:
//! - Object keys sorted (via `BTreeMap` in domain types)
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::*;
