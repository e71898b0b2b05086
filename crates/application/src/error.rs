//! Application error types

use thiserror::Error;
use scopebind_domain::DomainError;

use crate::editor::EditorError;
use crate::expression::EvaluationError;
use crate::ports::{SnapshotError, StoreError};
use crate::use_cases::CommitError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An expression could not be evaluated.
    #[error("evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// The store refused a transaction.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Committing a resource failed.
    #[error("commit error: {0}")]
    Commit(#[from] CommitError),

    /// An editing session failed.
    #[error("editor error: {0}")]
    Editor(#[from] EditorError),

    /// A snapshot could not be loaded or saved.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
