//! CLI error type.

use thiserror::Error;

use scopebind_application::EditorError;
use scopebind_application::ports::SnapshotError;
use scopebind_domain::DomainError;
use scopebind_infrastructure::SerializationError;

/// Anything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument value.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Snapshot could not be read or written.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Editing or saving failed.
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Output could not be rendered.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// A `--header` argument without `=`.
    #[error("header `{0}` must be written as name=expression")]
    MalformedHeader(String),
}
