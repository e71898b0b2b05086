//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The resource method is not one of the supported verbs.
    #[error("unsupported resource method: {0}")]
    UnsupportedMethod(String),

    /// A header index does not address an existing header.
    #[error("header index {index} out of range for {len} header(s)")]
    HeaderIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of headers in the draft.
        len: usize,
    },

    /// A variable identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// An instance selector has no instances in it.
    #[error("instance selector is empty")]
    EmptySelector,

    /// A setting holds a value that cannot be used.
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting {
        /// Setting name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
