//! Expression evaluation errors.

use thiserror::Error;

/// Why an expression could not produce a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The expression is not well formed.
    #[error("syntax error at {position}: {message}")]
    Syntax {
        /// Byte offset of the problem.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// The expression is blank.
    #[error("expression is empty")]
    Empty,

    /// An identifier is not visible in scope.
    #[error("`{0}` is not defined")]
    UndefinedVariable(String),

    /// A property was read from `null`.
    #[error("cannot read property `{0}` of null")]
    NullMember(String),

    /// An operator was applied to values it does not support.
    #[error("cannot apply `{operator}` to {left} and {right}")]
    InvalidOperands {
        /// Operator symbol.
        operator: &'static str,
        /// Type of the left operand.
        left: &'static str,
        /// Type of the right operand.
        right: &'static str,
    },

    /// Arithmetic produced NaN or an infinity.
    #[error("arithmetic result is not a finite number")]
    NonFinite,
}

impl EvaluationError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}
