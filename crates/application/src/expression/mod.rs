//! Expression language for bound resource fields.
//!
//! A field holds either a JSON literal or an expression over variables in
//! scope. Expressions support identifiers, member access, templates,
//! arithmetic, comparison, logic and the conditional operator.

mod analysis;
mod encoding;
mod error;
mod evaluator;
mod lexer;
mod literal;
mod parser;

pub use analysis::{humanize, referenced_variables};
pub use encoding::{decode_variable_id, encode_variable_id};
pub use error::EvaluationError;
pub use evaluator::{compute_expression, evaluate, is_truthy, to_display_string};
pub use lexer::{identifier_spans, is_identifier_part, is_identifier_start};
pub use literal::is_literal;
pub use parser::{BinaryOp, Expr, TemplateSegment, UnaryOp, parse};
