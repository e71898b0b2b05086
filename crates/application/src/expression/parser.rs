//! Expression parser.
//!
//! Precedence, lowest first: `?:`, `||`, `&&`, equality, comparison,
//! additive, multiplicative, unary, member access.

use serde_json::Value;

use super::error::EvaluationError;
use super::lexer::{MAX_DEPTH, TemplatePart, Token, TokenKind, tokenize};

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Negate,
    /// `+`
    Plus,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Remainder,
    /// `==`
    LooseEq,
    /// `!=`
    LooseNotEq,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// The operator as written.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::LooseEq => "==",
            Self::LooseNotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

/// A segment of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSegment {
    /// Raw text.
    Text(String),
    /// Interpolated expression.
    Expr(Expr),
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A constant.
    Literal(Value),
    /// A variable reference.
    Identifier(String),
    /// `[a, b]`
    Array(Vec<Expr>),
    /// `{k: v}`
    Object(Vec<(String, Expr)>),
    /// `` `a${b}` ``
    Template(Vec<TemplateSegment>),
    /// `a.b` or `a[b]`
    Member {
        /// Object being read.
        object: Box<Expr>,
        /// Property key.
        property: Box<Expr>,
    },
    /// Prefix operator.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Infix operator.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// `test ? consequent : alternate`
    Conditional {
        /// Condition.
        test: Box<Expr>,
        /// Value when truthy.
        consequent: Box<Expr>,
        /// Value when falsy.
        alternate: Box<Expr>,
    },
}

/// Parses an expression string.
///
/// # Errors
///
/// Returns [`EvaluationError::Empty`] for blank input and
/// [`EvaluationError::Syntax`] for anything malformed or nested deeper
/// than the evaluator accepts.
pub fn parse(input: &str) -> Result<Expr, EvaluationError> {
    parse_at(input, 0, 0).map(|(expr, _)| expr)
}

fn parse_at(input: &str, offset: usize, depth: usize) -> Result<Node, EvaluationError> {
    let tokens = tokenize(input).map_err(|e| shift(e, offset))?;
    if tokens.is_empty() {
        return Err(EvaluationError::Empty);
    }
    let mut parser = Parser {
        tokens,
        index: 0,
        end: input.len(),
        offset,
        depth,
    };
    let node = parser.expression()?;
    if let Some(token) = parser.peek() {
        let at = token.span.start;
        return Err(parser.error_at(at, "unexpected trailing input"));
    }
    Ok(node)
}

fn shift(error: EvaluationError, offset: usize) -> EvaluationError {
    match error {
        EvaluationError::Syntax { position, message } => EvaluationError::Syntax {
            position: position + offset,
            message,
        },
        other => other,
    }
}

/// Converts a parsed number into a JSON value, preferring integers.
pub(crate) fn number_value(number: f64) -> Option<Value> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        // exact: integral and within the safe range
        #[allow(clippy::cast_possible_truncation)]
        let integer = number as i64;
        return Some(Value::from(integer));
    }
    serde_json::Number::from_f64(number).map(Value::Number)
}

/// A parsed subtree and its height.
type Node = (Expr, usize);

const fn leaf(expr: Expr) -> Node {
    (expr, 1)
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    end: usize,
    offset: usize,
    /// Current recursion depth, shared with nested template parses.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn position(&self) -> usize {
        self.peek().map_or(self.end, |t| t.span.start)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> EvaluationError {
        EvaluationError::syntax(position + self.offset, message)
    }

    fn too_deep(&self) -> EvaluationError {
        self.error_at(self.position(), "expression is nested too deeply")
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), EvaluationError> {
        match self.advance() {
            Some(token) if &token.kind == kind => Ok(()),
            Some(token) => Err(self.error_at(token.span.start, format!("expected {what}"))),
            None => Err(self.error_at(self.end, format!("expected {what}"))),
        }
    }

    /// Runs `parse` one recursion level deeper.
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Node, EvaluationError>,
    ) -> Result<Node, EvaluationError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    /// Wraps `expr` as a node whose tallest child has height `children`.
    fn node(&self, expr: Expr, children: usize) -> Result<Node, EvaluationError> {
        let height = children + 1;
        if height > MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok((expr, height))
    }

    fn expression(&mut self) -> Result<Node, EvaluationError> {
        self.nested(Self::conditional)
    }

    fn conditional(&mut self) -> Result<Node, EvaluationError> {
        let (test, test_height) = self.binary(0)?;
        if self.peek_kind() != Some(&TokenKind::Question) {
            return Ok((test, test_height));
        }
        self.advance();
        let (consequent, consequent_height) = self.expression()?;
        self.expect(&TokenKind::Colon, "`:`")?;
        let (alternate, alternate_height) = self.expression()?;
        self.node(
            Expr::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            test_height.max(consequent_height).max(alternate_height),
        )
    }

    /// Precedence climbing over the binary operator table.
    fn binary(&mut self, min_precedence: u8) -> Result<Node, EvaluationError> {
        let (mut left, mut height) = self.unary()?;
        while let Some((op, precedence)) = self.peek_kind().and_then(binary_op) {
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let (right, right_height) = self.binary(precedence + 1)?;
            (left, height) = self.node(
                Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                height.max(right_height),
            )?;
        }
        Ok((left, height))
    }

    fn unary(&mut self) -> Result<Node, EvaluationError> {
        let op = match self.peek_kind() {
            Some(TokenKind::Bang) => UnaryOp::Not,
            Some(TokenKind::Minus) => UnaryOp::Negate,
            Some(TokenKind::Plus) => UnaryOp::Plus,
            _ => return self.postfix(),
        };
        self.advance();
        let (operand, height) = self.nested(Self::unary)?;
        self.node(
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            height,
        )
    }

    fn postfix(&mut self) -> Result<Node, EvaluationError> {
        let (mut expr, mut height) = self.primary()?;
        loop {
            match self.peek_kind() {
                Some(TokenKind::Dot) => {
                    self.advance();
                    let property = match self.advance() {
                        Some(Token {
                            kind: TokenKind::Identifier(name),
                            ..
                        }) => name,
                        Some(Token {
                            kind: TokenKind::True,
                            ..
                        }) => "true".to_string(),
                        Some(Token {
                            kind: TokenKind::False,
                            ..
                        }) => "false".to_string(),
                        Some(Token {
                            kind: TokenKind::Null,
                            ..
                        }) => "null".to_string(),
                        Some(token) => {
                            return Err(self.error_at(token.span.start, "expected property name"));
                        }
                        None => return Err(self.error_at(self.end, "expected property name")),
                    };
                    (expr, height) = self.node(
                        Expr::Member {
                            object: Box::new(expr),
                            property: Box::new(Expr::Literal(Value::String(property))),
                        },
                        height,
                    )?;
                }
                Some(TokenKind::LBracket) => {
                    self.advance();
                    let (property, property_height) = self.expression()?;
                    self.expect(&TokenKind::RBracket, "`]`")?;
                    (expr, height) = self.node(
                        Expr::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                        },
                        height.max(property_height),
                    )?;
                }
                _ => return Ok((expr, height)),
            }
        }
    }

    fn primary(&mut self) -> Result<Node, EvaluationError> {
        let Some(token) = self.advance() else {
            return Err(self.error_at(self.end, "unexpected end of expression"));
        };
        match token.kind {
            TokenKind::Number(number) => number_value(number)
                .map(|value| leaf(Expr::Literal(value)))
                .ok_or_else(|| self.error_at(token.span.start, "number out of range")),
            TokenKind::Str(text) => Ok(leaf(Expr::Literal(Value::String(text)))),
            TokenKind::True => Ok(leaf(Expr::Literal(Value::Bool(true)))),
            TokenKind::False => Ok(leaf(Expr::Literal(Value::Bool(false)))),
            TokenKind::Null => Ok(leaf(Expr::Literal(Value::Null))),
            TokenKind::Identifier(name) => Ok(leaf(Expr::Identifier(name))),
            TokenKind::Template(parts) => self.template(parts),
            TokenKind::LParen => {
                let inner = self.expression()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.nested(Self::array),
            TokenKind::LBrace => self.nested(Self::object),
            _ => Err(self.error_at(token.span.start, "unexpected token")),
        }
    }

    fn template(&self, parts: Vec<TemplatePart>) -> Result<Node, EvaluationError> {
        let mut height = 0;
        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                TemplatePart::Text(text) => segments.push(TemplateSegment::Text(text)),
                TemplatePart::Expr { source, offset } => {
                    let (expr, expr_height) =
                        parse_at(&source, self.offset + offset, self.depth + 1)?;
                    height = height.max(expr_height);
                    segments.push(TemplateSegment::Expr(expr));
                }
            }
        }
        self.node(Expr::Template(segments), height)
    }

    fn array(&mut self) -> Result<Node, EvaluationError> {
        let mut items = Vec::new();
        let mut height = 0;
        loop {
            if self.peek_kind() == Some(&TokenKind::RBracket) {
                self.advance();
                return self.node(Expr::Array(items), height);
            }
            let (item, item_height) = self.expression()?;
            height = height.max(item_height);
            items.push(item);
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => {}
                Some(Token {
                    kind: TokenKind::RBracket,
                    ..
                }) => return self.node(Expr::Array(items), height),
                Some(token) => return Err(self.error_at(token.span.start, "expected `,` or `]`")),
                None => return Err(self.error_at(self.end, "unterminated array")),
            }
        }
    }

    fn object(&mut self) -> Result<Node, EvaluationError> {
        let mut entries = Vec::new();
        let mut height = 0;
        loop {
            let key = match self.advance() {
                Some(Token {
                    kind: TokenKind::RBrace,
                    ..
                }) => return self.node(Expr::Object(entries), height),
                Some(Token {
                    kind: TokenKind::Str(key) | TokenKind::Identifier(key),
                    ..
                }) => key,
                Some(token) => return Err(self.error_at(token.span.start, "expected property key")),
                None => return Err(self.error_at(self.end, "unterminated object")),
            };
            self.expect(&TokenKind::Colon, "`:`")?;
            let (value, value_height) = self.expression()?;
            height = height.max(value_height);
            entries.push((key, value));
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => {}
                Some(Token {
                    kind: TokenKind::RBrace,
                    ..
                }) => return self.node(Expr::Object(entries), height),
                Some(token) => return Err(self.error_at(token.span.start, "expected `,` or `}`")),
                None => return Err(self.error_at(self.end, "unterminated object")),
            }
        }
    }
}

const fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let entry = match kind {
        TokenKind::OrOr => (BinaryOp::Or, 1),
        TokenKind::AndAnd => (BinaryOp::And, 2),
        TokenKind::EqEq => (BinaryOp::LooseEq, 3),
        TokenKind::NotEq => (BinaryOp::LooseNotEq, 3),
        TokenKind::StrictEq => (BinaryOp::StrictEq, 3),
        TokenKind::StrictNotEq => (BinaryOp::StrictNotEq, 3),
        TokenKind::Lt => (BinaryOp::Lt, 4),
        TokenKind::Le => (BinaryOp::Le, 4),
        TokenKind::Gt => (BinaryOp::Gt, 4),
        TokenKind::Ge => (BinaryOp::Ge, 4),
        TokenKind::Plus => (BinaryOp::Add, 5),
        TokenKind::Minus => (BinaryOp::Subtract, 5),
        TokenKind::Star => (BinaryOp::Multiply, 6),
        TokenKind::Slash => (BinaryOp::Divide, 6),
        TokenKind::Percent => (BinaryOp::Remainder, 6),
        _ => return None,
    };
    Some(entry)
}
