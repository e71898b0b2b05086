//! Expression tokenizer.
//!
//! Splits an expression into tokens with their byte spans. Template
//! literals keep the raw source of each `${...}` part together with its
//! offset so that callers can tokenize it again.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

use super::error::EvaluationError;

/// Deepest nesting of brackets, operators, or templates an expression may
/// use. Matches the recursion limit `serde_json` applies to literals.
pub(crate) const MAX_DEPTH: usize = 128;

/// A piece of a template literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Raw text, escapes already applied.
    Text(String),
    /// Source of an interpolated expression and its byte offset in the
    /// enclosing expression.
    Expr {
        /// Expression source between `${` and `}`.
        source: String,
        /// Byte offset of `source` in the enclosing expression.
        offset: usize,
    },
}

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal.
    Number(f64),
    /// Quoted string literal.
    Str(String),
    /// Backtick template literal.
    Template(Vec<TemplatePart>),
    /// Identifier, including encoded variable keys.
    Identifier(String),
    /// `true`
    True,
    /// `false`
    False,
    /// `null` or `undefined`
    Null,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `?`
    Question,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Bang,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
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
    AndAnd,
    /// `||`
    OrOr,
}

/// A token and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Byte range in the source.
    pub span: Range<usize>,
}

/// Whether `ch` may start an identifier.
#[must_use]
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

/// Whether `ch` may continue an identifier.
#[must_use]
pub fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Tokenizes an expression.
///
/// # Errors
///
/// Returns [`EvaluationError::Syntax`] on an unexpected character or an
/// unterminated string or template.
pub fn tokenize(input: &str) -> Result<Vec<Token>, EvaluationError> {
    Lexer::new(input).run()
}

/// Identifier tokens in `input`, including those inside template
/// interpolations, with spans relative to `input`.
///
/// Input that fails to tokenize contributes no identifiers.
#[must_use]
pub fn identifier_spans(input: &str) -> Vec<(String, Range<usize>)> {
    let mut found = Vec::new();
    collect_identifiers(input, 0, &mut found);
    found
}

fn collect_identifiers(input: &str, base: usize, found: &mut Vec<(String, Range<usize>)>) {
    let Ok(tokens) = tokenize(input) else {
        return;
    };
    let mut previous_was_dot = false;
    for token in tokens {
        match &token.kind {
            // `a.b` reads property `b`, not a variable
            TokenKind::Identifier(name) if !previous_was_dot => {
                found.push((name.clone(), base + token.span.start..base + token.span.end));
            }
            TokenKind::Template(parts) => {
                for part in parts {
                    if let TemplatePart::Expr { source, offset } = part {
                        collect_identifiers(source, base + offset, found);
                    }
                }
            }
            _ => {}
        }
        previous_was_dot = token.kind == TokenKind::Dot;
    }
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    tokens: Vec<Token>,
    templates: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            tokens: Vec::new(),
            templates: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, EvaluationError> {
        while let Some((start, ch)) = self.chars.next() {
            let kind = match ch {
                c if c.is_whitespace() => continue,
                '"' | '\'' => TokenKind::Str(self.read_string(start, ch)?),
                '`' => TokenKind::Template(self.read_template(start)?),
                c if c.is_ascii_digit() => self.read_number(start)?,
                '.' if self.peek_is(|c| c.is_ascii_digit()) => self.read_number(start)?,
                c if is_identifier_start(c) => self.read_word(start),
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                ':' => TokenKind::Colon,
                '.' => TokenKind::Dot,
                '?' => TokenKind::Question,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '!' => {
                    if self.eat('=') {
                        if self.eat('=') {
                            TokenKind::StrictNotEq
                        } else {
                            TokenKind::NotEq
                        }
                    } else {
                        TokenKind::Bang
                    }
                }
                '=' => {
                    if !self.eat('=') {
                        return Err(EvaluationError::syntax(start, "assignment is not allowed"));
                    }
                    if self.eat('=') {
                        TokenKind::StrictEq
                    } else {
                        TokenKind::EqEq
                    }
                }
                '<' => {
                    if self.eat('=') {
                        TokenKind::Le
                    } else {
                        TokenKind::Lt
                    }
                }
                '>' => {
                    if self.eat('=') {
                        TokenKind::Ge
                    } else {
                        TokenKind::Gt
                    }
                }
                '&' if self.eat('&') => TokenKind::AndAnd,
                '|' if self.eat('|') => TokenKind::OrOr,
                other => {
                    return Err(EvaluationError::syntax(
                        start,
                        format!("unexpected character `{other}`"),
                    ));
                }
            };
            let end = self.position();
            self.tokens.push(Token {
                kind,
                span: start..end,
            });
        }
        Ok(self.tokens)
    }

    fn position(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |(i, _)| *i)
    }

    fn peek_is(&mut self, predicate: impl Fn(char) -> bool) -> bool {
        self.chars.peek().is_some_and(|(_, c)| predicate(*c))
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_is(|c| c == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn read_word(&mut self, start: usize) -> TokenKind {
        while self.peek_is(is_identifier_part) {
            self.chars.next();
        }
        let end = self.position();
        match &self.input[start..end] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" | "undefined" => TokenKind::Null,
            word => TokenKind::Identifier(word.to_string()),
        }
    }

    fn read_number(&mut self, start: usize) -> Result<TokenKind, EvaluationError> {
        while self.peek_is(|c| c.is_ascii_digit() || c == '.') {
            self.chars.next();
        }
        if self.peek_is(|c| c == 'e' || c == 'E') {
            self.chars.next();
            if self.peek_is(|c| c == '+' || c == '-') {
                self.chars.next();
            }
            while self.peek_is(|c| c.is_ascii_digit()) {
                self.chars.next();
            }
        }
        let end = self.position();
        let text = &self.input[start..end];
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(TokenKind::Number)
            .ok_or_else(|| EvaluationError::syntax(start, format!("invalid number `{text}`")))
    }

    fn read_string(&mut self, start: usize, quote: char) -> Result<String, EvaluationError> {
        let mut text = String::new();
        while let Some((i, ch)) = self.chars.next() {
            match ch {
                c if c == quote => return Ok(text),
                '\\' => text.push(self.read_escape(i)?),
                c => text.push(c),
            }
        }
        Err(EvaluationError::syntax(start, "unterminated string"))
    }

    fn read_escape(&mut self, at: usize) -> Result<char, EvaluationError> {
        let Some((_, ch)) = self.chars.next() else {
            return Err(EvaluationError::syntax(at, "unterminated escape"));
        };
        let escaped = match ch {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '0' => '\0',
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .chars
                        .next()
                        .and_then(|(_, c)| c.to_digit(16))
                        .ok_or_else(|| EvaluationError::syntax(at, "invalid unicode escape"))?;
                    code = code * 16 + digit;
                }
                char::from_u32(code)
                    .ok_or_else(|| EvaluationError::syntax(at, "invalid unicode escape"))?
            }
            other => other,
        };
        Ok(escaped)
    }

    fn read_template(&mut self, start: usize) -> Result<Vec<TemplatePart>, EvaluationError> {
        if self.templates >= MAX_DEPTH {
            return Err(EvaluationError::syntax(start, "template literals nested too deeply"));
        }
        self.templates += 1;
        let parts = self.read_template_parts(start);
        self.templates -= 1;
        parts
    }

    fn read_template_parts(&mut self, start: usize) -> Result<Vec<TemplatePart>, EvaluationError> {
        let mut parts = Vec::new();
        let mut text = String::new();
        while let Some((i, ch)) = self.chars.next() {
            match ch {
                '`' => {
                    if !text.is_empty() {
                        parts.push(TemplatePart::Text(text));
                    }
                    return Ok(parts);
                }
                '\\' => text.push(self.read_escape(i)?),
                '$' if self.eat('{') => {
                    if !text.is_empty() {
                        parts.push(TemplatePart::Text(std::mem::take(&mut text)));
                    }
                    let offset = self.position();
                    let end = self.skip_interpolation(i)?;
                    parts.push(TemplatePart::Expr {
                        source: self.input[offset..end].to_string(),
                        offset,
                    });
                }
                c => text.push(c),
            }
        }
        Err(EvaluationError::syntax(start, "unterminated template literal"))
    }

    /// Advances past the `}` closing an interpolation and returns its byte
    /// index.
    fn skip_interpolation(&mut self, start: usize) -> Result<usize, EvaluationError> {
        let mut depth = 0usize;
        while let Some((i, ch)) = self.chars.next() {
            match ch {
                '{' => depth += 1,
                '}' if depth == 0 => return Ok(i),
                '}' => depth -= 1,
                '"' | '\'' => {
                    self.read_string(i, ch)?;
                }
                '`' => {
                    self.read_template(i)?;
                }
                _ => {}
            }
        }
        Err(EvaluationError::syntax(start, "unterminated interpolation"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_encoded_identifier_is_one_token() {
        assert_eq!(
            kinds("$ws$dataSource$abc__DASH__1"),
            vec![TokenKind::Identifier("$ws$dataSource$abc__DASH__1".into())]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("a === b !== c && d || !e"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::StrictEq,
                TokenKind::Identifier("b".into()),
                TokenKind::StrictNotEq,
                TokenKind::Identifier("c".into()),
                TokenKind::AndAnd,
                TokenKind::Identifier("d".into()),
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Identifier("e".into()),
            ]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#""a\"b" 'c\n'"#),
            vec![TokenKind::Str("a\"b".into()), TokenKind::Str("c\n".into())]
        );
        assert_eq!(kinds(r#""A""#), vec![TokenKind::Str("A".into())]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 2.5 1e3 .5"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_template_parts() {
        let tokens = tokenize("`https://x/${a}/y`").unwrap();
        assert_eq!(
            tokens[0].kind,
            TokenKind::Template(vec![
                TemplatePart::Text("https://x/".into()),
                TemplatePart::Expr {
                    source: "a".into(),
                    offset: 13,
                },
                TemplatePart::Text("/y".into()),
            ])
        );
    }

    #[test]
    fn test_template_with_nested_braces() {
        let tokens = tokenize("`${ {\"k\": \"}\"}.k }`").unwrap();
        let TokenKind::Template(parts) = &tokens[0].kind else {
            panic!("expected template");
        };
        assert_eq!(parts.len(), 1);
        assert!(matches!(&parts[0], TemplatePart::Expr { source, .. } if source.contains(".k")));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            tokenize("\"open"),
            Err(EvaluationError::Syntax { .. })
        ));
        assert!(tokenize("a = b").is_err());
        assert!(tokenize("a # b").is_err());
        assert!(tokenize("`${a`").is_err());
    }

    #[test]
    fn test_deeply_nested_templates_are_rejected() {
        let levels = MAX_DEPTH + 1;
        let input = format!("{}1{}", "`${".repeat(levels), "}`".repeat(levels));
        assert!(matches!(
            tokenize(&input),
            Err(EvaluationError::Syntax { .. })
        ));
        assert!(identifier_spans(&input).is_empty());

        let shallow = format!("{}a{}", "`${".repeat(3), "}`".repeat(3));
        assert!(tokenize(&shallow).is_ok());
    }

    #[test]
    fn test_identifier_spans_skip_properties_and_strings() {
        let spans = identifier_spans("a.b + \"c\" + `${d}`");
        let names: Vec<&str> = spans.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "d"]);
        let input = "a.b + \"c\" + `${d}`";
        let (_, d_span) = &spans[1];
        assert_eq!(&input[d_span.clone()], "d");
    }
}
