//! Expression evaluation against a scope.
//!
//! Values follow JavaScript semantics where they matter for resource
//! fields: `+` concatenates when either side is a string, missing object
//! keys read as `null`, and `&&` / `||` return one of their operands.

use serde_json::{Map, Value};
use tracing::debug;

use scopebind_domain::Scope;

use super::error::EvaluationError;
use super::literal::is_literal;
use super::parser::{BinaryOp, Expr, TemplateSegment, UnaryOp, number_value, parse};

/// Evaluates an expression string against a scope.
///
/// Literal expressions are decoded directly and never consult the scope.
///
/// # Errors
///
/// Returns an [`EvaluationError`] for malformed expressions, identifiers
/// that are not in scope, and operations with no sensible result.
pub fn evaluate(expression: &str, scope: &Scope) -> Result<Value, EvaluationError> {
    if is_literal(expression) {
        return serde_json::from_str(expression)
            .map_err(|e| EvaluationError::syntax(e.column().saturating_sub(1), e.to_string()));
    }
    let expr = parse(expression)?;
    eval(&expr, scope)
}

/// Evaluates an expression, folding any failure into `placeholder`.
///
/// This is what fields render: evaluation never fails from the caller's
/// point of view.
#[must_use]
pub fn compute_expression(expression: &str, scope: &Scope, placeholder: &str) -> Value {
    match evaluate(expression, scope) {
        Ok(value) => value,
        Err(error) => {
            debug!(%expression, %error, "expression evaluation failed");
            Value::String(placeholder.to_string())
        }
    }
}

/// Converts a value to its display string (`String(value)` in JS terms).
#[must_use]
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number
            .as_i64()
            .map_or_else(|| format_number(number.as_f64().unwrap_or(f64::NAN)), |i| i.to_string()),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// JavaScript truthiness.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `Number.prototype.toString`: plain digits for magnitudes in
/// `[1e-6, 1e21)`, exponent form with an explicit sign otherwise.
fn format_number(number: f64) -> String {
    let magnitude = number.abs();
    if magnitude == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return format!("{number}");
    }
    let text = format!("{number:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

fn finite(number: f64) -> Result<Value, EvaluationError> {
    if number.is_finite() {
        number_value(number).ok_or(EvaluationError::NonFinite)
    } else {
        Err(EvaluationError::NonFinite)
    }
}

fn eval(expr: &Expr, scope: &Scope) -> Result<Value, EvaluationError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Identifier(name) => scope
            .get(name)
            .cloned()
            .ok_or_else(|| EvaluationError::UndefinedVariable(name.clone())),
        Expr::Array(items) => items
            .iter()
            .map(|item| eval(item, scope))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Expr::Object(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key.clone(), eval(value, scope)?);
            }
            Ok(Value::Object(map))
        }
        Expr::Template(segments) => {
            let mut text = String::new();
            for segment in segments {
                match segment {
                    TemplateSegment::Text(raw) => text.push_str(raw),
                    TemplateSegment::Expr(inner) => {
                        text.push_str(&to_display_string(&eval(inner, scope)?));
                    }
                }
            }
            Ok(Value::String(text))
        }
        Expr::Member { object, property } => {
            let object = eval(object, scope)?;
            let property = eval(property, scope)?;
            read_member(&object, &property)
        }
        Expr::Unary { op, operand } => {
            let operand = eval(operand, scope)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!is_truthy(&operand))),
                UnaryOp::Negate => numeric_unary("-", &operand).and_then(|n| finite(-n)),
                UnaryOp::Plus => numeric_unary("+", &operand).and_then(finite),
            }
        }
        Expr::Binary { op, left, right } => match op {
            BinaryOp::And => {
                let left = eval(left, scope)?;
                if is_truthy(&left) { eval(right, scope) } else { Ok(left) }
            }
            BinaryOp::Or => {
                let left = eval(left, scope)?;
                if is_truthy(&left) { Ok(left) } else { eval(right, scope) }
            }
            _ => {
                let left = eval(left, scope)?;
                let right = eval(right, scope)?;
                binary(*op, &left, &right)
            }
        },
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if is_truthy(&eval(test, scope)?) {
                eval(consequent, scope)
            } else {
                eval(alternate, scope)
            }
        }
    }
}

fn numeric_unary(operator: &'static str, operand: &Value) -> Result<f64, EvaluationError> {
    let number = to_number(operand);
    if number.is_nan() {
        Err(EvaluationError::InvalidOperands {
            operator,
            left: type_name(operand),
            right: type_name(operand),
        })
    } else {
        Ok(number)
    }
}

fn read_member(object: &Value, property: &Value) -> Result<Value, EvaluationError> {
    let key = to_display_string(property);
    match object {
        Value::Null => Err(EvaluationError::NullMember(key)),
        Value::Object(map) => Ok(map.get(&key).cloned().unwrap_or(Value::Null)),
        Value::Array(items) if key == "length" => Ok(Value::from(items.len())),
        Value::Array(items) => Ok(key
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index).cloned())
            .unwrap_or(Value::Null)),
        Value::String(text) if key == "length" => Ok(Value::from(text.chars().count())),
        Value::String(text) => Ok(key
            .parse::<usize>()
            .ok()
            .and_then(|index| text.chars().nth(index))
            .map_or(Value::Null, |ch| Value::String(ch.to_string()))),
        Value::Bool(_) | Value::Number(_) => Ok(Value::Null),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvaluationError> {
    let invalid = || EvaluationError::InvalidOperands {
        operator: op.symbol(),
        left: type_name(left),
        right: type_name(right),
    };
    match op {
        BinaryOp::Add => {
            if is_stringy(left) || is_stringy(right) {
                let mut text = to_display_string(left);
                text.push_str(&to_display_string(right));
                Ok(Value::String(text))
            } else {
                finite(to_number(left) + to_number(right))
            }
        }
        BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Remainder => {
            let (l, r) = (to_number(left), to_number(right));
            if l.is_nan() || r.is_nan() {
                return Err(invalid());
            }
            let result = match op {
                BinaryOp::Subtract => l - r,
                BinaryOp::Multiply => l * r,
                BinaryOp::Divide => l / r,
                _ => l % r,
            };
            finite(result)
        }
        BinaryOp::StrictEq => Ok(Value::Bool(strict_equals(left, right))),
        BinaryOp::StrictNotEq => Ok(Value::Bool(!strict_equals(left, right))),
        BinaryOp::LooseEq => Ok(Value::Bool(loose_equals(left, right))),
        BinaryOp::LooseNotEq => Ok(Value::Bool(!loose_equals(left, right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = match (left, right) {
                // JS orders strings by UTF-16 code unit
                (Value::String(l), Value::String(r)) => {
                    Some(l.encode_utf16().cmp(r.encode_utf16()))
                }
                _ => to_number(left).partial_cmp(&to_number(right)),
            };
            let Some(ordering) = ordering else {
                return Ok(Value::Bool(false));
            };
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }
        BinaryOp::And | BinaryOp::Or => Err(invalid()),
    }
}

const fn is_stringy(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Array(_) | Value::Object(_))
}

fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64() == r.as_f64(),
        // objects and arrays compare by identity in JS; freshly read values
        // are never identical
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => left == right,
    }
}

fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_) | Value::String(_) | Value::Bool(_), Value::Number(_) | Value::Bool(_))
        | (Value::Number(_) | Value::Bool(_), Value::String(_)) => {
            let (l, r) = (to_number(left), to_number(right));
            !l.is_nan() && l == r
        }
        _ => strict_equals(left, right),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn scope() -> Scope {
        let mut scope = Scope::new();
        scope.insert("$ws$dataSource$host", json!("api.example.com"), "host");
        scope.insert("$ws$dataSource$page", json!(2), "page");
        scope.insert(
            "$ws$dataSource$user",
            json!({"name": "Ada", "tags": ["a", "b"]}),
            "user",
        );
        scope.insert("$ws$dataSource$empty", json!(""), "empty");
        scope
    }

    #[test]
    fn test_literal_ignores_scope() {
        assert_eq!(evaluate("\"plain\"", &Scope::new()).unwrap(), json!("plain"));
        assert_eq!(evaluate("42", &scope()).unwrap(), json!(42));
        assert_eq!(evaluate("null", &scope()).unwrap(), Value::Null);
    }

    #[test]
    fn test_identifier_substitution() {
        assert_eq!(
            evaluate("$ws$dataSource$host", &scope()).unwrap(),
            json!("api.example.com")
        );
    }

    #[test]
    fn test_template_url() {
        let value = evaluate(
            "`https://${$ws$dataSource$host}/users?page=${$ws$dataSource$page + 1}`",
            &scope(),
        )
        .unwrap();
        assert_eq!(value, json!("https://api.example.com/users?page=3"));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            evaluate("\"Bearer \" + $ws$dataSource$user.name", &scope()).unwrap(),
            json!("Bearer Ada")
        );
        assert_eq!(evaluate("1 + \"2\"", &scope()).unwrap(), json!("12"));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(evaluate("$ws$dataSource$page * 10 - 5", &scope()).unwrap(), json!(15));
        assert_eq!(evaluate("7 / 2", &scope()).unwrap(), json!(3.5));
        assert_eq!(evaluate("7 % 4", &scope()).unwrap(), json!(3));
        assert_eq!(evaluate("-$ws$dataSource$page", &scope()).unwrap(), json!(-2));
    }

    #[test]
    fn test_member_access() {
        assert_eq!(
            evaluate("$ws$dataSource$user.tags[1]", &scope()).unwrap(),
            json!("b")
        );
        assert_eq!(
            evaluate("$ws$dataSource$user.tags.length", &scope()).unwrap(),
            json!(2)
        );
        assert_eq!(
            evaluate("$ws$dataSource$user.missing", &scope()).unwrap(),
            Value::Null
        );
        assert_eq!(
            evaluate("$ws$dataSource$user.missing.deeper", &scope()),
            Err(EvaluationError::NullMember("deeper".into()))
        );
    }

    #[test]
    fn test_logic_and_conditionals() {
        assert_eq!(
            evaluate("$ws$dataSource$empty || \"fallback\"", &scope()).unwrap(),
            json!("fallback")
        );
        assert_eq!(
            evaluate("$ws$dataSource$page > 1 ? \"next\" : \"first\"", &scope()).unwrap(),
            json!("next")
        );
        assert_eq!(evaluate("!$ws$dataSource$empty", &scope()).unwrap(), json!(true));
        assert_eq!(evaluate("2 == \"2\"", &scope()).unwrap(), json!(true));
        assert_eq!(evaluate("2 === \"2\"", &scope()).unwrap(), json!(false));
        assert_eq!(evaluate("1 === 1.0", &scope()).unwrap(), json!(true));
    }

    #[test]
    fn test_short_circuit_skips_undefined() {
        assert_eq!(
            evaluate("false && $ws$dataSource$nope", &scope()).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn test_object_literal_with_bindings() {
        assert_eq!(
            evaluate("{page: $ws$dataSource$page, q: 'x'}", &scope()).unwrap(),
            json!({"page": 2, "q": "x"})
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            evaluate("$ws$dataSource$nope", &scope()),
            Err(EvaluationError::UndefinedVariable("$ws$dataSource$nope".into()))
        );
        assert!(matches!(
            evaluate("\"a\" - 1", &scope()),
            Err(EvaluationError::InvalidOperands { operator: "-", .. })
        ));
        assert_eq!(evaluate("1 / 0", &scope()), Err(EvaluationError::NonFinite));
        assert_eq!(evaluate("", &scope()), Err(EvaluationError::Empty));
        assert!(matches!(evaluate("(", &scope()), Err(EvaluationError::Syntax { .. })));
    }

    #[test]
    fn test_compute_expression_degrades_to_placeholder() {
        assert_eq!(
            compute_expression("$ws$dataSource$nope + ", &scope(), "#error"),
            json!("#error")
        );
        assert_eq!(
            compute_expression("$ws$dataSource$page", &scope(), "#error"),
            json!(2)
        );
    }

    #[test]
    fn test_deep_nesting_degrades_to_placeholder() {
        let nested = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(compute_expression(&nested, &scope(), "#error"), json!("#error"));

        let chained = format!("$ws$dataSource$page{}", " + 1".repeat(10_000));
        assert_eq!(compute_expression(&chained, &scope(), "#error"), json!("#error"));

        let array = format!("{}1{}", "[".repeat(10_000), "]".repeat(10_000));
        assert_eq!(compute_expression(&array, &scope(), "#error"), json!("#error"));

        let template = format!("{}1{}", "`${".repeat(1_000), "}`".repeat(1_000));
        assert_eq!(compute_expression(&template, &scope(), "#error"), json!("#error"));
    }

    #[test]
    fn test_string_comparison_uses_utf16_order() {
        // U+FF61 sorts above the surrogate pair of U+1F600 in UTF-16
        assert_eq!(
            evaluate("'\u{ff61}' > '\u{1f600}'", &scope()).unwrap(),
            json!(true)
        );
        assert_eq!(evaluate("\"a\" < \"b\"", &scope()).unwrap(), json!(true));
    }

    #[test]
    fn test_display_string() {
        assert_eq!(to_display_string(&json!(1e21)), "1e+21");
        assert_eq!(to_display_string(&json!(1.5e300)), "1.5e+300");
        assert_eq!(to_display_string(&json!(1.5e-7)), "1.5e-7");
        assert_eq!(to_display_string(&json!(1e20)), "100000000000000000000");
        assert_eq!(to_display_string(&json!(0.000_001)), "0.000001");
        assert_eq!(to_display_string(&json!(1.5)), "1.5");
        assert_eq!(to_display_string(&json!([1, null, "x"])), "1,,x");
        assert_eq!(to_display_string(&json!({"a": 1})), "[object Object]");
    }

    fn json_literal() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            (-4_000_000i32..4_000_000).prop_map(|n| json!(f64::from(n) / 4.0)),
            "[ -~]{0,24}".prop_map(Value::String),
            "\\PC{0,8}".prop_map(Value::String),
        ]
    }

    proptest! {
        #[test]
        fn prop_literal_round_trip(value in json_literal(), extra in any::<i32>()) {
            let mut any_scope = scope();
            any_scope.insert("$ws$dataSource$extra", json!(extra), "extra");
            let encoded = value.to_string();
            prop_assert_eq!(evaluate(&encoded, &any_scope).unwrap(), value.clone());
            prop_assert_eq!(evaluate(&encoded, &Scope::new()).unwrap(), value);
        }
    }
}
