//! Parameter expression parsing and evaluation
//!
//! The offline model understands three expression forms:
//! - quoted text: `'Red'`, with `\'` standing for a literal quote
//! - a length: `40`, `40 mm`, `2.5in` (millimetres when no unit is given)
//! - a reference to another parameter by name: `width`

use crate::domain::job::LengthUnit;
use crate::domain::{Result, SweepError};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Bound on reference chains (`a` -> `b` -> `c` ...)
pub const MAX_REFERENCE_DEPTH: usize = 16;

/// A parsed expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Quoted text, unescaped
    Text(String),
    /// Length in millimetres
    Length(f64),
    /// Name of another parameter
    Reference(String),
}

/// Value of an evaluated parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unquoted text
    Text(String),
    /// Millimetres
    Length(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "'{text}'"),
            Value::Length(mm) => write!(f, "{mm} mm"),
        }
    }
}

fn length_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(-?(?:\d+\.?\d*|\.\d+))\s*([A-Za-z]+)?$").expect("valid length regex")
    })
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

/// Parse an expression
///
/// # Errors
///
/// Returns [`SweepError::Parameter`] for unterminated text, stray quotes,
/// unknown units and anything that is none of the three forms.
pub fn parse(expression: &str) -> Result<Expr> {
    let trimmed = expression.trim();

    if let Some(rest) = trimmed.strip_prefix('\'') {
        return parse_text(rest)
            .map(Expr::Text)
            .ok_or_else(|| SweepError::Parameter(format!("Malformed text expression: {trimmed}")));
    }

    if let Some(caps) = length_pattern().captures(trimmed) {
        let magnitude: f64 = caps[1]
            .parse()
            .map_err(|_| SweepError::Parameter(format!("Invalid number: {}", &caps[1])))?;
        let unit = match caps.get(2) {
            Some(unit) => unit
                .as_str()
                .to_ascii_lowercase()
                .parse::<LengthUnit>()
                .map_err(SweepError::Parameter)?,
            None => LengthUnit::Mm,
        };
        return Ok(Expr::Length(magnitude * unit.millimeters()));
    }

    if identifier_pattern().is_match(trimmed) {
        return Ok(Expr::Reference(trimmed.to_string()));
    }

    Err(SweepError::Parameter(format!(
        "Unsupported expression: {trimmed}"
    )))
}

/// Unescape the body of a quoted string; `rest` follows the opening quote
fn parse_text(rest: &str) -> Option<String> {
    let mut text = String::with_capacity(rest.len());
    let mut chars = rest.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.clone().next() {
                Some('\'') => {
                    chars.next();
                    text.push('\'');
                }
                _ => text.push('\\'),
            },
            '\'' => return chars.as_str().is_empty().then_some(text),
            other => text.push(other),
        }
    }

    None
}

/// Evaluate every parameter of a table
///
/// # Errors
///
/// Returns [`SweepError::Regeneration`] naming the first parameter that does
/// not evaluate.
pub fn evaluate_all(table: &HashMap<String, String>) -> Result<HashMap<String, Value>> {
    let mut names: Vec<&String> = table.keys().collect();
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let value = resolve(name, table, 0).map_err(|e| {
                SweepError::Regeneration(format!("Parameter '{name}' does not evaluate: {e}"))
            })?;
            Ok((name.clone(), value))
        })
        .collect()
}

/// Evaluate a dimension expression to millimetres
///
/// # Errors
///
/// Returns [`SweepError::Regeneration`] if the expression does not resolve
/// to a length.
pub fn evaluate_length(expression: &str, table: &HashMap<String, String>) -> Result<f64> {
    let value = parse(expression)
        .and_then(|expr| evaluate(expr, table, 0))
        .map_err(|e| SweepError::Regeneration(e.to_string()))?;

    match value {
        Value::Length(mm) => Ok(mm),
        Value::Text(text) => Err(SweepError::Regeneration(format!(
            "Expected a length, found text '{text}'"
        ))),
    }
}

fn resolve(name: &str, table: &HashMap<String, String>, depth: usize) -> Result<Value> {
    if depth > MAX_REFERENCE_DEPTH {
        return Err(SweepError::Regeneration(format!(
            "Reference chain through '{name}' is circular or too deep"
        )));
    }

    let expression = table
        .get(name)
        .ok_or_else(|| SweepError::Regeneration(format!("Unknown parameter '{name}'")))?;

    evaluate(parse(expression)?, table, depth + 1)
}

fn evaluate(expr: Expr, table: &HashMap<String, String>, depth: usize) -> Result<Value> {
    match expr {
        Expr::Text(text) => Ok(Value::Text(text)),
        Expr::Length(mm) => Ok(Value::Length(mm)),
        Expr::Reference(name) => resolve(&name, table, depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test_case("'Red'", "Red" ; "plain")]
    #[test_case("'O\\'Brien'", "O'Brien" ; "escaped quote")]
    #[test_case("'C:\\temp'", "C:\\temp" ; "other backslash is literal")]
    #[test_case("''", "" ; "empty")]
    #[test_case("  'A B'  ", "A B" ; "surrounding whitespace")]
    fn test_parse_text(expression: &str, expected: &str) {
        assert_eq!(parse(expression).unwrap(), Expr::Text(expected.to_string()));
    }

    #[test_case("'Red" ; "unterminated")]
    #[test_case("'O'Brien'" ; "stray quote")]
    #[test_case("'abc\\'" ; "escaped closing quote")]
    fn test_parse_text_rejects(expression: &str) {
        assert!(matches!(parse(expression), Err(SweepError::Parameter(_))));
    }

    #[test_case("40", 40.0 ; "bare number is mm")]
    #[test_case("40 mm", 40.0 ; "mm")]
    #[test_case("2cm", 20.0 ; "cm")]
    #[test_case("1 in", 25.4 ; "inches")]
    #[test_case("-1.5 MM", -1.5 ; "negative and uppercase unit")]
    #[test_case(".5", 0.5 ; "leading dot")]
    fn test_parse_length(expression: &str, mm: f64) {
        match parse(expression).unwrap() {
            Expr::Length(value) => assert!((value - mm).abs() < 1e-9),
            other => panic!("expected length, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_unit() {
        let err = parse("40 furlong").unwrap_err();
        assert!(err.to_string().contains("furlong"));
    }

    #[test]
    fn test_parse_reference_and_garbage() {
        assert_eq!(parse("width").unwrap(), Expr::Reference("width".to_string()));
        assert!(parse("width * 2").is_err());
    }

    #[test]
    fn test_evaluate_references() {
        let params = table(&[("width", "40 mm"), ("depth", "width"), ("label", "'A'")]);

        let values = evaluate_all(&params).unwrap();
        assert_eq!(values["depth"], Value::Length(40.0));
        assert_eq!(values["label"], Value::Text("A".to_string()));
        assert_eq!(evaluate_length("depth", &params).unwrap(), 40.0);
    }

    #[test]
    fn test_evaluate_cycle_and_missing() {
        let cyclic = table(&[("a", "b"), ("b", "a")]);
        assert!(matches!(evaluate_all(&cyclic), Err(SweepError::Regeneration(_))));

        let missing = table(&[("a", "nothing")]);
        let err = evaluate_all(&missing).unwrap_err();
        assert!(err.to_string().contains("Unknown parameter 'nothing'"));
    }

    #[test]
    fn test_text_is_not_a_length() {
        let params = table(&[("label", "'A'")]);
        assert!(evaluate_length("label", &params).is_err());
    }
}
