//! Literal rendering and truthiness for JSON payloads
//!
//! Stub collaborators describe payloads in their result strings using
//! mapping-literal notation (`{'info': 'x'}`, `True`, `None`), and decide
//! failure triggers by truthiness. Both rules live here.

use serde_json::Value;
use std::fmt;

/// Display adapter rendering a JSON value as a mapping literal
///
/// ```
/// use escalation_router::workers::PayloadRepr;
/// use serde_json::json;
///
/// let payload = json!({"payload": "y", "error": true});
/// assert_eq!(
///     PayloadRepr(&payload).to_string(),
///     "{'payload': 'y', 'error': True}"
/// );
/// ```
pub struct PayloadRepr<'a>(pub &'a Value);

impl fmt::Display for PayloadRepr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self.0)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("None"),
        Value::Bool(true) => f.write_str("True"),
        Value::Bool(false) => f.write_str("False"),
        Value::Number(n) => write!(f, "{n}"),
        Value::String(s) => write_str_literal(f, s),
        Value::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item)?;
            }
            f.write_str("]")
        }
        Value::Object(map) => {
            f.write_str("{")?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_str_literal(f, key)?;
                f.write_str(": ")?;
                write_value(f, item)?;
            }
            f.write_str("}")
        }
    }
}

/// Single quotes unless the text holds a single quote and no double quote
fn write_str_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    write!(f, "{quote}")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "{quote}")
}

/// Whether a value counts as set when used as a flag
///
/// Null, `false`, zero, and empty strings, lists, or mappings are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repr(value: Value) -> String {
        PayloadRepr(&value).to_string()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(repr(json!(null)), "None");
        assert_eq!(repr(json!(true)), "True");
        assert_eq!(repr(json!(false)), "False");
        assert_eq!(repr(json!(42)), "42");
        assert_eq!(repr(json!(-1.5)), "-1.5");
        assert_eq!(repr(json!("some data")), "'some data'");
    }

    #[test]
    fn test_mapping_keeps_insertion_order() {
        assert_eq!(
            repr(json!({"zeta": 1, "alpha": [1, "two", null]})),
            "{'zeta': 1, 'alpha': [1, 'two', None]}"
        );
    }

    #[test]
    fn test_nested_and_empty() {
        assert_eq!(repr(json!({})), "{}");
        assert_eq!(repr(json!([])), "[]");
        assert_eq!(
            repr(json!({"data": {"data": "inner"}})),
            "{'data': {'data': 'inner'}}"
        );
    }

    #[test]
    fn test_string_quoting() {
        assert_eq!(repr(json!("it's")), "\"it's\"");
        assert_eq!(repr(json!("say \"hi\"")), "'say \"hi\"'");
        assert_eq!(repr(json!("both ' and \"")), "'both \\' and \"'");
        assert_eq!(repr(json!("line\nbreak")), "'line\\nbreak'");
        assert_eq!(repr(json!("back\\slash")), "'back\\\\slash'");
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-0.5), json!("x"), json!([0]), json!({"a": null})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }
}
