use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

/// Numeric-string grammar: optional surrounding whitespace, optional sign,
/// digits with an optional fraction (or a bare fraction), optional exponent.
static NUMERIC_STR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[ \t\n\r\x0B\x0C]*$")
        .expect("numeric-string pattern is valid")
});

pub fn is_numeric_str(s: &str) -> bool {
    NUMERIC_STR.is_match(s)
}

/// Numbers of any flavour, or strings that spell one.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => is_numeric_str(s),
        _ => false,
    }
}

pub fn is_float(value: &Value) -> bool {
    matches!(value, Value::Number(n) if n.is_f64())
}

/// Integer coercion of a numeric, non-float value. Numeric strings with a
/// fraction or exponent are truncated toward zero.
pub fn to_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if !n.is_f64() => Some(Value::Number(n.clone())),
        Value::String(s) if is_numeric_str(s) => {
            let t = s.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0B');
            let t = t.strip_prefix('+').unwrap_or(t);
            if let Ok(i) = t.parse::<i64>() {
                return Some(Value::from(i));
            }
            if let Ok(u) = t.parse::<u64>() {
                return Some(Value::from(u));
            }
            // `as` saturates on overflow
            t.parse::<f64>().ok().map(|f| Value::from(f.trunc() as i64))
        }
        _ => None,
    }
}

/// Float coercion: only float-typed numbers qualify.
pub fn to_float(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().and_then(Number::from_f64).map(Value::Number),
        _ => None,
    }
}
