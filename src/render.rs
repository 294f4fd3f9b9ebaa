//! Compact JSON rendering for diagnostics.
//!
//! Same output as `serde_json::to_string` except for floats that carry an
//! integral value: those print without a fractional part (`1234.0` → `1234`),
//! which is how values are quoted in type-mismatch messages.
use serde_json::{Number, Value};

pub fn render_compact(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Plain textual form of a number: integers as-is, integral floats without
/// the trailing `.0`.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => float_text(f),
        _ => n.to_string(),
    }
}

pub fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        // `{}` on f64 already trims trailing zeros (1234.45, not 1234.450000)
        format!("{f}")
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&number_text(n)),
        Value::String(s) => write_str(out, s),
        Value::Array(xs) => {
            out.push('[');
            for (i, x) in xs.iter().enumerate() {
                if i > 0 { out.push(','); }
                write_value(out, x);
            }
            out.push(']');
        }
        Value::Object(m) => {
            out.push('{');
            for (i, (k, v)) in m.iter().enumerate() {
                if i > 0 { out.push(','); }
                write_str(out, k);
                out.push(':');
                write_value(out, v);
            }
            out.push('}');
        }
    }
}

fn write_str(out: &mut String, s: &str) {
    // serializing a &str cannot fail
    match serde_json::to_string(s) {
        Ok(quoted) => out.push_str(&quoted),
        Err(_) => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_floats_drop_fraction() {
        assert_eq!(render_compact(&json!(1234.0)), "1234");
        assert_eq!(render_compact(&json!(1234.45)), "1234.45");
        assert_eq!(render_compact(&json!(-3.0)), "-3");
    }

    #[test]
    fn containers_are_compact_and_ordered() {
        let v = json!({"key": "value", "key2": [1, 2.5, null, true]});
        assert_eq!(render_compact(&v), r#"{"key":"value","key2":[1,2.5,null,true]}"#);
        assert_eq!(render_compact(&json!(["test1", "test2"])), r#"["test1","test2"]"#);
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(render_compact(&json!("a\"b")), r#""a\"b""#);
    }
}
