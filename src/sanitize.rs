//! Recursive tree walker.
//!
//! Walks the data depth-first, checks every node once against the descriptor
//! inferred from its schema sub-tree, and descends only into containers whose
//! shape the checker confirmed. A failed shape check replaces the whole
//! subtree with its diagnostic. The input is never mutated; the result is a
//! fresh tree of the same shape.
use serde_json::{Map, Value};

use crate::descriptor::{child_schema, has_child_schemas, infer_descriptor, ChildKey};
use crate::diagnostic::looks_like_diagnostic;
use crate::validate::{check, CheckOutcome};

/// Sanitizes `data` against `schema`.
///
/// The root container itself is not checked, only its children are, each
/// against the schema entry found for its key. A scalar root is checked
/// directly against the schema root.
pub fn sanitize(data: &Value, schema: &Value) -> Value {
    let mut path = Path::default();
    match data {
        Value::Array(_) | Value::Object(_) => walk_children(data, schema, &mut path),
        _ => walk_node(data, Some(schema), &mut path),
    }
}

fn walk_node(value: &Value, schema: Option<&Value>, path: &mut Path) -> Value {
    let descriptor = infer_descriptor(schema);
    match check(value, &descriptor) {
        CheckOutcome::ShapeConfirmed(confirmed) => match schema {
            Some(schema) if has_child_schemas(schema) => {
                tracing::trace!(path = %path, "shape confirmed, descending");
                walk_children(value, schema, path)
            }
            // bare `array`/`object` tag: nothing to check children against
            _ => confirmed,
        },
        CheckOutcome::Coerced(v) => v,
        CheckOutcome::Diagnostic(d) => {
            tracing::debug!(path = %path, diagnostic = %d, "value replaced by diagnostic");
            d.into_value()
        }
    }
}

fn walk_children(container: &Value, schema: &Value, path: &mut Path) -> Value {
    match container {
        Value::Array(xs) => {
            let mut out = Vec::with_capacity(xs.len());
            for (i, x) in xs.iter().enumerate() {
                let key = ChildKey::Index(i);
                path.push(key.to_string());
                out.push(walk_node(x, child_schema(schema, key), path));
                path.pop();
            }
            Value::Array(out)
        }
        Value::Object(m) => {
            let mut out = Map::with_capacity(m.len());
            for (k, x) in m {
                let key = ChildKey::Name(k);
                path.push(k.clone());
                out.insert(k.clone(), walk_node(x, child_schema(schema, key), path));
                path.pop();
            }
            Value::Object(out)
        }
        leaf => leaf.clone(),
    }
}

/// JSON-pointer-ish location used in log events.
#[derive(Debug, Default)]
struct Path(Vec<String>);

impl Path {
    fn push(&mut self, segment: String) { self.0.push(segment); }
    fn pop(&mut self) { self.0.pop(); }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

// ------------------------------- Report ----------------------------------- //

/// Summary of a sanitized tree: how many leaves are diagnostics, and where.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Report {
    pub leaves: usize,
    pub diagnostics: Vec<Finding>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Finding {
    pub path: String,
    pub message: String,
}

impl Report {
    pub fn of(result: &Value) -> Self {
        let mut report = Report::default();
        let mut path = Path::default();
        report.collect(result, &mut path);
        report
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn collect(&mut self, value: &Value, path: &mut Path) {
        match value {
            Value::Array(xs) => {
                for (i, x) in xs.iter().enumerate() {
                    path.push(i.to_string());
                    self.collect(x, path);
                    path.pop();
                }
            }
            Value::Object(m) => {
                for (k, x) in m {
                    path.push(k.clone());
                    self.collect(x, path);
                    path.pop();
                }
            }
            Value::String(s) if looks_like_diagnostic(s) => {
                self.leaves += 1;
                self.diagnostics.push(Finding { path: path.to_string(), message: s.clone() });
            }
            _ => self.leaves += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_of_integers() {
        let data = json!({"a": [1, 2, 3]});
        assert_eq!(sanitize(&data, &json!({"a": ["integer"]})), data);
        assert_eq!(
            sanitize(&data, &json!({"a": "string"})),
            json!({"a": "[1,2,3] является типом array. Для него был указан тип: string."})
        );
        assert_eq!(
            sanitize(&data, &json!({"a": "double"})),
            json!({"a": "Неизвестный тип данных: double."})
        );
    }

    #[test]
    fn root_is_not_checked() {
        let data = json!({"a": [["a", "b"], ["123"]]});
        assert_eq!(
            sanitize(&data, &json!([{"key": "value"}])),
            json!({"a": "Значение является массивом, а в типах данных указана структура"})
        );
    }

    #[test]
    fn missing_schema_entry_is_unknown() {
        let data = json!({"a": 1, "b": 2});
        assert_eq!(
            sanitize(&data, &json!({"a": "integer"})),
            json!({"a": 1, "b": "Неизвестный тип данных: ."})
        );
    }

    #[test]
    fn bare_container_tag_checks_shape_only() {
        let data = json!({"a": [1, "x"], "b": {"k": 1}});
        assert_eq!(sanitize(&data, &json!({"a": "array", "b": "object"})), data);
        assert_eq!(
            sanitize(&data, &json!({"a": "object", "b": "array"})),
            json!({
                "a": "Значение является массивом, а в типах данных указана структура",
                "b": "Значение является структурой, а в типах данных указан массив"
            })
        );
    }

    #[test]
    fn positional_sequence_schema() {
        let data = json!(["x", 5, 7]);
        assert_eq!(
            sanitize(&data, &json!(["string", "integer"])),
            json!(["x", 5, "7 является типом integer. Для него был указан тип: string."])
        );
    }

    #[test]
    fn scalar_root() {
        assert_eq!(sanitize(&json!("8(999)333-22-55"), &json!("phone")), json!("79993332255"));
    }

    #[test]
    fn input_is_untouched() {
        let data = json!({"p": ["+7(999)333-22-55"]});
        let before = data.clone();
        let out = sanitize(&data, &json!({"p": ["phone"]}));
        assert_eq!(data, before);
        assert_eq!(out, json!({"p": ["79993332255"]}));
    }

    #[test]
    fn report_counts_diagnostics() {
        let result = sanitize(
            &json!({"a": [1, "x"], "b": {"c": "y"}}),
            &json!({"a": ["integer"], "b": {"c": "float"}}),
        );
        let report = Report::of(&result);
        assert_eq!(report.leaves, 3);
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.diagnostics[0].path, "/a/1");
        assert_eq!(report.diagnostics[1].path, "/b/c");
        assert!(!report.is_clean());
    }
}
