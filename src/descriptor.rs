//! Schema-shape inference.
//!
//! A schema is a raw JSON tree that mirrors the data: there is no explicit
//! "this is a schema for X" marker, shape alone decides what a node means.
//!
//! - array → `SequenceOf`. Entries are per-position schemas, entry `0`
//!   doubling as the schema for every other position.
//! - object, all keys non-numeric → `StructureOf` (exact expected key set)
//! - object, any numeric key → `Named(Array)`
//! - string → `Named(tag)` or `Unknown(tag)`
//!
//! Inference is shallow: it classifies one node and is re-run by the walker
//! on each child schema at the moment of descent.
use std::fmt;

use serde_json::{Map, Value};

use crate::validate::num::is_numeric_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    String,
    Integer,
    Float,
    Phone,
    Array,
    /// Structure shape with no declared key set.
    Object,
}

impl Tag {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Tag::String),
            "integer" => Some(Tag::Integer),
            "float" => Some(Tag::Float),
            "phone" => Some(Tag::Phone),
            "array" => Some(Tag::Array),
            "object" => Some(Tag::Object),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::String => "string",
            Tag::Integer => "integer",
            Tag::Float => "float",
            Tag::Phone => "phone",
            Tag::Array => "array",
            Tag::Object => "object",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor<'s> {
    Named(Tag),
    /// Schema node that is itself a sequence; holds its element schema.
    SequenceOf(Option<&'s Value>),
    /// Expected key set, in schema order.
    StructureOf(Vec<&'s str>),
    Unknown(String),
}

impl TypeDescriptor<'_> {
    /// Tag name quoted in type-mismatch messages.
    pub fn declared_name(&self) -> String {
        match self {
            TypeDescriptor::Named(tag) => tag.name().to_string(),
            TypeDescriptor::SequenceOf(_) => Tag::Array.name().to_string(),
            TypeDescriptor::StructureOf(_) => Tag::Object.name().to_string(),
            TypeDescriptor::Unknown(t) => t.clone(),
        }
    }
}

pub fn infer_descriptor(raw: Option<&Value>) -> TypeDescriptor<'_> {
    match raw {
        None => TypeDescriptor::Unknown(String::new()),
        Some(Value::Array(xs)) => TypeDescriptor::SequenceOf(xs.first()),
        Some(Value::Object(m)) if has_numeric_key(m) => TypeDescriptor::Named(Tag::Array),
        Some(Value::Object(m)) => TypeDescriptor::StructureOf(m.keys().map(String::as_str).collect()),
        Some(Value::String(s)) => match Tag::parse(s) {
            Some(tag) => TypeDescriptor::Named(tag),
            None => TypeDescriptor::Unknown(s.clone()),
        },
        Some(other) => TypeDescriptor::Unknown(crate::render::render_compact(other)),
    }
}

pub fn has_numeric_key(m: &Map<String, Value>) -> bool {
    m.keys().any(|k| is_numeric_str(k))
}

/// Container classification of a runtime value.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// Array, or an object keyed (at least partly) by numbers.
    Sequence,
    /// Object whose keys are all non-numeric. An empty object counts.
    Structure(&'a Map<String, Value>),
    Scalar,
}

pub fn shape_of(value: &Value) -> Shape<'_> {
    match value {
        Value::Array(_) => Shape::Sequence,
        Value::Object(m) if has_numeric_key(m) => Shape::Sequence,
        Value::Object(m) => Shape::Structure(m),
        _ => Shape::Scalar,
    }
}

/// Position of a child inside its container.
#[derive(Debug, Clone, Copy)]
pub enum ChildKey<'a> {
    Index(usize),
    Name(&'a str),
}

impl fmt::Display for ChildKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildKey::Index(i) => write!(f, "{i}"),
            ChildKey::Name(k) => f.write_str(k),
        }
    }
}

/// Schema for one child: the entry at the child's own key/index, else the
/// entry at `0`, else absent. An object schema without a `"0"` key never
/// falls back to its first key by position.
pub fn child_schema<'s>(schema: &'s Value, key: ChildKey<'_>) -> Option<&'s Value> {
    match schema {
        Value::Array(xs) => {
            let own = match key {
                ChildKey::Index(i) => xs.get(i),
                ChildKey::Name(k) => k.parse::<usize>().ok().and_then(|i| xs.get(i)),
            };
            own.or_else(|| xs.first())
        }
        Value::Object(m) => {
            let own = match key {
                ChildKey::Index(i) => m.get(&i.to_string()),
                ChildKey::Name(k) => m.get(k),
            };
            own.or_else(|| m.get("0"))
        }
        _ => None,
    }
}

/// Whether a schema node carries any child schemas at all. Bare tags don't.
pub fn has_child_schemas(schema: &Value) -> bool {
    matches!(schema, Value::Array(_) | Value::Object(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_decides_descriptor() {
        let seq = json!(["integer"]);
        assert_eq!(infer_descriptor(Some(&seq)), TypeDescriptor::SequenceOf(Some(&json!("integer"))));

        let obj = json!({"a": "string", "b": "integer"});
        assert_eq!(infer_descriptor(Some(&obj)), TypeDescriptor::StructureOf(vec!["a", "b"]));

        let numeric = json!({"0": "string"});
        assert_eq!(infer_descriptor(Some(&numeric)), TypeDescriptor::Named(Tag::Array));

        let mixed = json!({"a": "string", "1": "string"});
        assert_eq!(infer_descriptor(Some(&mixed)), TypeDescriptor::Named(Tag::Array));

        assert_eq!(infer_descriptor(Some(&json!("phone"))), TypeDescriptor::Named(Tag::Phone));
        assert_eq!(infer_descriptor(Some(&json!("double"))), TypeDescriptor::Unknown("double".into()));
        assert_eq!(infer_descriptor(Some(&json!(5))), TypeDescriptor::Unknown("5".into()));
        assert_eq!(infer_descriptor(None), TypeDescriptor::Unknown(String::new()));
    }

    #[test]
    fn declared_names() {
        assert_eq!(infer_descriptor(Some(&json!(["x"]))).declared_name(), "array");
        assert_eq!(infer_descriptor(Some(&json!({"a": "x"}))).declared_name(), "object");
        assert_eq!(infer_descriptor(Some(&json!("float"))).declared_name(), "float");
    }

    #[test]
    fn child_schema_falls_back_to_zero() {
        let seq = json!(["string", "integer"]);
        assert_eq!(child_schema(&seq, ChildKey::Index(1)), Some(&json!("integer")));
        assert_eq!(child_schema(&seq, ChildKey::Index(7)), Some(&json!("string")));

        let obj = json!({"a": "float"});
        assert_eq!(child_schema(&obj, ChildKey::Name("a")), Some(&json!("float")));
        assert_eq!(child_schema(&obj, ChildKey::Name("b")), None);
        let keyed = json!({"x": "string", "y": "integer"});
        assert_eq!(child_schema(&keyed, ChildKey::Name("z")), None);
        assert_eq!(child_schema(&keyed, ChildKey::Index(5)), None);

        let numeric = json!({"0": "phone", "2": "string"});
        assert_eq!(child_schema(&numeric, ChildKey::Index(2)), Some(&json!("string")));
        assert_eq!(child_schema(&numeric, ChildKey::Index(1)), Some(&json!("phone")));

        assert_eq!(child_schema(&json!("array"), ChildKey::Index(0)), None);
        assert_eq!(child_schema(&json!([]), ChildKey::Index(0)), None);
    }

    #[test]
    fn shapes() {
        assert!(matches!(shape_of(&json!([1])), Shape::Sequence));
        assert!(matches!(shape_of(&json!({"1": 1})), Shape::Sequence));
        assert!(matches!(shape_of(&json!({"a": 1})), Shape::Structure(_)));
        assert!(matches!(shape_of(&json!({})), Shape::Structure(_)));
        assert!(matches!(shape_of(&json!("a")), Shape::Scalar));
    }
}
