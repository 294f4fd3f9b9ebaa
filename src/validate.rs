//! Per-value type checker.
//!
//! Checks one value against one descriptor and never fails: the outcome is
//! either the (possibly coerced) value or a diagnostic. Container
//! descriptors are shape checks only; descending into children is the
//! walker's job, signalled by `CheckOutcome::ShapeConfirmed`.
pub mod num;
pub mod phone;

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::descriptor::{infer_descriptor, shape_of, Shape, Tag, TypeDescriptor};
use crate::diagnostic::Diagnostic;

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Container kind (and key set, for structures) matches; children still
    /// need walking.
    ShapeConfirmed(Value),
    /// Leaf accepted, possibly converted to the declared type.
    Coerced(Value),
    Diagnostic(Diagnostic),
}

impl CheckOutcome {
    pub fn into_value(self) -> Value {
        match self {
            CheckOutcome::ShapeConfirmed(v) | CheckOutcome::Coerced(v) => v,
            CheckOutcome::Diagnostic(d) => d.into_value(),
        }
    }
}

/// Validates a single value against a raw type descriptor (tag string or
/// schema node). Containers are checked for shape only.
pub fn validate(value: &Value, raw_descriptor: &Value) -> Value {
    check(value, &infer_descriptor(Some(raw_descriptor))).into_value()
}

pub fn check(value: &Value, descriptor: &TypeDescriptor<'_>) -> CheckOutcome {
    match descriptor {
        TypeDescriptor::Named(Tag::String) => check_string(value),
        TypeDescriptor::Named(Tag::Integer) => check_integer(value),
        TypeDescriptor::Named(Tag::Float) => check_float(value),
        TypeDescriptor::Named(Tag::Phone) => check_phone(value),
        TypeDescriptor::Named(Tag::Array) | TypeDescriptor::SequenceOf(_) => check_array(value, descriptor),
        TypeDescriptor::Named(Tag::Object) => check_structure(value, None, descriptor),
        TypeDescriptor::StructureOf(keys) => check_structure(value, Some(keys.as_slice()), descriptor),
        TypeDescriptor::Unknown(tag) => CheckOutcome::Diagnostic(Diagnostic::UnknownTag(tag.clone())),
    }
}

fn mismatch(value: &Value, declared: impl Into<String>) -> CheckOutcome {
    CheckOutcome::Diagnostic(Diagnostic::type_mismatch(value, declared))
}

fn check_string(value: &Value) -> CheckOutcome {
    match value {
        Value::String(_) => CheckOutcome::Coerced(value.clone()),
        _ => mismatch(value, Tag::String.name()),
    }
}

fn check_integer(value: &Value) -> CheckOutcome {
    if num::is_float(value) {
        return mismatch(value, Tag::Integer.name());
    }
    match num::to_integer(value) {
        Some(v) => CheckOutcome::Coerced(v),
        None => mismatch(value, Tag::Integer.name()),
    }
}

fn check_float(value: &Value) -> CheckOutcome {
    match num::to_float(value) {
        Some(v) => CheckOutcome::Coerced(v),
        None => mismatch(value, Tag::Float.name()),
    }
}

fn check_phone(value: &Value) -> CheckOutcome {
    let Some(text) = phone::phone_text(value) else {
        return mismatch(value, Tag::Phone.name());
    };
    match phone::normalize(&text) {
        Some(digits) => CheckOutcome::Coerced(Value::String(digits)),
        None => CheckOutcome::Diagnostic(Diagnostic::PhoneFormat),
    }
}

fn check_array(value: &Value, descriptor: &TypeDescriptor<'_>) -> CheckOutcome {
    match shape_of(value) {
        Shape::Sequence => CheckOutcome::ShapeConfirmed(value.clone()),
        Shape::Structure(m) if m.is_empty() => CheckOutcome::ShapeConfirmed(value.clone()),
        Shape::Structure(_) => CheckOutcome::Diagnostic(Diagnostic::ArrayExpectedGotStructure),
        Shape::Scalar => mismatch(value, descriptor.declared_name()),
    }
}

fn check_structure(value: &Value, keys: Option<&[&str]>, descriptor: &TypeDescriptor<'_>) -> CheckOutcome {
    match shape_of(value) {
        Shape::Structure(m) => match keys.and_then(|keys| key_mismatch(m, keys)) {
            Some(d) => CheckOutcome::Diagnostic(d),
            None => CheckOutcome::ShapeConfirmed(value.clone()),
        },
        Shape::Sequence => CheckOutcome::Diagnostic(Diagnostic::StructureExpectedGotArray),
        Shape::Scalar => mismatch(value, descriptor.declared_name()),
    }
}

fn key_mismatch(data: &Map<String, Value>, expected: &[&str]) -> Option<Diagnostic> {
    let expected: IndexSet<&str> = expected.iter().copied().collect();
    let missing: Vec<String> = data
        .keys()
        .filter(|k| !expected.contains(k.as_str()))
        .cloned()
        .collect();
    let extra: Vec<String> = expected
        .iter()
        .filter(|k| !data.contains_key(**k))
        .map(|k| k.to_string())
        .collect();
    if missing.is_empty() && extra.is_empty() {
        None
    } else {
        Some(Diagnostic::KeyMismatch { missing, extra })
    }
}
