//! Failure taxonomy.
//!
//! A `Diagnostic` never propagates as an error: its `Display` text is
//! substituted into the result tree at the node where it was detected.
//! The message templates are fixed and must stay byte-for-byte stable,
//! downstream consumers match on them.
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::descriptor::{shape_of, Shape};

pub const UNKNOWN_TAG_PREFIX: &str = "Неизвестный тип данных: ";
pub const ARRAY_EXPECTED_GOT_STRUCTURE: &str = "Значение является структурой, а в типах данных указан массив";
pub const STRUCTURE_EXPECTED_GOT_ARRAY: &str = "Значение является массивом, а в типах данных указана структура";
pub const KEY_MISMATCH_HEAD: &str = "Ключи структуры не совпадают с ключами в типах данных.";
pub const PHONE_FORMAT: &str = "Значение не соответстует формату номера телефона.";
const TYPE_MISMATCH_INFIX: &str = " является типом ";
const TYPE_MISMATCH_DECLARED: &str = ". Для него был указан тип: ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("{rendered} является типом {kind}. Для него был указан тип: {declared}.")]
    TypeMismatch {
        rendered: String,
        kind: ValueKind,
        declared: String,
    },
    #[error("{}{}.", UNKNOWN_TAG_PREFIX, .0)]
    UnknownTag(String),
    #[error("{}", ARRAY_EXPECTED_GOT_STRUCTURE)]
    ArrayExpectedGotStructure,
    #[error("{}", STRUCTURE_EXPECTED_GOT_ARRAY)]
    StructureExpectedGotArray,
    /// `missing`: keys present in the structure but not declared by the
    /// schema. `extra`: declared keys the structure lacks.
    #[error("{}", key_mismatch_text(.missing, .extra))]
    KeyMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },
    #[error("{}", PHONE_FORMAT)]
    PhoneFormat,
}

impl Diagnostic {
    pub fn type_mismatch(value: &Value, declared: impl Into<String>) -> Self {
        Diagnostic::TypeMismatch {
            rendered: crate::render::render_compact(value),
            kind: ValueKind::of(value),
            declared: declared.into(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

fn key_mismatch_text(missing: &[String], extra: &[String]) -> String {
    let mut clauses = vec![KEY_MISMATCH_HEAD.to_string()];
    if !missing.is_empty() {
        clauses.push(format!("В структуре отсутствуют ключи: {}.", missing.join(", ")));
    }
    if !extra.is_empty() {
        clauses.push(format!("В типах данных отсутствуют ключи: {}.", extra.join(", ")));
    }
    clauses.join(" ")
}

/// Runtime kind of a value as named in type-mismatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            _ => match shape_of(value) {
                Shape::Structure(_) => ValueKind::Object,
                _ => ValueKind::Array,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "NULL",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a string in a result tree is one of the fixed diagnostic texts.
pub fn looks_like_diagnostic(s: &str) -> bool {
    s == ARRAY_EXPECTED_GOT_STRUCTURE
        || s == STRUCTURE_EXPECTED_GOT_ARRAY
        || s == PHONE_FORMAT
        || s.starts_with(KEY_MISMATCH_HEAD)
        || (s.starts_with(UNKNOWN_TAG_PREFIX) && s.ends_with('.'))
        || (s.contains(TYPE_MISMATCH_INFIX) && s.contains(TYPE_MISMATCH_DECLARED) && s.ends_with('.'))
}
