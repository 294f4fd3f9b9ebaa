//! Schema-driven validation and coercion of untyped JSON trees.
//!
//! The schema mirrors the data's shape. Every leaf of the result is either
//! the value converted to its declared type or a diagnostic message put in
//! its place; the call itself never fails.
//!
//! ```
//! use serde_json::json;
//!
//! let data = json!({"phone": "8(999)333-22-55", "age": "42", "tags": ["a", 1]});
//! let schema = json!({"phone": "phone", "age": "integer", "tags": ["string"]});
//! let out = json_sanitize::sanitize(&data, &schema);
//! assert_eq!(out["phone"], json!("79993332255"));
//! assert_eq!(out["age"], json!(42));
//! assert_eq!(out["tags"][1], json!("1 является типом integer. Для него был указан тип: string."));
//! ```
pub mod descriptor;
pub mod diagnostic;
pub mod error;
pub mod path_de;
pub mod render;
pub mod sanitize;
pub mod validate;

pub use descriptor::{infer_descriptor, Tag, TypeDescriptor};
pub use diagnostic::Diagnostic;
pub use sanitize::{sanitize, Report};
pub use validate::{check, validate, CheckOutcome};
