//! Russian phone numbers: `8`, `+7`, `7` or no country prefix, a 3-digit
//! area code (optionally wrapped in `(`/`)`/`-`/space), then 3-2-2 digits
//! with optional `-`/space separators. Only ASCII digits count; one
//! trailing newline is tolerated.
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::render::number_text;

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(8|\+7|7|)([\- (][0-9]{3}[\- )]|[0-9]{3})([0-9]{3}[\- ]?[0-9]{2}[\- ]?[0-9]{2})\n?$")
        .expect("phone pattern is valid")
});

/// Textual form the pattern is matched against; `None` for values that are
/// neither numbers nor strings.
pub fn phone_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Normalises a matching number to 11 digits starting with `7`.
pub fn normalize(text: &str) -> Option<String> {
    let caps = PHONE.captures(text)?;
    let mut out = String::with_capacity(11);
    out.push('7');
    for group in [2, 3] {
        if let Some(m) = caps.get(group) {
            out.extend(m.as_str().chars().filter(|c| c.is_ascii_digit()));
        }
    }
    Some(out)
}
