use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str, origin: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| Error::Parse {
        origin: origin.to_string(),
        pointer: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let src = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_str_with_path(&src, &path.to_string_lossy())
}

/// Newline-delimited JSON: one document per non-blank line, labelled
/// `<origin>:<line>`.
pub fn ndjson_with_path<T: DeserializeOwned>(src: &str, origin: &str) -> Result<Vec<(String, T)>> {
    src.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let label = format!("{origin}:{}", i + 1);
            from_str_with_path(line, &label).map(|v| (label, v))
        })
        .collect()
}
