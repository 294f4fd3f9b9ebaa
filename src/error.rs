//! Errors of the file-facing tooling. Sanitizing itself never fails.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin} at JSON path {pointer} → {message}")]
    Parse {
        origin: String,
        pointer: String,
        message: String,
    },
    #[error("glob pattern matched no files: {0}")]
    NoMatch(String),
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
