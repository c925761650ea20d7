//! Save/load helpers for small local files
//!
//! Features:
//! - JSON documents (settings)
//! - Plain-text integers (high score)
//! - Write to a temp file, then rename over the target, so a crash never
//!   leaves a half-written file behind

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur while loading or saving local files.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading or writing the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON for the expected type.
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The file does not hold a single integer.
    #[error("Expected an integer, found {0:?}")]
    Parse(String),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Atomically replace `path` with `contents`
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).map_err(io_error(&tmp))?;
    fs::rename(&tmp, path).map_err(io_error(path))
}

/// Read a JSON document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(serde_json::from_str(&text)?)
}

/// Write a pretty-printed JSON document
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let text = serde_json::to_string_pretty(value)?;
    write_atomic(path, &text)
}

/// Read a file holding one unsigned integer (surrounding whitespace allowed)
pub fn read_u64(path: &Path) -> Result<u64, PersistenceError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    let trimmed = text.trim();
    trimmed
        .parse()
        .map_err(|_| PersistenceError::Parse(trimmed.to_string()))
}

/// Write one unsigned integer as text
pub fn write_u64(path: &Path, value: u64) -> Result<(), PersistenceError> {
    write_atomic(path, &value.to_string())
}
