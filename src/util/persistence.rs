//! JSON file helpers for small pieces of persisted UI state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Centralizes read/write behavior so controllers can persist snapshots
//! without repeating filesystem and serde glue. Failures are reported to the
//! caller; a missing file is not an error.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("i/o failed for {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Json { path: String, source: serde_json::Error },
}

impl crate::error::ErrorCode for PersistenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E_PERSIST_IO",
            Self::Json { .. } => "E_PERSIST_JSON",
        }
    }
}

/// Load a JSON value from `path`. Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(PersistenceError::Io { path: path.display().to_string(), source }),
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| PersistenceError::Json { path: path.display().to_string(), source })
}

/// Save a JSON value to `path`, replacing any previous contents.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|source| PersistenceError::Json { path: path.display().to_string(), source })?;
    std::fs::write(path, raw).map_err(|source| PersistenceError::Io { path: path.display().to_string(), source })
}
