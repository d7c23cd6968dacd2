//! Error Types
//!
//! Absence of a config file is never an error; it is reported as `Ok(None)`
//! by every resolution call. The variants below cover the remaining failures.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by configuration resolution
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source was found but its content does not parse under its format
    #[error("Malformed config file {file}: {reason}")]
    Malformed { file: String, reason: String },

    /// Parsed content could not be materialized into the requested type
    #[error("Config '{name}' does not match the requested type: {source}")]
    Mapping {
        name: String,
        source: serde_json::Error,
    },

    /// Raw content requested as text is not valid UTF-8
    #[error("Config file {file} is not valid UTF-8")]
    InvalidUtf8 { file: String },

    /// A cache entry exists under this key but holds another kind of value
    #[error("Cached entry '{key}' is not a {expected}")]
    KindMismatch { key: String, expected: &'static str },

    /// Loader settings are invalid or unreadable
    #[error("Invalid loader settings: {reason}")]
    Settings { reason: String },

    /// Settings file could not be read
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConfigError {
    pub(crate) fn malformed(file: &str, reason: impl std::fmt::Display) -> Self {
        ConfigError::Malformed {
            file: crate::logging::sanitize(file),
            reason: crate::logging::sanitize(&reason.to_string()),
        }
    }
}
