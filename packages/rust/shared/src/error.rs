//! Error types for termdoc.
//!
//! Library crates use [`TermdocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Per-file and per-block problems found while scanning a corpus are *data*
//! (see [`FileError`](crate::FileError) and the quality crate's block problems),
//! not errors; only failures that prevent an operation from running at all
//! surface here.

use std::path::PathBuf;

/// Top-level error type for all termdoc operations.
#[derive(Debug, thiserror::Error)]
pub enum TermdocError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The terminology dictionary could not be established. Fatal for checks.
    #[error("failed to load terminology dictionary {path:?}: {message}")]
    DictionaryLoad { path: PathBuf, message: String },

    /// A dictionary mutation referenced a term that is not registered.
    #[error("term \"{term}\" does not exist")]
    TermNotFound { term: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad arguments, invalid format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// JSON/TOML serialization error while persisting output.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TermdocError>;

impl TermdocError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a dictionary load error for `path`.
    pub fn dictionary_load(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::DictionaryLoad {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a term-not-found error.
    pub fn term_not_found(term: impl Into<String>) -> Self {
        Self::TermNotFound { term: term.into() }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = TermdocError::config("unknown key");
        assert_eq!(err.to_string(), "config error: unknown key");

        let err = TermdocError::term_not_found("agent");
        assert_eq!(err.to_string(), "term \"agent\" does not exist");

        let err = TermdocError::dictionary_load("config/terminology.json", "not found");
        assert!(err.to_string().contains("terminology.json"));
        assert!(err.to_string().contains("not found"));
    }
}
