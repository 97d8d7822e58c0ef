//! Error types for Pressmill.
//!
//! Library crates use [`PressmillError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Pressmill operations.
#[derive(Debug, thiserror::Error)]
pub enum PressmillError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error talking to a collaborator endpoint.
    #[error("network error: {0}")]
    Network(String),

    /// LLM collaborator failure: transport, non-JSON output, or a response
    /// missing required fields. Always fatal for the current run.
    #[error("generation error: {0}")]
    Generation(String),

    /// Record store error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Page or sitemap rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad catalog entry, malformed record, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PressmillError>;

impl PressmillError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
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
        let err = PressmillError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = PressmillError::Generation("response is not a JSON object".into());
        assert!(err.to_string().contains("not a JSON object"));
    }
}
