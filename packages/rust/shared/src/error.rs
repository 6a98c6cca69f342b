//! Error types for AppForge.
//!
//! Library crates use [`AppForgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all AppForge operations.
#[derive(Debug, thiserror::Error)]
pub enum AppForgeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// JSON/TOML parsing error for specs, plans, or static tables.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (malformed rule file, invalid input document, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Rules matrix could not be loaded.
    #[error("rules error: {0}")]
    Rules(String),

    /// No catalog data could be produced, not even from built-in defaults.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// An injected route or scaffold generator failed.
    #[error("generator error: {0}")]
    Generator(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AppForgeError>;

impl AppForgeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
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
        let err = AppForgeError::config("min_score must be <= 100");
        assert_eq!(err.to_string(), "config error: min_score must be <= 100");

        let err = AppForgeError::validation("rule `sso-identity` has no actions");
        assert!(err.to_string().contains("sso-identity"));

        let err = AppForgeError::CatalogUnavailable("no index and defaults disabled".into());
        assert!(err.to_string().starts_with("catalog unavailable"));
    }
}
