//! Error types for the report generation pipeline.
//!
//! Errors are explicit values, never a control-flow mechanism: the builder
//! decides what to do with each failure based on its current phase, and the
//! fallback error page is driven by that phase check rather than by
//! re-entrant error handling.

use std::path::PathBuf;

/// A specialized `Result` type for builder operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that can occur while generating a report.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// An input document was malformed or unreadable; fatal to the run.
    #[error(transparent)]
    Parse(#[from] cuke_model::ModelError),

    /// A page render or write failed; isolated to that artifact.
    #[error(transparent)]
    Generation(#[from] cuke_report::ReportError),

    /// Configuration file was malformed or unreadable.
    #[error("invalid configuration in '{path}': {message}")]
    ConfigParse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    /// Configuration values failed validation.
    #[error("invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },
}

impl BuildError {
    /// Creates a new `ConfigParse` error.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidation` error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns `true` if the error is fatal to the whole run rather than
    /// isolated to one artifact.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Parse(_) | Self::ConfigParse { .. } | Self::ConfigValidation { .. }
        )
    }
}
