//! Error types for Herd diagnostics.

use crate::types::SourceKind;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for Herd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A single structured problem found while validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Configuration field the issue refers to.
    pub field: String,
    /// Description of what is wrong with the field.
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur during diagnostic collection and reporting.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is malformed or invalid.
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// Configuration rejected by schema validation.
    #[error("Configuration validation failed: {}", format_issues(.issues))]
    Validation {
        /// Structured list of validation problems.
        issues: Vec<ValidationIssue>,
    },

    /// I/O error with path context.
    #[error("I/O error at {path}: {source}")]
    FileSystem {
        /// Path the operation was acting on.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON parsing error (tool output, report files).
    #[error("JSON parse error in {path}: {source}")]
    Json {
        /// Path or description of the JSON input.
        path: PathBuf,
        /// The underlying JSON parsing error.
        #[source]
        source: serde_json::Error,
    },

    /// TOML parsing error (.herd.toml).
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        /// Path to the TOML file with the error.
        path: PathBuf,
        /// The underlying TOML parsing error.
        #[source]
        source: toml::de::Error,
    },

    /// A diagnostic source reported a failure.
    #[error("Source error ({kind}): {message}")]
    Source {
        /// The source that encountered the error.
        kind: SourceKind,
        /// Error message from the source.
        message: String,
    },

    /// A diagnostic source did not settle within its timeout.
    #[error("Source {kind} timed out after {timeout_ms}ms")]
    SourceTimeout {
        /// The source that timed out.
        kind: SourceKind,
        /// The configured per-source timeout.
        timeout_ms: u64,
    },

    /// Every configured source is disabled.
    #[error("No diagnostic sources enabled")]
    NoSourcesEnabled,

    /// Every active source failed to produce diagnostics.
    #[error("All {total} diagnostic sources failed")]
    AllSourcesFailed {
        /// Number of sources that were attempted.
        total: usize,
    },

    /// Stable top-level wrapper for collection/aggregation/report failures.
    #[error("Diagnostic error{}: {message}", format_kind(.kind))]
    Diagnostic {
        /// The source involved, when the failure is attributable to one.
        kind: Option<SourceKind>,
        /// Display message preserved from the wrapped cause.
        message: String,
        /// The wrapped cause, when one exists.
        #[source]
        cause: Option<Box<Error>>,
    },
}

impl Error {
    /// Wraps an inner error into the stable top-level `Diagnostic` kind,
    /// preserving the inner display message for the user.
    pub fn diagnostic(kind: Option<SourceKind>, cause: Error) -> Self {
        Error::Diagnostic {
            kind,
            message: cause.to_string(),
            cause: Some(Box::new(cause)),
        }
    }

    /// A `Diagnostic` error with a message and no wrapped cause.
    pub fn diagnostic_message(kind: Option<SourceKind>, message: impl Into<String>) -> Self {
        Error::Diagnostic {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// True when this error is the per-source timeout marker.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::SourceTimeout { .. })
    }
}

fn format_kind(kind: &Option<SourceKind>) -> String {
    match kind {
        Some(kind) => format!(" ({kind})"),
        None => String::new(),
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_wrapper_preserves_message() {
        let inner = Error::Source {
            kind: SourceKind::Eslint,
            message: "npx exited with signal".to_string(),
        };
        let inner_display = inner.to_string();

        let wrapped = Error::diagnostic(Some(SourceKind::Eslint), inner);
        assert!(wrapped.to_string().contains(&inner_display));
        assert!(matches!(
            wrapped,
            Error::Diagnostic {
                cause: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_validation_display_lists_issues() {
        let err = Error::Validation {
            issues: vec![
                ValidationIssue::new("patterns", "must not be empty"),
                ValidationIssue::new("concurrency", "must be at least 1"),
            ],
        };
        let display = err.to_string();
        assert!(display.contains("patterns: must not be empty"));
        assert!(display.contains("concurrency: must be at least 1"));
    }

    #[test]
    fn test_timeout_marker() {
        let err = Error::SourceTimeout {
            kind: SourceKind::Typescript,
            timeout_ms: 5000,
        };
        assert!(err.is_timeout());
        assert!(!Error::NoSourcesEnabled.is_timeout());
    }
}
