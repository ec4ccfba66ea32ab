//! Domain error types
//!
//! This module defines the error hierarchy for Tilepack. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Tilepack error type
///
/// Precondition failures (`RegionUndefined`, `ConcurrentJob`) are rejected
/// locally without any state change. `Resolution` and `JobFailed` are
/// surfaced to the user-visible layer and logged. `Cleanup` is logged and
/// never blocks teardown.
#[derive(Debug, Error)]
pub enum TilepackError {
    /// No region is defined because the map has not finished loading
    #[error("Download region is undefined: map content has not finished loading")]
    RegionUndefined,

    /// An export was requested while another job is starting or running
    #[error("An export job is already active: {0}")]
    ConcurrentJob(String),

    /// Export parameters could not be computed
    #[error("Failed to resolve export parameters: {0}")]
    Resolution(String),

    /// The exporting collaborator reported a terminal failure
    #[error("Export job failed: {0}")]
    JobFailed(JobError),

    /// One or more working-directory entries could not be deleted
    #[error("Cleanup error: {0}")]
    Cleanup(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Controller state errors
    #[error("State error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Error descriptor reported by the exporting collaborator
///
/// Carries the primary message and any additional diagnostic text the
/// collaborator attached to the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobError {
    /// Primary error message
    pub message: String,

    /// Additional diagnostic text, if any
    pub additional_message: Option<String>,
}

impl JobError {
    /// Creates a new job error with only a primary message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            additional_message: None,
        }
    }

    /// Attaches additional diagnostic text
    pub fn with_additional_message(mut self, additional: impl Into<String>) -> Self {
        self.additional_message = Some(additional.into());
        self
    }

    /// Renders the message shown to the user: a short label followed by the
    /// collaborator-supplied diagnostics
    pub fn user_message(&self, label: &str) -> String {
        match &self.additional_message {
            Some(extra) if !extra.trim().is_empty() => {
                format!("{label}: {}. {extra}", self.message)
            }
            _ => format!("{label}: {}", self.message),
        }
    }
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.additional_message {
            Some(extra) => write!(f, "{} ({})", self.message, extra),
            None => write!(f, "{}", self.message),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for TilepackError {
    fn from(err: std::io::Error) -> Self {
        TilepackError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TilepackError {
    fn from(err: serde_json::Error) -> Self {
        TilepackError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TilepackError {
    fn from(err: toml::de::Error) -> Self {
        TilepackError::Configuration(format!("TOML parse error: {err}"))
    }
}
