//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted log files
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use tilepack::logging::init_logging;
//! use tilepack::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the completion of an export job
///
/// # Example
///
/// ```no_run
/// use tilepack::log_export_complete;
/// use std::time::Duration;
///
/// let phase = "succeeded";
/// let duration = Duration::from_secs(10);
/// log_export_complete!(phase, duration);
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($phase:expr, $duration:expr) => {
        tracing::info!(
            phase = %$phase,
            duration_ms = $duration.as_millis() as u64,
            "Export finished"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use tilepack::log_error_with_context;
/// use tilepack::domain::TilepackError;
///
/// let error = TilepackError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
