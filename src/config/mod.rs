//! Configuration management for Tilepack.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Tilepack uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TILEPACK_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation of every section
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tilepack::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tilepack.toml")?;
//!
//! println!("Working directory: {}", config.export.working_directory);
//! println!("Maximum scale: 1:{}", config.export.max_scale);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ViewportConfig`] - Map viewport the region is derived from
//! - [`SelectionConfig`] - Region inset from the viewport edges
//! - [`ExportConfig`] - Destination, scale limit and tile limit
//! - [`CleanupConfig`] - Suspension grace period and purge behaviour
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [viewport]
//! center_lon = -0.1276
//! center_lat = 51.5072
//! scale = 10000000
//!
//! [export]
//! working_directory = "${HOME}/.cache/tilepack"
//! destination_file = "tiles.tpk"
//! max_scale = 500000
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CleanupConfig, ExportConfig, LoggingConfig, SelectionConfig,
    TilepackConfig, ViewportConfig,
};
