//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tilepack using clap.

pub mod commands;

use crate::config::{load_config, LoggingConfig};
use clap::{Parser, Subcommand};
use std::path::Path;

/// Tilepack - map tile export tool
#[derive(Parser, Debug)]
#[command(name = "tilepack")]
#[command(version, about, long_about = None)]
#[command(author = "Tilepack Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tilepack.toml", env = "TILEPACK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TILEPACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and logging settings for this invocation
    ///
    /// Taken from the configuration file when it exists and loads cleanly,
    /// with `--log-level` taking precedence over `application.log_level`.
    /// Without a usable configuration, logging goes to the console only;
    /// the command itself reports any configuration error.
    pub fn logging_setup(&self) -> (String, LoggingConfig) {
        let config = if Path::new(&self.config).exists() {
            load_config(&self.config).ok()
        } else {
            None
        };

        match config {
            Some(config) => (
                self.log_level
                    .clone()
                    .unwrap_or(config.application.log_level),
                config.logging,
            ),
            None => (
                self.log_level.clone().unwrap_or_else(|| "info".to_string()),
                LoggingConfig {
                    local_enabled: false,
                    ..LoggingConfig::default()
                },
            ),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the tiles covering the configured viewport
    Export(commands::export::ExportArgs),

    /// Delete everything in the working directory
    Purge(commands::purge::PurgeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
