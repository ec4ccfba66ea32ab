//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Tilepack configuration file.

use crate::config::load_config;
use crate::domain::params::ScaleRange;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates every section
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Viewport: ({}, {}) at 1:{}, {}x{} px",
            config.viewport.center_lon,
            config.viewport.center_lat,
            config.viewport.scale,
            config.viewport.width_px,
            config.viewport.height_px
        );
        println!("  Region Inset: {} px", config.selection.inset_px);
        println!("  Working Directory: {}", config.export.working_directory);
        println!("  Destination File: {}", config.export.destination_file);
        if let Ok(scales) = ScaleRange::new(config.viewport.scale, config.export.max_scale) {
            let levels = scales.levels_of_detail();
            println!("  Levels of Detail: {} to {}", levels.start(), levels.end());
        }
        println!("  Tile Limit: {}", config.export.max_tiles);
        println!("  Cleanup Grace Period: {}s", config.cleanup.grace_period_secs);
        println!();
        Ok(0)
    }
}
