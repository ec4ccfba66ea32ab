//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "tilepack.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Tilepack configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your viewport and scale limits", self.output);
                println!("  2. Validate configuration: tilepack validate-config");
                println!("  3. Run export: tilepack export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Tilepack Configuration File

[application]
log_level = "info"

[viewport]
center_lon = 0.0
center_lat = 51.0
width_px = 1280
height_px = 800
scale = 10000000.0

[selection]
inset_px = 200.0

[export]
working_directory = "./tilepack-cache"
destination_file = "tiles.tpk"
max_scale = 500000.0
max_tiles = 100000

[cleanup]
grace_period_secs = 30
purge_on_exit = false

[logging]
local_enabled = true
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Tilepack Configuration File
# Exports the map tiles covering a region into a local tile package
#
# Any value can reference environment variables with ${VAR_NAME} and be
# overridden with TILEPACK_<SECTION>_<KEY>, e.g. TILEPACK_EXPORT_MAX_SCALE.

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[viewport]
# Map center in degrees
center_lon = 0.0
center_lat = 51.0

# Viewport size in pixels
width_px = 1280
height_px = 800

# Current map scale (1:scale); the coarsest level exported
scale = 10000000.0

[selection]
# Distance of the download region from the viewport edges, in pixels
inset_px = 200.0

[export]
# Directory holding the session's tile packages
# working_directory = "${HOME}/.cache/tilepack"
working_directory = "./tilepack-cache"

# Tile package file name inside the working directory
destination_file = "tiles.tpk"

# Most detailed scale the tile source offers (1:max_scale)
max_scale = 500000.0

# Exports covering more tiles than this fail
max_tiles = 100000

# Pause between tiles in milliseconds (0 = no throttling)
tile_delay_ms = 0

[cleanup]
# Seconds to wait for an active export to stop before purging
grace_period_secs = 30

# Purge the working directory when the export command exits
purge_on_exit = false

[logging]
# Enable local JSON log files
local_enabled = true

# Log directory
local_path = "./logs"

# Log rotation: daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_generated_configs_are_valid() {
        let minimal = parse_config(&InitArgs::generate_minimal_config()).unwrap();
        assert_eq!(minimal.export.destination_file, "tiles.tpk");

        let examples = parse_config(&InitArgs::generate_config_with_examples()).unwrap();
        assert_eq!(examples.selection.inset_px, 200.0);
        assert_eq!(examples.cleanup.grace_period_secs, 30);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("tilepack.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# existing");
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("tilepack.toml");

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: true,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output)
            .unwrap()
            .contains("# Tilepack Configuration File"));
    }
}
