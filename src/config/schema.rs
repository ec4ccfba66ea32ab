//! Configuration schema types
//!
//! This module defines the configuration structure for Tilepack.

use serde::{Deserialize, Serialize};

/// Latitude limit of the Web Mercator tiling scheme
const MAX_CENTER_LATITUDE: f64 = 85.051_128;

/// Main Tilepack configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilepackConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Map viewport used to derive the download region
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Download region selection
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Working directory cleanup
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TilepackConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.viewport.validate()?;
        self.selection.validate()?;
        self.export.validate()?;
        self.cleanup.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Viewport the download region is derived from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Longitude of the viewport center in degrees
    #[serde(default)]
    pub center_lon: f64,

    /// Latitude of the viewport center in degrees
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Viewport width in pixels
    #[serde(default = "default_width_px")]
    pub width_px: u32,

    /// Viewport height in pixels
    #[serde(default = "default_height_px")]
    pub height_px: u32,

    /// Current map scale (denominator of 1:scale)
    #[serde(default = "default_viewport_scale")]
    pub scale: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            center_lon: 0.0,
            center_lat: default_center_lat(),
            width_px: default_width_px(),
            height_px: default_height_px(),
            scale: default_viewport_scale(),
        }
    }
}

impl ViewportConfig {
    fn validate(&self) -> Result<(), String> {
        if !(-180.0..=180.0).contains(&self.center_lon) {
            return Err(format!(
                "viewport.center_lon must be between -180 and 180, got {}",
                self.center_lon
            ));
        }
        if !(-MAX_CENTER_LATITUDE..=MAX_CENTER_LATITUDE).contains(&self.center_lat) {
            return Err(format!(
                "viewport.center_lat must be between -{MAX_CENTER_LATITUDE} and {MAX_CENTER_LATITUDE}, got {}",
                self.center_lat
            ));
        }
        if self.width_px == 0 || self.height_px == 0 {
            return Err("viewport.width_px and viewport.height_px must be > 0".to_string());
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(format!("viewport.scale must be > 0, got {}", self.scale));
        }
        Ok(())
    }
}

/// Download region selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Inset of the region corners from the viewport edges, in pixels
    #[serde(default = "default_inset_px")]
    pub inset_px: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            inset_px: default_inset_px(),
        }
    }
}

impl SelectionConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.inset_px.is_finite() || self.inset_px < 0.0 {
            return Err(format!(
                "selection.inset_px must be >= 0, got {}",
                self.inset_px
            ));
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory holding the session's tile packages
    #[serde(default = "default_working_directory")]
    pub working_directory: String,

    /// File name of the tile package
    #[serde(default = "default_destination_file")]
    pub destination_file: String,

    /// Most detailed scale the tile source offers
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,

    /// Upper bound on tiles in a single export
    #[serde(default = "default_max_tiles")]
    pub max_tiles: u64,

    /// Pause between tiles in milliseconds
    #[serde(default)]
    pub tile_delay_ms: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            working_directory: default_working_directory(),
            destination_file: default_destination_file(),
            max_scale: default_max_scale(),
            max_tiles: default_max_tiles(),
            tile_delay_ms: 0,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.working_directory.trim().is_empty() {
            return Err("export.working_directory cannot be empty".to_string());
        }

        if self.destination_file.trim().is_empty() {
            return Err("export.destination_file cannot be empty".to_string());
        }
        if self.destination_file.contains(['/', '\\']) {
            return Err(format!(
                "export.destination_file must be a file name, got '{}'",
                self.destination_file
            ));
        }

        if !self.max_scale.is_finite() || self.max_scale <= 0.0 {
            return Err(format!(
                "export.max_scale must be > 0, got {}",
                self.max_scale
            ));
        }

        if self.max_tiles == 0 {
            return Err("export.max_tiles must be > 0".to_string());
        }

        if self.tile_delay_ms > 10_000 {
            return Err("export.tile_delay_ms must be <= 10000".to_string());
        }

        Ok(())
    }
}

/// Working directory cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Seconds to wait for an active export to stop before purging
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,

    /// Purge the working directory when the export command exits
    #[serde(default)]
    pub purge_on_exit: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: default_grace_period_secs(),
            purge_on_exit: false,
        }
    }
}

impl CleanupConfig {
    fn validate(&self) -> Result<(), String> {
        if self.grace_period_secs > 3600 {
            return Err("cleanup.grace_period_secs must be <= 3600".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_center_lat() -> f64 {
    51.0
}

fn default_width_px() -> u32 {
    1280
}

fn default_height_px() -> u32 {
    800
}

fn default_viewport_scale() -> f64 {
    10_000_000.0
}

fn default_inset_px() -> f64 {
    200.0
}

fn default_working_directory() -> String {
    "./tilepack-cache".to_string()
}

fn default_destination_file() -> String {
    "tiles.tpk".to_string()
}

fn default_max_scale() -> f64 {
    500_000.0
}

fn default_max_tiles() -> u64 {
    100_000
}

fn default_grace_period_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
