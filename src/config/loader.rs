//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::TilepackConfig;
use crate::domain::errors::TilepackError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TilepackConfig
/// 4. Applies environment variable overrides (TILEPACK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use tilepack::config::loader::load_config;
///
/// let config = load_config("tilepack.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TilepackConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TilepackError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TilepackError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Applies the same substitution, overrides and validation as
/// [`load_config`].
///
/// # Errors
///
/// Returns a `Configuration` error if any step fails.
pub fn parse_config(contents: &str) -> Result<TilepackConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: TilepackConfig = toml::from_str(&contents)
        .map_err(|e| TilepackError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        TilepackError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| TilepackError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TilepackError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Reads and parses an override variable
///
/// Unset variables yield `None`; unparsable values are an error so a typo
/// never silently falls back to the file value.
fn env_override<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            TilepackError::Configuration(format!("Invalid value '{raw}' for {name}"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using TILEPACK_* prefix
///
/// Environment variables follow the pattern: TILEPACK_<SECTION>_<KEY>
/// For example: TILEPACK_EXPORT_MAX_SCALE, TILEPACK_VIEWPORT_CENTER_LAT
fn apply_env_overrides(config: &mut TilepackConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("TILEPACK_APPLICATION_LOG_LEVEL")? {
        config.application.log_level = val;
    }

    // Viewport overrides
    if let Some(val) = env_override("TILEPACK_VIEWPORT_CENTER_LON")? {
        config.viewport.center_lon = val;
    }
    if let Some(val) = env_override("TILEPACK_VIEWPORT_CENTER_LAT")? {
        config.viewport.center_lat = val;
    }
    if let Some(val) = env_override("TILEPACK_VIEWPORT_WIDTH_PX")? {
        config.viewport.width_px = val;
    }
    if let Some(val) = env_override("TILEPACK_VIEWPORT_HEIGHT_PX")? {
        config.viewport.height_px = val;
    }
    if let Some(val) = env_override("TILEPACK_VIEWPORT_SCALE")? {
        config.viewport.scale = val;
    }

    // Selection overrides
    if let Some(val) = env_override("TILEPACK_SELECTION_INSET_PX")? {
        config.selection.inset_px = val;
    }

    // Export overrides
    if let Some(val) = env_override("TILEPACK_EXPORT_WORKING_DIRECTORY")? {
        config.export.working_directory = val;
    }
    if let Some(val) = env_override("TILEPACK_EXPORT_DESTINATION_FILE")? {
        config.export.destination_file = val;
    }
    if let Some(val) = env_override("TILEPACK_EXPORT_MAX_SCALE")? {
        config.export.max_scale = val;
    }
    if let Some(val) = env_override("TILEPACK_EXPORT_MAX_TILES")? {
        config.export.max_tiles = val;
    }
    if let Some(val) = env_override("TILEPACK_EXPORT_TILE_DELAY_MS")? {
        config.export.tile_delay_ms = val;
    }

    // Cleanup overrides
    if let Some(val) = env_override("TILEPACK_CLEANUP_GRACE_PERIOD_SECS")? {
        config.cleanup.grace_period_secs = val;
    }
    if let Some(val) = env_override("TILEPACK_CLEANUP_PURGE_ON_EXIT")? {
        config.cleanup.purge_on_exit = val;
    }

    // Logging overrides
    if let Some(val) = env_override("TILEPACK_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_override("TILEPACK_LOGGING_LOCAL_PATH")? {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("TILEPACK_LOGGING_LOCAL_ROTATION")? {
        config.logging.local_rotation = val;
    }

    Ok(())
}
