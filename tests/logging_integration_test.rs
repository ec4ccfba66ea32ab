//! Integration tests for logging functionality

use clap::Parser;
use tempfile::TempDir;
use tilepack::cli::Cli;
use tilepack::config::LoggingConfig;
use tilepack::logging::structured::LOG_FILE_NAME;
use tilepack::logging::{init_logging, parse_log_level};

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "./logs");
}

#[test]
fn test_invalid_level_rejected() {
    assert!(parse_log_level("verbose").is_err());
    assert!(init_logging("verbose", &LoggingConfig::default()).is_err());
}

// Installs the global subscriber, so it is the only test here that succeeds
// in initializing logging.
#[test]
fn test_configured_file_logging_writes_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");
    let config_path = temp_dir.path().join("tilepack.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[application]
log_level = "debug"

[export]
working_directory = "{}"

[logging]
local_enabled = true
local_path = "{}"
local_rotation = "never"
"#,
            temp_dir.path().join("cache").display(),
            log_path.display()
        ),
    )
    .unwrap();
    assert!(!log_path.exists());

    let cli = Cli::parse_from(["tilepack", "-c", config_path.to_str().unwrap(), "export"]);
    let (level, logging) = cli.logging_setup();
    assert_eq!(level, "debug");

    let guard = init_logging(&level, &logging).unwrap();
    tracing::info!(target: "tilepack", "export session started");

    // A second global subscriber is refused
    assert!(init_logging("info", &logging).is_err());

    // Dropping the guard flushes the file writer
    drop(guard);

    let contents = std::fs::read_to_string(log_path.join(LOG_FILE_NAME)).unwrap();
    assert!(contents.contains("export session started"));
}
