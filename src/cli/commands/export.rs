//! Export command implementation
//!
//! This module implements the `export` command: derive the download region
//! from the configured viewport, export its tiles with the local exporter
//! and print the preview summary.

use crate::adapters::console::{ConsoleMessages, ConsoleOverlay, ConsolePreview, ConsoleProgress};
use crate::adapters::local::{LocalTileExporter, StaticViewport};
use crate::config::{load_config, TilepackConfig};
use crate::core::{ControllerPhase, ExportSession, SessionSettings, SessionSurfaces};
use crate::domain::TilepackError;
use crate::{log_error_with_context, log_export_complete};
use clap::Args;
use geo::Coord;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Override viewport center longitude
    #[arg(long, allow_hyphen_values = true)]
    pub center_lon: Option<f64>,

    /// Override viewport center latitude
    #[arg(long, allow_hyphen_values = true)]
    pub center_lat: Option<f64>,

    /// Override current map scale (denominator of 1:scale)
    #[arg(long)]
    pub scale: Option<f64>,

    /// Override the most detailed scale to export
    #[arg(long)]
    pub max_scale: Option<f64>,

    /// Override the tile limit
    #[arg(long)]
    pub max_tiles: Option<u64>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let exporter = LocalTileExporter::new(config.export.max_tiles)
            .with_tile_delay(Duration::from_millis(config.export.tile_delay_ms));
        let surfaces = SessionSurfaces {
            overlay: Box::new(ConsoleOverlay),
            progress: Box::new(ConsoleProgress::new()),
            preview: Box::new(ConsolePreview),
            messages: Box::new(ConsoleMessages),
        };
        let mut session = ExportSession::new(
            Arc::new(exporter),
            surfaces,
            SessionSettings::from_config(&config),
        );

        let viewport = StaticViewport::new(
            Coord {
                x: config.viewport.center_lon,
                y: config.viewport.center_lat,
            },
            f64::from(config.viewport.width_px),
            f64::from(config.viewport.height_px),
            config.viewport.scale,
        );
        session.on_viewport_changed(&viewport, true);

        println!("🚀 Starting export...");
        println!("   Scale: 1:{} to 1:{}", config.viewport.scale, config.export.max_scale);
        println!(
            "   Destination: {}",
            session.settings().destination().display()
        );
        println!();

        let started_at = Instant::now();
        if let Err(e) = session.request_export().await {
            log_error_with_context!(&e, "Export could not be started");
            return Ok(match e {
                TilepackError::Resolution(_)
                | TilepackError::Validation(_)
                | TilepackError::JobFailed(_) => 1,
                _ => {
                    eprintln!("Export failed: {e}");
                    5
                }
            });
        }

        let phase = session.supervise(&mut shutdown_signal).await;
        log_export_complete!(phase, started_at.elapsed());

        let exit_code = match phase {
            ControllerPhase::Succeeded => {
                println!();
                println!("✅ Export completed successfully!");
                0
            }
            ControllerPhase::Failed => 1,
            ControllerPhase::Cancelled => {
                println!();
                println!("⚠️  Export cancelled.");
                130
            }
            other => {
                tracing::error!(phase = %other, "Export ended in an unexpected state");
                5
            }
        };

        session.acknowledge()?;

        if config.cleanup.purge_on_exit {
            if session.suspend().await {
                println!("🧹 Working directory purged");
            } else {
                eprintln!("⚠️  Working directory could not be fully purged");
            }
        }

        Ok(exit_code)
    }

    fn apply_overrides(&self, config: &mut TilepackConfig) {
        if let Some(lon) = self.center_lon {
            tracing::info!(center_lon = lon, "Overriding viewport longitude from CLI");
            config.viewport.center_lon = lon;
        }
        if let Some(lat) = self.center_lat {
            tracing::info!(center_lat = lat, "Overriding viewport latitude from CLI");
            config.viewport.center_lat = lat;
        }
        if let Some(scale) = self.scale {
            tracing::info!(scale, "Overriding viewport scale from CLI");
            config.viewport.scale = scale;
        }
        if let Some(max_scale) = self.max_scale {
            tracing::info!(max_scale, "Overriding maximum scale from CLI");
            config.export.max_scale = max_scale;
        }
        if let Some(max_tiles) = self.max_tiles {
            tracing::info!(max_tiles, "Overriding tile limit from CLI");
            config.export.max_tiles = max_tiles;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn args() -> ExportArgs {
        ExportArgs {
            center_lon: None,
            center_lat: None,
            scale: None,
            max_scale: None,
            max_tiles: None,
        }
    }

    #[test]
    fn test_overrides_applied() {
        let mut config =
            parse_config("[application]\nlog_level = \"info\"\n[export]\nworking_directory = \"/tmp/x\"\n")
                .unwrap();
        let args = ExportArgs {
            center_lat: Some(48.85),
            max_scale: Some(1_000.0),
            ..args()
        };

        args.apply_overrides(&mut config);
        assert_eq!(config.viewport.center_lat, 48.85);
        assert_eq!(config.export.max_scale, 1_000.0);
        assert_eq!(config.viewport.center_lon, 0.0);
    }

    #[tokio::test]
    async fn test_missing_config_is_configuration_error() {
        let (_tx, rx) = watch::channel(false);
        let code = args().execute("does-not-exist.toml", rx).await.unwrap();
        assert_eq!(code, 2);
    }
}
