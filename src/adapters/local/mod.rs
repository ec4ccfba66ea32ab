//! Local filesystem exporter
//!
//! Enumerates the Web Mercator tiles covering the export region at every
//! level of detail in the scale range and writes a tile package manifest at
//! the destination.

pub mod tiles;
pub mod viewport;

pub use tiles::TileRange;
pub use viewport::StaticViewport;

use crate::adapters::handle::{job_channel, ExportJobHandle, JobReporter};
use crate::adapters::traits::TileExporter;
use crate::domain::errors::{JobError, TilepackError};
use crate::domain::job::{Artifact, JobOutcome};
use crate::domain::params::{ExportParameters, ScaleRange};
use crate::domain::region::GeoRegion;
use crate::domain::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tiles::MAX_LATITUDE;

/// Package format written by [`LocalTileExporter`]
pub const PACKAGE_FORMAT: &str = "tilepack";

/// Package format version
pub const PACKAGE_VERSION: u32 = 1;

/// Default upper bound on tiles in a single export
pub const DEFAULT_MAX_TILES: u64 = 100_000;

/// Tiles processed between cooperative yields when no delay is configured
const YIELD_INTERVAL: u64 = 1024;

/// Manifest describing an exported tile package
#[derive(Debug, Serialize)]
pub struct PackageManifest {
    pub format: &'static str,
    pub version: u32,
    pub region: GeoRegion,
    pub scales: ScaleRange,
    pub levels: Vec<TileRange>,
    pub tile_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Exporter producing tile packages on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalTileExporter {
    max_tiles: u64,
    tile_delay: Duration,
}

impl Default for LocalTileExporter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TILES)
    }
}

impl LocalTileExporter {
    pub fn new(max_tiles: u64) -> Self {
        Self {
            max_tiles,
            tile_delay: Duration::ZERO,
        }
    }

    /// Pause between tiles, used to throttle exports
    pub fn with_tile_delay(mut self, delay: Duration) -> Self {
        self.tile_delay = delay;
        self
    }
}

#[async_trait]
impl TileExporter for LocalTileExporter {
    async fn default_parameters(
        &self,
        region: &GeoRegion,
        current_scale: f64,
        max_scale: f64,
    ) -> Result<ExportParameters> {
        if region.min().y > MAX_LATITUDE || region.max().y < -MAX_LATITUDE {
            return Err(TilepackError::Validation(format!(
                "Region {region} lies outside the Web Mercator tiling scheme"
            )));
        }

        let scales = ScaleRange::new(current_scale, max_scale)?;
        Ok(ExportParameters::new(*region, scales))
    }

    async fn start_export(
        &self,
        parameters: &ExportParameters,
        destination: &Path,
    ) -> Result<ExportJobHandle> {
        if destination.file_name().is_none() {
            return Err(TilepackError::Validation(format!(
                "Export destination '{}' does not name a file",
                destination.display()
            )));
        }

        let (handle, reporter) = job_channel();
        let run = ExportRun {
            parameters: parameters.clone(),
            destination: destination.to_path_buf(),
            max_tiles: self.max_tiles,
            tile_delay: self.tile_delay,
        };

        tokio::spawn(async move {
            let outcome = run.execute(&reporter).await;
            reporter.finish(outcome);
        });

        Ok(handle)
    }
}

/// One export executing on a background task
struct ExportRun {
    parameters: ExportParameters,
    destination: PathBuf,
    max_tiles: u64,
    tile_delay: Duration,
}

impl ExportRun {
    async fn execute(self, reporter: &JobReporter) -> JobOutcome {
        let region = self.parameters.region;
        let levels: Vec<TileRange> = self
            .parameters
            .scales
            .levels_of_detail()
            .map(|zoom| TileRange::covering(&region, zoom))
            .collect();
        let total: u64 = levels.iter().map(TileRange::tile_count).sum();

        tracing::debug!(
            levels = levels.len(),
            tiles = total,
            destination = %self.destination.display(),
            "Exporting tile package"
        );

        if total > self.max_tiles {
            return JobOutcome::Failed(
                JobError::new("Export exceeds the tile limit").with_additional_message(format!(
                    "{total} tiles requested, limit is {}",
                    self.max_tiles
                )),
            );
        }

        if let Some(parent) = self.destination.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return JobOutcome::Failed(
                    JobError::new("Unable to create export destination")
                        .with_additional_message(e.to_string()),
                );
            }
        }

        let mut done = 0u64;
        let mut reported = 0u64;
        for range in &levels {
            for _tile in range.tiles() {
                if reporter.is_cancel_requested() {
                    tracing::debug!(done, total, "Export stopped on request");
                    return JobOutcome::Cancelled;
                }

                done += 1;
                let percent = done * 100 / total;
                if percent > reported {
                    reported = percent;
                    reporter.progress(percent as i64);
                }

                if !self.tile_delay.is_zero() {
                    tokio::time::sleep(self.tile_delay).await;
                } else if done % YIELD_INTERVAL == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }

        let manifest = PackageManifest {
            format: PACKAGE_FORMAT,
            version: PACKAGE_VERSION,
            region,
            scales: self.parameters.scales,
            levels,
            tile_count: total,
            created_at: Utc::now(),
        };

        if let Err(e) = write_manifest(&self.destination, &manifest).await {
            return JobOutcome::Failed(
                JobError::new("Unable to write tile package").with_additional_message(e.to_string()),
            );
        }

        JobOutcome::Succeeded(Artifact::new(self.destination, region))
    }
}

async fn write_manifest(path: &Path, manifest: &PackageManifest) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(manifest)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
