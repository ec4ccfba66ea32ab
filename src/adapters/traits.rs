//! Collaborator traits
//!
//! The export core talks to the map SDK, the exporter and the UI only
//! through these traits. Adapters implement them for the local filesystem,
//! the console and headless runs.

use crate::adapters::handle::ExportJobHandle;
use crate::domain::ids::JobId;
use crate::domain::job::Artifact;
use crate::domain::params::ExportParameters;
use crate::domain::region::{GeoRegion, ScreenPoint};
use crate::domain::Result;
use async_trait::async_trait;
use geo::Coord;
use std::path::Path;

/// Exporting capability
///
/// Resolves default export parameters and starts cancelable,
/// progress-reporting export jobs.
#[async_trait]
pub trait TileExporter: Send + Sync {
    /// Compute the parameters needed to export `region`
    ///
    /// # Arguments
    ///
    /// * `region` - Region to export
    /// * `current_scale` - Scale the viewport currently shows
    /// * `max_scale` - Most detailed scale the tile source offers
    ///
    /// # Errors
    ///
    /// Returns an error if parameters cannot be produced for these inputs.
    async fn default_parameters(
        &self,
        region: &GeoRegion,
        current_scale: f64,
        max_scale: f64,
    ) -> Result<ExportParameters>;

    /// Start an export writing to `destination`
    ///
    /// Returning `Ok` is the acknowledgment that the job started. The job
    /// then reports progress and exactly one terminal outcome through the
    /// returned handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the job could not be started at all.
    async fn start_export(
        &self,
        parameters: &ExportParameters,
        destination: &Path,
    ) -> Result<ExportJobHandle>;
}

/// Viewport source: screen-to-map conversion for the visible map
pub trait ViewportProjection {
    /// Viewport size in pixels as `(width, height)`
    fn size(&self) -> (f64, f64);

    /// Current map scale (denominator of `1:scale`)
    fn scale(&self) -> f64;

    /// Convert a view-space point to map coordinates
    fn to_map(&self, point: ScreenPoint) -> Coord<f64>;
}

/// Visual overlay that draws the tracked download region
pub trait SelectionOverlay: Send {
    fn draw_region(&mut self, region: &GeoRegion);
}

/// Progress/cancel UI surface
pub trait ProgressSurface: Send {
    /// Show the indicator for a newly started job
    fn show(&mut self, job_id: &JobId);

    /// Update the displayed percentage (0-100)
    fn update(&mut self, percent: u8);

    /// Hide the indicator
    fn dismiss(&mut self);
}

/// Preview UI surface
pub trait PreviewSurface: Send {
    /// Render a preview of the exported tiles and switch to preview mode
    fn show_preview(&mut self, artifact: &Artifact);

    /// Restore the selection controls
    fn show_selection(&mut self);
}

/// User-visible message surface for diagnostics
pub trait MessageSurface: Send {
    fn show_error(&mut self, message: &str);
}
