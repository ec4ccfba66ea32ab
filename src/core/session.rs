//! Export session
//!
//! Wires the region tracker, parameter resolver, job controller, result
//! presenter and working-directory cleanup together for one map session.

use crate::adapters::traits::{
    MessageSurface, PreviewSurface, ProgressSurface, SelectionOverlay, TileExporter,
    ViewportProjection,
};
use crate::config::TilepackConfig;
use crate::core::cleanup::SessionCleanup;
use crate::core::controller::{ControllerPhase, ExportJobController};
use crate::core::presenter::{PresentationMode, ResultPresenter};
use crate::core::progress::ProgressIndicator;
use crate::core::region::RegionTracker;
use crate::core::resolver::ExportParameterResolver;
use crate::domain::errors::TilepackError;
use crate::domain::ids::JobId;
use crate::domain::region::GeoRegion;
use crate::domain::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Label prefixed to parameter resolution failures shown to the user
pub const RESOLVE_FAILED_LABEL: &str = "Error resolving export parameters";

/// Session-level settings
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Directory holding every artifact of the session
    pub working_directory: PathBuf,

    /// File name of the tile package inside the working directory
    pub destination_file: String,

    /// Most detailed scale the tile source offers
    pub max_scale: f64,

    /// Inset of the region corners from the viewport edges, in pixels
    pub inset_px: f64,

    /// How long suspension waits for an active job to stop
    pub grace_period: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &TilepackConfig) -> Self {
        Self {
            working_directory: PathBuf::from(&config.export.working_directory),
            destination_file: config.export.destination_file.clone(),
            max_scale: config.export.max_scale,
            inset_px: config.selection.inset_px,
            grace_period: Duration::from_secs(config.cleanup.grace_period_secs),
        }
    }

    /// Full path of the tile package
    pub fn destination(&self) -> PathBuf {
        self.working_directory.join(&self.destination_file)
    }
}

/// UI surfaces used by a session
pub struct SessionSurfaces {
    pub overlay: Box<dyn SelectionOverlay>,
    pub progress: Box<dyn ProgressSurface>,
    pub preview: Box<dyn PreviewSurface>,
    pub messages: Box<dyn MessageSurface>,
}

/// One map session with at most one export job in flight
pub struct ExportSession {
    settings: SessionSettings,
    tracker: RegionTracker,
    resolver: ExportParameterResolver,
    controller: ExportJobController,
    cleanup: SessionCleanup,
    current_scale: Option<f64>,
}

impl ExportSession {
    pub fn new(
        exporter: Arc<dyn TileExporter>,
        surfaces: SessionSurfaces,
        settings: SessionSettings,
    ) -> Self {
        Self::with_cleanup(exporter, surfaces, settings, SessionCleanup::default())
    }

    pub fn with_cleanup(
        exporter: Arc<dyn TileExporter>,
        surfaces: SessionSurfaces,
        settings: SessionSettings,
        cleanup: SessionCleanup,
    ) -> Self {
        let controller = ExportJobController::new(
            Arc::clone(&exporter),
            ProgressIndicator::new(surfaces.progress),
            ResultPresenter::new(surfaces.preview),
            surfaces.messages,
        );

        Self {
            tracker: RegionTracker::new(settings.inset_px, surfaces.overlay),
            resolver: ExportParameterResolver::new(exporter),
            controller,
            cleanup,
            settings,
            current_scale: None,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn controller(&self) -> &ExportJobController {
        &self.controller
    }

    pub fn region(&self) -> Option<GeoRegion> {
        self.tracker.current()
    }

    pub fn presentation_mode(&self) -> PresentationMode {
        self.controller.presenter().mode()
    }

    /// Track the viewport; ignored until the map has finished loading
    pub fn on_viewport_changed(
        &mut self,
        viewport: &dyn ViewportProjection,
        map_ready: bool,
    ) -> Option<GeoRegion> {
        let region = self.tracker.on_viewport_changed(viewport, map_ready)?;
        self.current_scale = Some(viewport.scale());
        Some(region)
    }

    /// Resolve parameters for the tracked region and start an export
    ///
    /// # Errors
    ///
    /// * `ConcurrentJob` if a job is already starting or running
    /// * `State` while the previous result is still previewed
    /// * `RegionUndefined` before the map has finished loading
    /// * `Resolution`/`Validation` if parameters cannot be resolved; the
    ///   diagnostic has been shown to the user
    /// * `JobFailed` if the exporter refused to start
    pub async fn request_export(&mut self) -> Result<JobId> {
        if self.controller.is_active() {
            let detail = self
                .controller
                .job()
                .map(|job| format!("job {} is {}", job.id, self.controller.phase()))
                .unwrap_or_else(|| self.controller.phase().to_string());
            return Err(TilepackError::ConcurrentJob(detail));
        }
        if self.presentation_mode() == PresentationMode::Preview {
            return Err(TilepackError::State(
                "Close the preview before starting another export".to_string(),
            ));
        }

        let (Some(region), Some(scale)) = (self.tracker.current(), self.current_scale) else {
            return Err(TilepackError::RegionUndefined);
        };

        // Starting over implies the previous result was seen
        if self.controller.phase().is_terminal() {
            self.controller.acknowledge()?;
        }

        let parameters = match self
            .resolver
            .resolve(Some(region), scale, self.settings.max_scale)
            .await
        {
            Ok(parameters) => parameters,
            Err(e) => {
                tracing::error!(error = %e, "Export parameter resolution failed");
                self.controller
                    .notify_error(&format!("{RESOLVE_FAILED_LABEL}: {e}"));
                return Err(e);
            }
        };

        let destination = self.settings.destination();
        self.controller.start(parameters, &destination).await
    }

    /// Drive the active job to its terminal state
    pub async fn supervise(&mut self, cancel: &mut watch::Receiver<bool>) -> ControllerPhase {
        self.controller.supervise(cancel).await
    }

    /// Request cancellation of the active job
    pub fn cancel(&mut self) -> bool {
        self.controller.cancel()
    }

    /// Acknowledge the terminal result of the last job
    pub fn acknowledge(&mut self) -> Result<()> {
        self.controller.acknowledge()
    }

    /// Leave the preview and return to region selection
    pub fn close_preview(&mut self) {
        self.controller.presenter_mut().clear();
    }

    /// Suspend the session and purge the working directory
    ///
    /// An active job is cancelled first and given the configured grace
    /// period to stop; a job still running after that is abandoned. The
    /// purge runs regardless of the job state and takes the exported
    /// package with it, so the session returns to region selection with the
    /// controller idle. Returns whether the purge removed everything.
    pub async fn suspend(&mut self) -> bool {
        if self.controller.is_active() {
            self.controller.cancel();
            let (_hold, mut no_cancel) = watch::channel(false);
            let grace = self.settings.grace_period;

            match tokio::time::timeout(grace, self.controller.supervise(&mut no_cancel)).await {
                Ok(phase) => tracing::debug!(phase = %phase, "Active export stopped before purge"),
                Err(_) => {
                    tracing::warn!(
                        grace_secs = grace.as_secs(),
                        "Export still active after grace period, purging anyway"
                    );
                    self.controller.abandon();
                }
            }
        }

        let purged = purge(self.cleanup.clone(), &self.settings.working_directory).await;

        self.controller.presenter_mut().clear();
        if self.controller.phase().is_terminal() {
            if let Err(e) = self.controller.acknowledge() {
                tracing::warn!(error = %e, "Could not reset export state after suspension");
            }
        }

        purged
    }
}

async fn purge(cleanup: SessionCleanup, root: &Path) -> bool {
    let root = root.to_path_buf();
    match tokio::task::spawn_blocking(move || cleanup.purge_working_directory(&root)).await {
        Ok(purged) => purged,
        Err(e) => {
            tracing::error!(error = %e, "Cleanup task failed");
            false
        }
    }
}
