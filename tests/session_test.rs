//! Integration tests for a complete export session
//!
//! Runs the local exporter against a temporary working directory and
//! asserts on what the user would have seen through headless surfaces.

use async_trait::async_trait;
use geo::Coord;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tilepack::adapters::handle::{job_channel, ExportJobHandle, JobReporter};
use tilepack::adapters::headless::{EventLog, HeadlessSurface, UiEvent};
use tilepack::adapters::local::{LocalTileExporter, StaticViewport, PACKAGE_FORMAT};
use tilepack::adapters::traits::TileExporter;
use tilepack::core::{
    ControllerPhase, ExportSession, PresentationMode, SessionSettings, SessionSurfaces,
};
use tilepack::domain::{
    ExportParameters, GeoRegion, JobError, JobOutcome, Result, ScaleRange, TilepackError,
};
use tokio::sync::watch;

fn surfaces(log: &EventLog) -> SessionSurfaces {
    let surface = HeadlessSurface::new(log.clone());
    SessionSurfaces {
        overlay: Box::new(surface.clone()),
        progress: Box::new(surface.clone()),
        preview: Box::new(surface.clone()),
        messages: Box::new(surface),
    }
}

fn settings(dir: &TempDir, max_scale: f64) -> SessionSettings {
    SessionSettings {
        working_directory: dir.path().join("cache"),
        destination_file: "tiles.tpk".to_string(),
        max_scale,
        inset_px: 200.0,
        grace_period: Duration::from_secs(5),
    }
}

fn viewport() -> StaticViewport {
    StaticViewport::new(Coord { x: 0.0, y: 51.0 }, 1280.0, 800.0, 10_000_000.0)
}

/// Exporter that starts jobs but never finishes them on its own
#[derive(Default)]
struct StalledExporter {
    reporters: Mutex<Vec<JobReporter>>,
}

#[async_trait]
impl TileExporter for StalledExporter {
    async fn default_parameters(
        &self,
        region: &GeoRegion,
        current_scale: f64,
        max_scale: f64,
    ) -> Result<ExportParameters> {
        Ok(ExportParameters::new(
            *region,
            ScaleRange::new(current_scale, max_scale)?,
        ))
    }

    async fn start_export(
        &self,
        _parameters: &ExportParameters,
        _destination: &Path,
    ) -> Result<ExportJobHandle> {
        let (handle, reporter) = job_channel();
        self.reporters.lock().unwrap().push(reporter);
        Ok(handle)
    }
}

#[tokio::test]
async fn test_export_before_map_ready() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let mut session = ExportSession::new(
        Arc::new(LocalTileExporter::default()),
        surfaces(&log),
        settings(&temp, 5_000_000.0),
    );

    assert!(session.on_viewport_changed(&viewport(), false).is_none());
    let result = session.request_export().await;

    assert!(matches!(result, Err(TilepackError::RegionUndefined)));
    assert_eq!(session.controller().phase(), ControllerPhase::Idle);
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn test_export_writes_package_and_previews() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let mut session = ExportSession::new(
        Arc::new(LocalTileExporter::default()),
        surfaces(&log),
        settings(&temp, 5_000_000.0),
    );
    let (_cancel_tx, mut cancel_rx) = watch::channel(false);

    let region = session.on_viewport_changed(&viewport(), true).unwrap();
    assert!(region.contains(Coord { x: 0.0, y: 51.0 }));

    session.request_export().await.unwrap();
    let phase = session.supervise(&mut cancel_rx).await;

    assert_eq!(phase, ControllerPhase::Succeeded);
    assert_eq!(session.presentation_mode(), PresentationMode::Preview);
    assert!(log.errors().is_empty());

    let destination = session.settings().destination();
    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&destination).unwrap()).unwrap();
    assert_eq!(manifest["format"], PACKAGE_FORMAT);
    assert!(manifest["tile_count"].as_u64().unwrap() > 0);

    let artifact = session.controller().presenter().artifact().unwrap();
    assert_eq!(artifact.path(), destination.as_path());
    assert_eq!(artifact.region(), &region);
}

#[tokio::test]
async fn test_preview_must_close_before_next_export() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let mut session = ExportSession::new(
        Arc::new(LocalTileExporter::default()),
        surfaces(&log),
        settings(&temp, 5_000_000.0),
    );
    let (_cancel_tx, mut cancel_rx) = watch::channel(false);

    session.on_viewport_changed(&viewport(), true);
    let first = session.request_export().await.unwrap();
    session.supervise(&mut cancel_rx).await;

    let blocked = session.request_export().await;
    assert!(matches!(blocked, Err(TilepackError::State(_))));

    session.close_preview();
    assert_eq!(session.presentation_mode(), PresentationMode::Selection);

    let second = session.request_export().await.unwrap();
    assert_ne!(first, second);
    assert_eq!(
        session.supervise(&mut cancel_rx).await,
        ControllerPhase::Succeeded
    );
    assert_eq!(log.count(|e| matches!(e, UiEvent::SelectionShown)), 1);
}

#[tokio::test]
async fn test_tile_limit_failure_is_shown() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let mut session = ExportSession::new(
        Arc::new(LocalTileExporter::new(1)),
        surfaces(&log),
        settings(&temp, 5_000_000.0),
    );
    let (_cancel_tx, mut cancel_rx) = watch::channel(false);

    session.on_viewport_changed(&viewport(), true);
    session.request_export().await.unwrap();

    assert_eq!(
        session.supervise(&mut cancel_rx).await,
        ControllerPhase::Failed
    );
    let errors = log.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error exporting tiles: Export exceeds the tile limit."));
    assert!(errors[0].ends_with("limit is 1"));
    assert!(!session.settings().destination().exists());

    session.acknowledge().unwrap();
    assert_eq!(session.controller().phase(), ControllerPhase::Idle);
}

#[tokio::test]
async fn test_resolution_failure_is_shown() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let mut session = ExportSession::new(
        Arc::new(LocalTileExporter::default()),
        surfaces(&log),
        settings(&temp, 500_000.0),
    );

    let polar = StaticViewport::new(Coord { x: 0.0, y: 89.9 }, 1280.0, 800.0, 1_000_000.0);
    session.on_viewport_changed(&polar, true).unwrap();

    let result = session.request_export().await;

    assert!(matches!(result, Err(TilepackError::Resolution(_))));
    assert_eq!(session.controller().phase(), ControllerPhase::Idle);
    let errors = log.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Error resolving export parameters"));
}

#[tokio::test]
async fn test_concurrent_request_rejected() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let exporter = LocalTileExporter::default().with_tile_delay(Duration::from_millis(20));
    let mut session = ExportSession::new(
        Arc::new(exporter),
        surfaces(&log),
        settings(&temp, 500_000.0),
    );

    session.on_viewport_changed(&viewport(), true);
    let first = session.request_export().await.unwrap();
    let second = session.request_export().await;

    assert!(matches!(second, Err(TilepackError::ConcurrentJob(_))));
    assert_eq!(session.controller().job().unwrap().id, first);

    session.suspend().await;
}

#[tokio::test]
async fn test_suspend_cancels_and_purges() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let exporter = LocalTileExporter::default().with_tile_delay(Duration::from_millis(20));
    let mut session = ExportSession::new(
        Arc::new(exporter),
        surfaces(&log),
        settings(&temp, 500_000.0),
    );

    let cache = session.settings().working_directory.clone();
    std::fs::create_dir_all(cache.join("old")).unwrap();
    std::fs::write(cache.join("old").join("tiles.tpk"), b"{}").unwrap();

    session.on_viewport_changed(&viewport(), true);
    session.request_export().await.unwrap();
    assert!(session.controller().is_active());

    assert!(session.suspend().await);

    assert_eq!(session.controller().phase(), ControllerPhase::Idle);
    assert!(cache.exists());
    assert_eq!(std::fs::read_dir(&cache).unwrap().count(), 0);
    assert!(log.errors().is_empty());
}

#[tokio::test]
async fn test_suspend_purges_after_grace_period() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let exporter = Arc::new(StalledExporter::default());
    let mut session = ExportSession::new(
        Arc::clone(&exporter) as Arc<dyn TileExporter>,
        surfaces(&log),
        SessionSettings {
            grace_period: Duration::from_millis(100),
            ..settings(&temp, 500_000.0)
        },
    );

    let cache = session.settings().working_directory.clone();
    std::fs::create_dir_all(&cache).unwrap();
    std::fs::write(cache.join("partial.tpk"), b"").unwrap();

    session.on_viewport_changed(&viewport(), true);
    session.request_export().await.unwrap();

    assert!(session.suspend().await);

    assert_eq!(session.controller().phase(), ControllerPhase::Idle);
    assert!(session.controller().job().is_none());
    assert!(!cache.join("partial.tpk").exists());

    // The exporter was told to stop and its late result is ignored
    let reporter = exporter.reporters.lock().unwrap().pop().unwrap();
    assert!(reporter.is_cancel_requested());
    reporter.finish(JobOutcome::Failed(JobError::new("late")));
    assert_eq!(session.controller().phase(), ControllerPhase::Idle);
    assert!(log.errors().is_empty());
}

#[tokio::test]
async fn test_suspend_after_success_returns_to_selection() {
    let temp = TempDir::new().unwrap();
    let log = EventLog::new();
    let mut session = ExportSession::new(
        Arc::new(LocalTileExporter::default()),
        surfaces(&log),
        settings(&temp, 5_000_000.0),
    );
    let (_cancel_tx, mut cancel_rx) = watch::channel(false);

    session.on_viewport_changed(&viewport(), true);
    let first = session.request_export().await.unwrap();
    assert_eq!(
        session.supervise(&mut cancel_rx).await,
        ControllerPhase::Succeeded
    );
    assert_eq!(session.presentation_mode(), PresentationMode::Preview);

    assert!(session.suspend().await);

    assert!(!session.settings().destination().exists());
    assert_eq!(session.presentation_mode(), PresentationMode::Selection);
    assert!(session.controller().presenter().artifact().is_none());
    assert_eq!(session.controller().phase(), ControllerPhase::Idle);
    assert_eq!(log.count(|e| matches!(e, UiEvent::SelectionShown)), 1);

    let second = session.request_export().await.unwrap();
    assert_ne!(first, second);
    assert_eq!(
        session.supervise(&mut cancel_rx).await,
        ControllerPhase::Succeeded
    );
}
