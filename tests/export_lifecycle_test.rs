//! Integration tests for the export job lifecycle
//!
//! These tests verify that:
//! - Parameters bracket the current and maximum scale
//! - Only one job can be active at a time
//! - Failures reach the user and the controller returns to idle
//! - Progress is forwarded and cancellation is cooperative

use async_trait::async_trait;
use geo::Coord;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tilepack::adapters::handle::{job_channel, ExportJobHandle, JobReporter};
use tilepack::adapters::headless::{EventLog, HeadlessSurface, UiEvent};
use tilepack::adapters::traits::TileExporter;
use tilepack::core::{
    ControllerPhase, ExportJobController, ExportParameterResolver, PresentationMode,
    ProgressIndicator, ResultPresenter,
};
use tilepack::domain::{
    Artifact, ExportParameters, GeoRegion, JobError, JobOutcome, Result, ScaleRange,
    TilepackError,
};
use tokio::sync::watch;

/// Exporter handing each job's reporter to the test
#[derive(Default)]
struct ManualExporter {
    reporters: Mutex<Vec<JobReporter>>,
}

impl ManualExporter {
    fn reporter(&self) -> JobReporter {
        self.reporters.lock().unwrap().pop().unwrap()
    }
}

#[async_trait]
impl TileExporter for ManualExporter {
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

fn region() -> GeoRegion {
    GeoRegion::from_corners(Coord { x: -1.0, y: 50.0 }, Coord { x: 1.0, y: 52.0 }).unwrap()
}

fn controller(exporter: Arc<ManualExporter>, log: &EventLog) -> ExportJobController {
    let surface = HeadlessSurface::new(log.clone());
    ExportJobController::new(
        exporter,
        ProgressIndicator::new(Box::new(surface.clone())),
        ResultPresenter::new(Box::new(surface.clone())),
        Box::new(surface),
    )
}

#[tokio::test]
async fn test_resolved_parameters_bracket_scales() {
    let resolver = ExportParameterResolver::new(Arc::new(ManualExporter::default()));

    let parameters = resolver
        .resolve(Some(region()), 10_000_000.0, 500.0)
        .await
        .unwrap();

    assert_eq!(parameters.region, region());
    assert!(parameters.scales.brackets(500.0, 10_000_000.0));
}

#[tokio::test]
async fn test_resolve_without_region() {
    let resolver = ExportParameterResolver::new(Arc::new(ManualExporter::default()));

    let result = resolver.resolve(None, 10_000_000.0, 500.0).await;

    assert!(matches!(result, Err(TilepackError::RegionUndefined)));
}

#[tokio::test]
async fn test_back_to_back_start_is_rejected() {
    let exporter = Arc::new(ManualExporter::default());
    let log = EventLog::new();
    let mut controller = controller(Arc::clone(&exporter), &log);
    let parameters = ExportParameters::new(region(), ScaleRange::new(1e7, 500.0).unwrap());

    let first = controller
        .start(parameters.clone(), Path::new("/tmp/tiles.tpk"))
        .await
        .unwrap();
    let second = controller
        .start(parameters, Path::new("/tmp/tiles.tpk"))
        .await;

    assert!(matches!(second, Err(TilepackError::ConcurrentJob(_))));
    assert_eq!(controller.phase(), ControllerPhase::Running);
    assert_eq!(controller.job().unwrap().id, first);
    assert_eq!(exporter.reporters.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failure_reaches_user_then_idle() {
    let exporter = Arc::new(ManualExporter::default());
    let log = EventLog::new();
    let mut controller = controller(Arc::clone(&exporter), &log);
    let (_cancel_tx, mut cancel_rx) = watch::channel(false);

    controller
        .start(
            ExportParameters::new(region(), ScaleRange::new(1e7, 500.0).unwrap()),
            Path::new("/tmp/tiles.tpk"),
        )
        .await
        .unwrap();

    let reporter = exporter.reporter();
    reporter.progress(35);
    reporter.finish(JobOutcome::Failed(JobError::new("timeout")));

    let phase = controller.supervise(&mut cancel_rx).await;
    assert_eq!(phase, ControllerPhase::Failed);

    let errors = log.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("timeout"));
    assert!(errors[0].starts_with("Error exporting tiles"));
    assert!(!controller.progress().is_visible());
    assert_eq!(controller.presenter().mode(), PresentationMode::Selection);

    controller.acknowledge().unwrap();
    assert_eq!(controller.phase(), ControllerPhase::Idle);
    assert!(controller.job().is_none());
}

#[tokio::test]
async fn test_progress_forwarded_in_order() {
    let exporter = Arc::new(ManualExporter::default());
    let log = EventLog::new();
    let mut controller = controller(Arc::clone(&exporter), &log);
    let (_cancel_tx, mut cancel_rx) = watch::channel(false);

    controller
        .start(
            ExportParameters::new(region(), ScaleRange::new(1e7, 500.0).unwrap()),
            Path::new("/tmp/tiles.tpk"),
        )
        .await
        .unwrap();

    let reporter = exporter.reporter();
    reporter.progress(10);
    reporter.progress(250);
    reporter.progress(40);
    reporter.finish(JobOutcome::Succeeded(Artifact::new("/tmp/tiles.tpk", region())));

    assert_eq!(
        controller.supervise(&mut cancel_rx).await,
        ControllerPhase::Succeeded
    );

    let updates: Vec<u8> = log
        .events()
        .into_iter()
        .filter_map(|event| match event {
            UiEvent::ProgressUpdated(percent) => Some(percent),
            _ => None,
        })
        .collect();
    assert_eq!(updates, vec![10, 100]);
    assert_eq!(controller.presenter().mode(), PresentationMode::Preview);
    assert_eq!(
        log.count(|e| matches!(e, UiEvent::PreviewShown(_))),
        1
    );
}

#[tokio::test]
async fn test_cancel_waits_for_exporter_confirmation() {
    let exporter = Arc::new(ManualExporter::default());
    let log = EventLog::new();
    let mut controller = controller(Arc::clone(&exporter), &log);

    controller
        .start(
            ExportParameters::new(region(), ScaleRange::new(1e7, 500.0).unwrap()),
            Path::new("/tmp/tiles.tpk"),
        )
        .await
        .unwrap();

    let mut reporter = exporter.reporter();
    assert!(controller.cancel());
    assert!(!controller.cancel());
    assert_eq!(controller.phase(), ControllerPhase::Running);
    assert!(controller.job().unwrap().cancel_requested);

    reporter.cancelled().await;
    reporter.finish(JobOutcome::Cancelled);

    let (_cancel_tx, mut cancel_rx) = watch::channel(false);
    assert_eq!(
        controller.supervise(&mut cancel_rx).await,
        ControllerPhase::Cancelled
    );
    assert!(log.errors().is_empty());
    assert_eq!(controller.presenter().mode(), PresentationMode::Selection);
}
