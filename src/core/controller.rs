//! Export job controller
//!
//! Owns the lifecycle of the single active export job:
//!
//! ```text
//! Idle -> Starting -> Running -> {Succeeded, Failed, Cancelled} -> Idle
//! ```
//!
//! All transitions take `&mut self`, so signals from the exporter are
//! applied one at a time on the orchestrating task. Terminal states return
//! to `Idle` only when the caller acknowledges the result.

use crate::adapters::handle::{ExportJobHandle, JobSignal};
use crate::adapters::traits::{MessageSurface, TileExporter};
use crate::core::presenter::ResultPresenter;
use crate::core::progress::ProgressIndicator;
use crate::domain::errors::{JobError, TilepackError};
use crate::domain::ids::JobId;
use crate::domain::job::{ExportJob, JobOutcome, JobStatus};
use crate::domain::params::ExportParameters;
use crate::domain::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

/// Label prefixed to export failures shown to the user
pub const EXPORT_FAILED_LABEL: &str = "Error exporting tiles";

/// Label prefixed to failures to start an export
pub const START_FAILED_LABEL: &str = "Unable to start export";

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Starting,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ControllerPhase {
    /// Whether a job is starting or running
    pub fn is_active(&self) -> bool {
        matches!(self, ControllerPhase::Starting | ControllerPhase::Running)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ControllerPhase::Succeeded | ControllerPhase::Failed | ControllerPhase::Cancelled
        )
    }
}

impl From<JobStatus> for ControllerPhase {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Pending => ControllerPhase::Starting,
            JobStatus::Running => ControllerPhase::Running,
            JobStatus::Succeeded => ControllerPhase::Succeeded,
            JobStatus::Failed => ControllerPhase::Failed,
            JobStatus::Cancelled => ControllerPhase::Cancelled,
        }
    }
}

impl std::fmt::Display for ControllerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ControllerPhase::Idle => "idle",
            ControllerPhase::Starting => "starting",
            ControllerPhase::Running => "running",
            ControllerPhase::Succeeded => "succeeded",
            ControllerPhase::Failed => "failed",
            ControllerPhase::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// What woke the supervision loop
enum Wake {
    Signal(Option<JobSignal>),
    CancelRequested,
    CancelIdle,
    CancelClosed,
}

/// Export job controller
pub struct ExportJobController {
    exporter: Arc<dyn TileExporter>,
    phase: ControllerPhase,
    job: Option<ExportJob>,
    handle: Option<ExportJobHandle>,
    progress: ProgressIndicator,
    presenter: ResultPresenter,
    messages: Box<dyn MessageSurface>,
}

impl ExportJobController {
    pub fn new(
        exporter: Arc<dyn TileExporter>,
        progress: ProgressIndicator,
        presenter: ResultPresenter,
        messages: Box<dyn MessageSurface>,
    ) -> Self {
        Self {
            exporter,
            phase: ControllerPhase::Idle,
            job: None,
            handle: None,
            progress,
            presenter,
            messages,
        }
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    /// The current job, kept until its result is acknowledged
    pub fn job(&self) -> Option<&ExportJob> {
        self.job.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn progress(&self) -> &ProgressIndicator {
        &self.progress
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut ResultPresenter {
        &mut self.presenter
    }

    /// Start a new export job
    ///
    /// Allocates a job with a fresh identity and asks the exporter to run
    /// it. The controller is `Running` once the exporter acknowledged the
    /// start. The returned future must be driven to completion.
    ///
    /// # Errors
    ///
    /// * `ConcurrentJob` if the controller is not idle; nothing changes
    /// * `JobFailed` if the exporter refused to start; the controller is
    ///   then `Failed` and the diagnostic has been shown
    pub async fn start(
        &mut self,
        parameters: ExportParameters,
        destination: &Path,
    ) -> Result<JobId> {
        if self.phase != ControllerPhase::Idle {
            let detail = match &self.job {
                Some(job) => format!("job {} is {}", job.id, self.phase),
                None => format!("controller is {}", self.phase),
            };
            return Err(TilepackError::ConcurrentJob(detail));
        }

        let job = ExportJob::new(parameters, destination);
        let job_id = job.id;
        tracing::info!(
            job_id = %job_id,
            region = %job.parameters.region,
            min_scale = job.parameters.scales.min_scale(),
            max_scale = job.parameters.scales.max_scale(),
            destination = %destination.display(),
            "Starting export job"
        );
        self.phase = ControllerPhase::Starting;

        let started = self
            .exporter
            .start_export(&job.parameters, destination)
            .await;
        self.job = Some(job);

        match started {
            Ok(handle) => {
                if let Some(job) = self.job.as_mut() {
                    job.mark_running();
                }
                self.handle = Some(handle);
                self.phase = ControllerPhase::Running;
                self.progress.show(&job_id);
                tracing::debug!(job_id = %job_id, "Export job acknowledged by exporter");
                Ok(job_id)
            }
            Err(e) => {
                let error = JobError::new("The exporter refused to start the job")
                    .with_additional_message(e.to_string());
                self.complete_with(JobOutcome::Failed(error.clone()), START_FAILED_LABEL);
                Err(TilepackError::JobFailed(error))
            }
        }
    }

    /// Apply one signal from the exporter
    ///
    /// `None` means the exporter went away without reporting a result,
    /// which fails the job. Signals arriving when no job is running are
    /// ignored.
    pub fn handle_signal(&mut self, signal: Option<JobSignal>) {
        if self.phase != ControllerPhase::Running {
            tracing::trace!(phase = %self.phase, "Ignoring signal outside a running job");
            return;
        }

        match signal {
            Some(JobSignal::Progress(raw)) => {
                let advanced = self.job.as_mut().and_then(|job| job.record_progress(raw));
                if let Some(percent) = advanced {
                    tracing::debug!(progress = percent, "Export progress");
                    self.progress.update(percent);
                }
            }
            Some(JobSignal::Finished(outcome)) => self.complete(outcome),
            None => self.complete(JobOutcome::Failed(
                JobError::new("Export stopped unexpectedly")
                    .with_additional_message("The exporter ended without reporting a result"),
            )),
        }
    }

    /// Request cooperative cancellation of the running job
    ///
    /// The job stays `Running` until the exporter reports its final status,
    /// which may still be a success or failure. Returns `false` if there is
    /// nothing to cancel or cancellation was already requested.
    pub fn cancel(&mut self) -> bool {
        if self.phase != ControllerPhase::Running {
            return false;
        }
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        if job.cancel_requested {
            return false;
        }

        job.cancel_requested = true;
        if let Some(handle) = &self.handle {
            handle.request_cancel();
        }
        tracing::info!(job_id = %job.id, "Cancellation requested");
        true
    }

    /// Drive the running job until it reaches a terminal state
    ///
    /// `cancel` flipping to `true` requests cancellation; the loop keeps
    /// running until the exporter confirms the final status. Returns the
    /// phase the controller ends in.
    pub async fn supervise(&mut self, cancel: &mut watch::Receiver<bool>) -> ControllerPhase {
        let mut watching_cancel = true;
        if *cancel.borrow_and_update() {
            self.cancel();
        }

        while self.phase == ControllerPhase::Running {
            let Some(handle) = self.handle.as_mut() else {
                break;
            };

            let wake = tokio::select! {
                signal = handle.next_signal() => Wake::Signal(signal),
                changed = cancel.changed(), if watching_cancel => match changed {
                    Ok(()) if *cancel.borrow_and_update() => Wake::CancelRequested,
                    Ok(()) => Wake::CancelIdle,
                    Err(_) => Wake::CancelClosed,
                },
            };

            match wake {
                Wake::Signal(signal) => self.handle_signal(signal),
                Wake::CancelRequested => {
                    self.cancel();
                }
                Wake::CancelIdle => {}
                Wake::CancelClosed => watching_cancel = false,
            }
        }

        self.phase
    }

    /// Stop waiting for a running job that did not confirm cancellation
    ///
    /// Cancellation is requested if it was not already, the handle is
    /// dropped so later signals from the exporter are discarded, and the job
    /// is recorded as `Cancelled`. Returns `false` if no job is running.
    pub fn abandon(&mut self) -> bool {
        if self.phase != ControllerPhase::Running {
            return false;
        }
        self.cancel();
        if let Some(job) = &self.job {
            tracing::warn!(
                job_id = %job.id,
                progress = job.progress,
                "Abandoning export that did not stop in time"
            );
        }
        self.handle = None;
        self.complete(JobOutcome::Cancelled);
        true
    }

    /// Acknowledge a terminal result and return to `Idle`
    ///
    /// The job is discarded; the next `start` allocates a new identity.
    /// Acknowledging while idle is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `State` while a job is starting or running.
    pub fn acknowledge(&mut self) -> Result<()> {
        if self.phase.is_active() {
            return Err(TilepackError::State(format!(
                "Cannot acknowledge while the export job is {}",
                self.phase
            )));
        }

        if let Some(job) = self.job.take() {
            tracing::debug!(job_id = %job.id, status = %job.status, "Export result acknowledged");
        }
        self.handle = None;
        self.phase = ControllerPhase::Idle;
        Ok(())
    }

    /// Show a diagnostic that did not come from a job, dismissing the
    /// progress indicator if it is visible
    pub fn notify_error(&mut self, message: &str) {
        self.progress.dismiss();
        self.messages.show_error(message);
    }

    fn complete(&mut self, outcome: JobOutcome) {
        self.complete_with(outcome, EXPORT_FAILED_LABEL);
    }

    /// Record the terminal outcome exactly once and react to it
    fn complete_with(&mut self, outcome: JobOutcome, failure_label: &str) {
        let Some(job) = self.job.as_mut() else {
            return;
        };
        if !job.finish(outcome) {
            tracing::warn!(job_id = %job.id, "Ignoring duplicate terminal signal");
            return;
        }

        let job_id = job.id;
        let status = job.status;
        let artifact = job.artifact.clone();
        let error = job.error.clone();
        let elapsed_ms = job.duration().map(|d| d.num_milliseconds());

        self.handle = None;
        self.phase = ControllerPhase::from(status);
        self.progress.dismiss();

        match status {
            JobStatus::Succeeded => {
                tracing::info!(job_id = %job_id, elapsed_ms, "Export job succeeded");
                if let Some(artifact) = artifact {
                    self.presenter.present(artifact);
                }
            }
            JobStatus::Failed => {
                let error = error.unwrap_or_else(|| JobError::new("Unknown error"));
                tracing::error!(job_id = %job_id, error = %error, "Export job failed");
                self.messages.show_error(&error.user_message(failure_label));
            }
            JobStatus::Cancelled => {
                tracing::info!(job_id = %job_id, elapsed_ms, "Export job cancelled");
            }
            JobStatus::Pending | JobStatus::Running => {}
        }
    }
}
