//! Export job model
//!
//! An [`ExportJob`] tracks one in-flight or completed export. Status moves
//! `Pending -> Running -> {Succeeded, Failed, Cancelled}` and a job reaches
//! a terminal status at most once.

use crate::domain::errors::JobError;
use crate::domain::ids::JobId;
use crate::domain::params::ExportParameters;
use crate::domain::region::GeoRegion;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Export job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Allocated, execution not yet acknowledged by the exporter
    Pending,
    /// Exporter acknowledged start
    Running,
    /// Exported artifact is available
    Succeeded,
    /// Exporter reported a failure
    Failed,
    /// Exporter stopped after a cancellation request
    Cancelled,
}

impl JobStatus {
    /// Whether no further transitions can occur
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Whether the job counts against the single-active-job limit
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Opaque reference to exported tile data
///
/// Produced only by a succeeded job. The preview treats it as read-only and
/// frames itself on the region the artifact covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    path: PathBuf,
    region: GeoRegion,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, region: GeoRegion) -> Self {
        Self {
            path: path.into(),
            region,
        }
    }

    /// Location of the exported tile cache
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Region covered by the exported tiles
    pub fn region(&self) -> &GeoRegion {
        &self.region
    }
}

/// Terminal outcome reported by the exporting collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Succeeded(Artifact),
    Failed(JobError),
    Cancelled,
}

impl JobOutcome {
    /// Status the job takes on when this outcome is recorded
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Succeeded(_) => JobStatus::Succeeded,
            JobOutcome::Failed(_) => JobStatus::Failed,
            JobOutcome::Cancelled => JobStatus::Cancelled,
        }
    }
}

/// One export operation
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Unique identity, never reused
    pub id: JobId,

    /// Parameters the job was started with
    pub parameters: ExportParameters,

    /// Destination path handed to the exporter
    pub destination: PathBuf,

    /// Current status
    pub status: JobStatus,

    /// Last accepted progress value (0-100)
    pub progress: u8,

    /// Whether the user asked for cancellation
    pub cancel_requested: bool,

    /// When the job was allocated
    pub created_at: DateTime<Utc>,

    /// When the job reached a terminal status
    pub finished_at: Option<DateTime<Utc>>,

    /// Artifact on success
    pub artifact: Option<Artifact>,

    /// Error descriptor on failure
    pub error: Option<JobError>,
}

impl ExportJob {
    /// Allocates a new pending job with a fresh identity
    pub fn new(parameters: ExportParameters, destination: impl Into<PathBuf>) -> Self {
        Self {
            id: JobId::generate(),
            parameters,
            destination: destination.into(),
            status: JobStatus::Pending,
            progress: 0,
            cancel_requested: false,
            created_at: Utc::now(),
            finished_at: None,
            artifact: None,
            error: None,
        }
    }

    /// Mark the job as running once the exporter acknowledged start
    pub fn mark_running(&mut self) {
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Running;
        }
    }

    /// Record a raw progress signal
    ///
    /// Values are clamped to 0..=100 and anything that would move progress
    /// backwards is ignored. Returns the new value when progress advanced.
    pub fn record_progress(&mut self, raw: i64) -> Option<u8> {
        if self.status != JobStatus::Running {
            return None;
        }
        let clamped = raw.clamp(0, 100) as u8;
        if clamped <= self.progress {
            return None;
        }
        self.progress = clamped;
        Some(clamped)
    }

    /// Record the terminal outcome
    ///
    /// Returns `false` without changing anything if the job already reached
    /// a terminal status.
    pub fn finish(&mut self, outcome: JobOutcome) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = outcome.status();
        self.finished_at = Some(Utc::now());
        match outcome {
            JobOutcome::Succeeded(artifact) => {
                self.progress = 100;
                self.artifact = Some(artifact);
            }
            JobOutcome::Failed(error) => self.error = Some(error),
            JobOutcome::Cancelled => {}
        }
        true
    }

    /// Elapsed time between allocation and the terminal status
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.created_at)
    }
}
