//! Job signalling channel between an exporter and the controller
//!
//! [`job_channel`] creates a connected pair: the exporter keeps the
//! [`JobReporter`] and the controller supervises the [`ExportJobHandle`].
//! `JobReporter::finish` consumes the reporter, so an exporter can send at
//! most one terminal outcome.

use crate::domain::job::JobOutcome;
use tokio::sync::{mpsc, watch};

/// Signal sent from a running export to its supervisor
#[derive(Debug, Clone, PartialEq)]
pub enum JobSignal {
    /// Raw progress value as reported by the exporter, not yet validated
    Progress(i64),
    /// Terminal outcome
    Finished(JobOutcome),
}

/// Create a connected handle/reporter pair for one export job
pub fn job_channel() -> (ExportJobHandle, JobReporter) {
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let (cancel_tx, cancel_rx) = watch::channel(false);

    (
        ExportJobHandle {
            signals: signal_rx,
            cancel: cancel_tx,
        },
        JobReporter {
            signals: signal_tx,
            cancel: cancel_rx,
        },
    )
}

/// Supervisor side of a running export
#[derive(Debug)]
pub struct ExportJobHandle {
    signals: mpsc::UnboundedReceiver<JobSignal>,
    cancel: watch::Sender<bool>,
}

impl ExportJobHandle {
    /// Wait for the next signal
    ///
    /// Returns `None` once the exporter dropped its reporter and all
    /// buffered signals were consumed.
    pub async fn next_signal(&mut self) -> Option<JobSignal> {
        self.signals.recv().await
    }

    /// Ask the exporter to stop; cancellation is cooperative
    pub fn request_cancel(&self) {
        // The exporter may already be gone, which is fine
        let _ = self.cancel.send(true);
    }
}

/// Exporter side of a running export
#[derive(Debug)]
pub struct JobReporter {
    signals: mpsc::UnboundedSender<JobSignal>,
    cancel: watch::Receiver<bool>,
}

impl JobReporter {
    /// Report raw progress
    pub fn progress(&self, value: i64) {
        let _ = self.signals.send(JobSignal::Progress(value));
    }

    /// Report the terminal outcome
    pub fn finish(self, outcome: JobOutcome) {
        let _ = self.signals.send(JobSignal::Finished(outcome));
    }

    /// Whether cancellation has been requested
    pub fn is_cancel_requested(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Resolve once cancellation is requested
    ///
    /// Never resolves if the supervisor dropped its handle without asking.
    pub async fn cancelled(&mut self) {
        while !*self.cancel.borrow_and_update() {
            if self.cancel.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
