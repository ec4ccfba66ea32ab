//! Headless UI surfaces
//!
//! Records every UI interaction into a shared [`EventLog`] instead of
//! drawing anything. Used by unattended runs and by tests to assert on what
//! the user would have seen.

use crate::adapters::traits::{
    MessageSurface, PreviewSurface, ProgressSurface, SelectionOverlay,
};
use crate::domain::ids::JobId;
use crate::domain::job::Artifact;
use crate::domain::region::GeoRegion;
use std::sync::{Arc, Mutex};

/// A single recorded UI interaction
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    RegionDrawn(GeoRegion),
    ProgressShown(JobId),
    ProgressUpdated(u8),
    ProgressDismissed,
    PreviewShown(Artifact),
    SelectionShown,
    Error(String),
}

/// Shared, append-only log of UI events
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<UiEvent>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: UiEvent) {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    /// Snapshot of all events recorded so far
    pub fn events(&self) -> Vec<UiEvent> {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Error messages shown to the user, in order
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                UiEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&UiEvent) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }
}

/// Surface implementing every UI trait on top of an [`EventLog`]
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    log: EventLog,
}

impl HeadlessSurface {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }
}

impl SelectionOverlay for HeadlessSurface {
    fn draw_region(&mut self, region: &GeoRegion) {
        self.log.push(UiEvent::RegionDrawn(*region));
    }
}

impl ProgressSurface for HeadlessSurface {
    fn show(&mut self, job_id: &JobId) {
        self.log.push(UiEvent::ProgressShown(*job_id));
    }

    fn update(&mut self, percent: u8) {
        self.log.push(UiEvent::ProgressUpdated(percent));
    }

    fn dismiss(&mut self) {
        self.log.push(UiEvent::ProgressDismissed);
    }
}

impl PreviewSurface for HeadlessSurface {
    fn show_preview(&mut self, artifact: &Artifact) {
        self.log.push(UiEvent::PreviewShown(artifact.clone()));
    }

    fn show_selection(&mut self) {
        self.log.push(UiEvent::SelectionShown);
    }
}

impl MessageSurface for HeadlessSurface {
    fn show_error(&mut self, message: &str) {
        self.log.push(UiEvent::Error(message.to_string()));
    }
}
