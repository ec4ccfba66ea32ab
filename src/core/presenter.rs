//! Result presentation
//!
//! Switches between the region selection controls and a preview of the
//! exported tiles.

use crate::adapters::traits::PreviewSurface;
use crate::domain::job::Artifact;

/// What the user currently sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Selection,
    Preview,
}

/// Presents the result of a succeeded export
pub struct ResultPresenter {
    surface: Box<dyn PreviewSurface>,
    mode: PresentationMode,
    artifact: Option<Artifact>,
}

impl ResultPresenter {
    pub fn new(surface: Box<dyn PreviewSurface>) -> Self {
        Self {
            surface,
            mode: PresentationMode::Selection,
            artifact: None,
        }
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    /// Artifact currently previewed
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    /// Build a preview bound to `artifact` and switch to preview mode
    pub fn present(&mut self, artifact: Artifact) {
        tracing::info!(
            path = %artifact.path().display(),
            region = %artifact.region(),
            "Presenting exported tiles"
        );
        self.surface.show_preview(&artifact);
        self.artifact = Some(artifact);
        self.mode = PresentationMode::Preview;
    }

    /// Drop the preview and restore selection mode
    pub fn clear(&mut self) {
        if self.mode == PresentationMode::Preview {
            self.surface.show_selection();
        }
        self.artifact = None;
        self.mode = PresentationMode::Selection;
    }
}
