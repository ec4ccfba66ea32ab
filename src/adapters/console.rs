//! Terminal UI surfaces for the command-line interface

use crate::adapters::traits::{
    MessageSurface, PreviewSurface, ProgressSurface, SelectionOverlay,
};
use crate::domain::ids::JobId;
use crate::domain::job::Artifact;
use crate::domain::region::GeoRegion;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a running export
#[derive(Default)]
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg}\n[{bar:40.cyan/blue}] {pos}% ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ")
}

impl ProgressSurface for ConsoleProgress {
    fn show(&mut self, job_id: &JobId) {
        let bar = ProgressBar::new(100);
        bar.set_style(progress_style());
        bar.set_message(format!("📦 Exporting tiles (job {})", job_id.short()));
        self.bar = Some(bar);
    }

    fn update(&mut self, percent: u8) {
        if let Some(bar) = &self.bar {
            bar.set_position(u64::from(percent));
        }
    }

    fn dismiss(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Prints the preview summary once an export succeeds
#[derive(Debug, Default)]
pub struct ConsolePreview;

impl PreviewSurface for ConsolePreview {
    fn show_preview(&mut self, artifact: &Artifact) {
        let region = artifact.region();
        println!("✅ Tile package ready: {}", artifact.path().display());
        println!("   Region: {region}");
        let center = region.center();
        println!("   Preview centered on ({:.6}, {:.6})", center.x, center.y);
    }

    fn show_selection(&mut self) {
        println!("🗺️  Back to region selection");
    }
}

/// Prints user-visible diagnostics to stderr
#[derive(Debug, Default)]
pub struct ConsoleMessages;

impl MessageSurface for ConsoleMessages {
    fn show_error(&mut self, message: &str) {
        eprintln!("❌ {message}");
    }
}

/// Prints the tracked download region
#[derive(Debug, Default)]
pub struct ConsoleOverlay;

impl SelectionOverlay for ConsoleOverlay {
    fn draw_region(&mut self, region: &GeoRegion) {
        println!("📍 Download region: {region}");
    }
}
