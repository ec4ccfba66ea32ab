//! Collaborator adapters
//!
//! Traits describing the exporting capability, the viewport and the UI
//! surfaces, plus the implementations shipped with Tilepack.

pub mod console;
pub mod handle;
pub mod headless;
pub mod local;
pub mod traits;

pub use handle::{job_channel, ExportJobHandle, JobReporter, JobSignal};
pub use traits::{
    MessageSurface, PreviewSurface, ProgressSurface, SelectionOverlay, TileExporter,
    ViewportProjection,
};
