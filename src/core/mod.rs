//! Core export orchestration for Tilepack.
//!
//! # Modules
//!
//! - [`region`] - Download region tracking from the viewport
//! - [`resolver`] - Asynchronous export parameter resolution
//! - [`controller`] - Export job state machine
//! - [`progress`] - Progress indicator lifecycle
//! - [`presenter`] - Selection/preview switching on success
//! - [`cleanup`] - Working directory purge on suspension
//! - [`session`] - Wiring of the above for one map session
//!
//! # Export Workflow
//!
//! 1. **Track**: every viewport change recomputes the download region
//! 2. **Resolve**: scale bounds are derived from the current and maximum scale
//! 3. **Start**: the exporter acknowledges a new job
//! 4. **Supervise**: progress is forwarded until exactly one terminal signal
//! 5. **Present**: success swaps in a preview, failure shows a diagnostic
//! 6. **Clean up**: suspension purges the working directory
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use geo::Coord;
//! use tilepack::adapters::console::{ConsoleMessages, ConsoleOverlay, ConsolePreview, ConsoleProgress};
//! use tilepack::adapters::local::{LocalTileExporter, StaticViewport};
//! use tilepack::config::load_config;
//! use tilepack::core::{ExportSession, SessionSettings, SessionSurfaces};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tilepack.toml")?;
//!
//! let surfaces = SessionSurfaces {
//!     overlay: Box::new(ConsoleOverlay),
//!     progress: Box::new(ConsoleProgress::new()),
//!     preview: Box::new(ConsolePreview),
//!     messages: Box::new(ConsoleMessages),
//! };
//! let mut session = ExportSession::new(
//!     Arc::new(LocalTileExporter::default()),
//!     surfaces,
//!     SessionSettings::from_config(&config),
//! );
//!
//! let viewport = StaticViewport::new(Coord { x: 0.0, y: 51.0 }, 1280.0, 800.0, 10_000_000.0);
//! session.on_viewport_changed(&viewport, true);
//!
//! let (_cancel_tx, mut cancel_rx) = tokio::sync::watch::channel(false);
//! session.request_export().await?;
//! let phase = session.supervise(&mut cancel_rx).await;
//! println!("Export finished: {phase}");
//! # Ok(())
//! # }
//! ```

pub mod cleanup;
pub mod controller;
pub mod presenter;
pub mod progress;
pub mod region;
pub mod resolver;
pub mod session;

pub use cleanup::{EntryRemover, SessionCleanup, StdRemover};
pub use controller::{ControllerPhase, ExportJobController};
pub use presenter::{PresentationMode, ResultPresenter};
pub use progress::ProgressIndicator;
pub use region::RegionTracker;
pub use resolver::ExportParameterResolver;
pub use session::{ExportSession, SessionSettings, SessionSurfaces};
