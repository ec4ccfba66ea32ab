// Tilepack - Map Tile Export Tool
// Copyright (c) 2025 Tilepack Contributors
// Licensed under the MIT License

//! # Tilepack - Map Tile Export
//!
//! Tilepack lets a user pick a rectangular region on a map, export the map
//! tiles covering it into a local tile package in the background, and
//! preview the result.
//!
//! ## Overview
//!
//! This library provides:
//! - **Tracking** a stable download region from a changing viewport
//! - **Resolving** export parameters (scale bounds) asynchronously
//! - **Supervising** a single cancelable, progress-reporting export job
//! - **Presenting** the exported tiles, or a diagnostic on failure
//! - **Cleaning up** the working directory when the session is suspended
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export orchestration (tracker, resolver, controller, presenter, cleanup)
//! - [`adapters`] - Exporter, viewport and UI surfaces
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use geo::Coord;
//! use tilepack::adapters::headless::{EventLog, HeadlessSurface};
//! use tilepack::adapters::local::{LocalTileExporter, StaticViewport};
//! use tilepack::core::{ExportSession, SessionSettings, SessionSurfaces};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = tilepack::config::load_config("tilepack.toml")?;
//!     let surface = HeadlessSurface::new(EventLog::new());
//!
//!     let mut session = ExportSession::new(
//!         Arc::new(LocalTileExporter::default()),
//!         SessionSurfaces {
//!             overlay: Box::new(surface.clone()),
//!             progress: Box::new(surface.clone()),
//!             preview: Box::new(surface.clone()),
//!             messages: Box::new(surface),
//!         },
//!         SessionSettings::from_config(&config),
//!     );
//!
//!     let viewport = StaticViewport::new(Coord { x: 0.0, y: 51.0 }, 1280.0, 800.0, 10_000_000.0);
//!     session.on_viewport_changed(&viewport, true);
//!
//!     let (_cancel_tx, mut cancel_rx) = tokio::sync::watch::channel(false);
//!     session.request_export().await?;
//!     println!("Export finished: {}", session.supervise(&mut cancel_rx).await);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Tilepack uses the [`domain::TilepackError`] type for all errors:
//!
//! ```rust,no_run
//! use tilepack::domain::TilepackError;
//!
//! fn example() -> Result<(), TilepackError> {
//!     let config = tilepack::config::load_config("tilepack.toml")?;
//!     println!("Exporting to {}", config.export.working_directory);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Tilepack uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(progress = 40, "Export slowed down");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
