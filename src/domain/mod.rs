//! Domain models and types for Tilepack.
//!
//! The domain layer provides:
//! - **Identifiers** ([`JobId`])
//! - **Geography** ([`GeoRegion`], [`ScreenPoint`])
//! - **Export models** ([`ExportParameters`], [`ScaleRange`], [`ExportJob`], [`Artifact`])
//! - **Error types** ([`TilepackError`], [`JobError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TilepackError>`]:
//!
//! ```rust
//! use tilepack::domain::{Result, ScaleRange};
//!
//! fn example() -> Result<()> {
//!     let scales = ScaleRange::new(10_000_000.0, 500.0)?;
//!     assert!(scales.brackets(500.0, 10_000_000.0));
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod job;
pub mod params;
pub mod region;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{JobError, TilepackError};
pub use ids::JobId;
pub use job::{Artifact, ExportJob, JobOutcome, JobStatus};
pub use params::{ExportParameters, ScaleRange};
pub use region::{GeoRegion, ScreenPoint};
pub use result::Result;
