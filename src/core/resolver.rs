//! Export parameter resolution
//!
//! Delegates to the exporting capability on a background task so the
//! orchestrating task never blocks on it.

use crate::adapters::traits::TileExporter;
use crate::domain::errors::TilepackError;
use crate::domain::params::ExportParameters;
use crate::domain::region::GeoRegion;
use crate::domain::Result;
use std::future::Future;
use std::sync::Arc;

/// Resolves the parameters needed to start an export
#[derive(Clone)]
pub struct ExportParameterResolver {
    exporter: Arc<dyn TileExporter>,
}

impl ExportParameterResolver {
    pub fn new(exporter: Arc<dyn TileExporter>) -> Self {
        Self { exporter }
    }

    /// Resolve export parameters for `region`
    ///
    /// Preconditions are checked before anything is scheduled. The returned
    /// future completes exactly once with either the parameters or an error.
    ///
    /// # Errors
    ///
    /// * `RegionUndefined` if no region has been derived yet
    /// * `Validation` if a scale is not a positive finite number
    /// * `Resolution` if the exporter fails or its task is interrupted
    pub fn resolve(
        &self,
        region: Option<GeoRegion>,
        current_scale: f64,
        max_allowed_scale: f64,
    ) -> impl Future<Output = Result<ExportParameters>> + Send + 'static {
        let exporter = Arc::clone(&self.exporter);

        async move {
            let region = region.ok_or(TilepackError::RegionUndefined)?;
            for (name, scale) in [
                ("current scale", current_scale),
                ("maximum scale", max_allowed_scale),
            ] {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(TilepackError::Validation(format!(
                        "The {name} must be positive, got {scale}"
                    )));
                }
            }

            tracing::debug!(
                region = %region,
                current_scale,
                max_allowed_scale,
                "Resolving export parameters"
            );

            let task = tokio::spawn(async move {
                exporter
                    .default_parameters(&region, current_scale, max_allowed_scale)
                    .await
            });

            match task.await {
                Ok(Ok(parameters)) => Ok(parameters),
                Ok(Err(e)) => Err(TilepackError::Resolution(e.to_string())),
                Err(join_error) => Err(TilepackError::Resolution(format!(
                    "Parameter resolution was interrupted: {join_error}"
                ))),
            }
        }
    }
}
