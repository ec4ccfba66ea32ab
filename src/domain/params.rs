//! Export parameters and scale bounds
//!
//! Scales follow the map-scale convention: the denominator of `1:scale`.
//! A numerically larger scale is coarser (shows more ground).

use crate::domain::errors::TilepackError;
use crate::domain::region::GeoRegion;
use crate::domain::Result;
use serde::Serialize;

/// Ground scale of Web Mercator zoom level 0 at 96 DPI
pub const WEB_MERCATOR_LEVEL0_SCALE: f64 = 591_657_527.591_555;

/// Deepest zoom level the tile scheme defines
pub const MAX_LEVEL_OF_DETAIL: u8 = 23;

/// Scale bounds for an export
///
/// `min_scale` is the coarsest scale exported and `max_scale` the most
/// detailed, so `min_scale >= max_scale` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleRange {
    min_scale: f64,
    max_scale: f64,
}

impl ScaleRange {
    /// Builds the range spanned by two scales given in any order
    ///
    /// # Errors
    ///
    /// Returns a validation error if either scale is not a positive finite
    /// number.
    pub fn new(a: f64, b: f64) -> Result<Self> {
        for scale in [a, b] {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(TilepackError::Validation(format!(
                    "Scale must be a positive number, got {scale}"
                )));
            }
        }
        Ok(Self {
            min_scale: a.max(b),
            max_scale: a.min(b),
        })
    }

    /// Coarsest scale (numerically largest)
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// Most detailed scale (numerically smallest)
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Whether this range covers both `lower` and `upper` scales
    pub fn brackets(&self, lower: f64, upper: f64) -> bool {
        self.max_scale <= lower.min(upper) && self.min_scale >= lower.max(upper)
    }

    /// Web Mercator zoom levels whose nominal scale falls inside the range
    ///
    /// The coarse end rounds down and the detailed end rounds up so the
    /// export never stops short of the requested detail.
    pub fn levels_of_detail(&self) -> std::ops::RangeInclusive<u8> {
        let first = level_for_scale(self.min_scale).floor();
        let last = level_for_scale(self.max_scale).ceil();
        let clamp = |level: f64| level.clamp(0.0, MAX_LEVEL_OF_DETAIL as f64) as u8;
        clamp(first)..=clamp(last)
    }
}

/// Fractional zoom level matching a map scale
fn level_for_scale(scale: f64) -> f64 {
    (WEB_MERCATOR_LEVEL0_SCALE / scale).log2()
}

/// Immutable parameters required to start an export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportParameters {
    /// Region to export
    pub region: GeoRegion,

    /// Scale bounds to export
    pub scales: ScaleRange,
}

impl ExportParameters {
    pub fn new(region: GeoRegion, scales: ScaleRange) -> Self {
        Self { region, scales }
    }
}
