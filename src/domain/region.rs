//! Geographic region and view-space point types
//!
//! A [`GeoRegion`] is the axis-aligned bounding box scoped by a tile export.
//! It is always recomputed from the viewport rather than mutated in place.

use crate::domain::errors::TilepackError;
use crate::domain::Result;
use geo::{Coord, Rect};
use serde::Serialize;

/// A point in view (screen) space, measured in pixels from the top-left
/// corner of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned geographic bounding box in map-projection units
///
/// Construction normalizes the two corners, so `min` is component-wise less
/// than or equal to `max` no matter which corners were supplied.
///
/// # Examples
///
/// ```
/// use tilepack::domain::GeoRegion;
/// use geo::Coord;
///
/// let region = GeoRegion::from_corners(
///     Coord { x: 1.0, y: 52.0 },
///     Coord { x: -1.0, y: 50.0 },
/// ).unwrap();
///
/// assert_eq!(region.min(), Coord { x: -1.0, y: 50.0 });
/// assert_eq!(region.max(), Coord { x: 1.0, y: 52.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoRegion(Rect<f64>);

impl GeoRegion {
    /// Builds the region spanning two arbitrary corner coordinates
    ///
    /// # Errors
    ///
    /// Returns a validation error if any coordinate component is not finite.
    pub fn from_corners(a: Coord<f64>, b: Coord<f64>) -> Result<Self> {
        if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
            return Err(TilepackError::Validation(format!(
                "Region corners must be finite, got ({}, {}) and ({}, {})",
                a.x, a.y, b.x, b.y
            )));
        }
        Ok(Self(Rect::new(a, b)))
    }

    /// Lower-left corner (smallest x and y)
    pub fn min(&self) -> Coord<f64> {
        self.0.min()
    }

    /// Upper-right corner (largest x and y)
    pub fn max(&self) -> Coord<f64> {
        self.0.max()
    }

    pub fn width(&self) -> f64 {
        self.0.width()
    }

    pub fn height(&self) -> f64 {
        self.0.height()
    }

    pub fn center(&self) -> Coord<f64> {
        self.0.center()
    }

    /// Whether the coordinate lies inside or on the boundary of the region
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        let (min, max) = (self.min(), self.max());
        coord.x >= min.x && coord.x <= max.x && coord.y >= min.y && coord.y <= max.y
    }

    /// The underlying `geo` rectangle
    pub fn as_rect(&self) -> &Rect<f64> {
        &self.0
    }
}

impl std::fmt::Display for GeoRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (min, max) = (self.min(), self.max());
        write!(
            f,
            "(({:.6}, {:.6}), ({:.6}, {:.6}))",
            min.x, min.y, max.x, max.y
        )
    }
}
