//! Fixed viewport for headless runs
//!
//! Converts screen points with an equirectangular approximation around the
//! viewport center: one pixel covers the same number of degrees on both axes.

use crate::adapters::traits::ViewportProjection;
use crate::domain::region::ScreenPoint;
use geo::Coord;

/// Metres per inch
const METERS_PER_INCH: f64 = 0.0254;

/// Nominal screen resolution used by map scale calculations
const SCREEN_DPI: f64 = 96.0;

/// Approximate metres per degree of arc
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Viewport described by its center, pixel size and map scale
#[derive(Debug, Clone, PartialEq)]
pub struct StaticViewport {
    center: Coord<f64>,
    width: f64,
    height: f64,
    scale: f64,
}

impl StaticViewport {
    pub fn new(center: Coord<f64>, width: f64, height: f64, scale: f64) -> Self {
        Self {
            center,
            width,
            height,
            scale,
        }
    }

    /// Degrees spanned by one screen pixel at the current scale
    pub fn degrees_per_pixel(&self) -> f64 {
        self.scale * METERS_PER_INCH / SCREEN_DPI / METERS_PER_DEGREE
    }
}

impl ViewportProjection for StaticViewport {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn to_map(&self, point: ScreenPoint) -> Coord<f64> {
        let step = self.degrees_per_pixel();
        // Screen y grows downwards
        Coord {
            x: self.center.x + (point.x - self.width / 2.0) * step,
            y: self.center.y - (point.y - self.height / 2.0) * step,
        }
    }
}
