//! Web Mercator tile addressing
//!
//! XYZ tile scheme with the origin in the north-west corner. Longitude and
//! latitude are in degrees.

use crate::domain::region::GeoRegion;
use serde::Serialize;
use std::f64::consts::PI;

/// Latitude limit of the square Web Mercator world
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Range of tiles covering a region at one zoom level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileRange {
    pub zoom: u8,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl TileRange {
    /// Tiles at `zoom` that intersect `region`
    pub fn covering(region: &GeoRegion, zoom: u8) -> Self {
        let (min, max) = (region.min(), region.max());
        // North edge has the smaller y index
        let (min_x, min_y) = tile_for(min.x, max.y, zoom);
        let (max_x, max_y) = tile_for(max.x, min.y, zoom);
        Self {
            zoom,
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn tile_count(&self) -> u64 {
        let columns = u64::from(self.max_x - self.min_x) + 1;
        let rows = u64::from(self.max_y - self.min_y) + 1;
        columns * rows
    }

    /// Iterate tile `(x, y)` indices row by row
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.min_y..=self.max_y).flat_map(move |y| (self.min_x..=self.max_x).map(move |x| (x, y)))
    }
}

/// Tile index containing a longitude/latitude at `zoom`
pub fn tile_for(lon: f64, lat: f64, zoom: u8) -> (u32, u32) {
    let n = f64::from(1u32 << zoom);
    let last = (1u32 << zoom) - 1;

    let lon = lon.clamp(-180.0, 180.0);
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = ((lon + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    let clamp = |v: f64| (v.max(0.0) as u32).min(last);
    (clamp(x), clamp(y))
}
