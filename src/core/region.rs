//! Download region tracking
//!
//! The region is derived from two view-space points inset from the top-left
//! and bottom-right viewport corners.

use crate::adapters::traits::{SelectionOverlay, ViewportProjection};
use crate::domain::region::{GeoRegion, ScreenPoint};

/// Default inset from the viewport edges, in pixels
pub const DEFAULT_INSET_PX: f64 = 200.0;

/// Tracks the download region as the viewport changes
pub struct RegionTracker {
    inset: f64,
    current: Option<GeoRegion>,
    overlay: Box<dyn SelectionOverlay>,
}

impl RegionTracker {
    pub fn new(inset: f64, overlay: Box<dyn SelectionOverlay>) -> Self {
        Self {
            inset,
            current: None,
            overlay,
        }
    }

    /// Recompute the region for the current viewport
    ///
    /// Returns `None` and leaves the previously drawn region untouched while
    /// the map has not finished loading. Otherwise the fresh region replaces
    /// the tracked one and is drawn on the overlay.
    pub fn on_viewport_changed(
        &mut self,
        viewport: &dyn ViewportProjection,
        map_ready: bool,
    ) -> Option<GeoRegion> {
        if !map_ready {
            return None;
        }

        let (width, height) = viewport.size();
        let (min_corner, max_corner) = self.corners(width, height);
        let first = viewport.to_map(min_corner);
        let second = viewport.to_map(max_corner);

        match GeoRegion::from_corners(first, second) {
            Ok(region) => {
                self.overlay.draw_region(&region);
                self.current = Some(region);
                tracing::trace!(region = %region, "Download region updated");
                Some(region)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Viewport produced an unusable region");
                None
            }
        }
    }

    /// Most recently derived region, if any
    pub fn current(&self) -> Option<GeoRegion> {
        self.current
    }

    /// Inset corner points, collapsed to the center when the viewport is
    /// smaller than twice the inset
    fn corners(&self, width: f64, height: f64) -> (ScreenPoint, ScreenPoint) {
        let inset_x = self.inset.min(width / 2.0);
        let inset_y = self.inset.min(height / 2.0);
        (
            ScreenPoint::new(inset_x, inset_y),
            ScreenPoint::new(width - inset_x, height - inset_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::headless::{EventLog, HeadlessSurface, UiEvent};
    use geo::Coord;

    /// One map unit per pixel, y pointing up, origin at the viewport's
    /// top-left corner
    struct PixelViewport {
        width: f64,
        height: f64,
    }

    impl ViewportProjection for PixelViewport {
        fn size(&self) -> (f64, f64) {
            (self.width, self.height)
        }

        fn scale(&self) -> f64 {
            10_000.0
        }

        fn to_map(&self, point: ScreenPoint) -> Coord<f64> {
            Coord {
                x: point.x,
                y: -point.y,
            }
        }
    }

    fn tracker() -> (RegionTracker, EventLog) {
        let log = EventLog::new();
        let tracker = RegionTracker::new(
            DEFAULT_INSET_PX,
            Box::new(HeadlessSurface::new(log.clone())),
        );
        (tracker, log)
    }

    #[test]
    fn test_region_from_inset_corners() {
        let (mut tracker, log) = tracker();
        let viewport = PixelViewport {
            width: 1000.0,
            height: 800.0,
        };

        let region = tracker.on_viewport_changed(&viewport, true).unwrap();
        assert_eq!(region.min(), Coord { x: 200.0, y: -600.0 });
        assert_eq!(region.max(), Coord { x: 800.0, y: -200.0 });
        assert_eq!(tracker.current(), Some(region));
        assert_eq!(log.events(), vec![UiEvent::RegionDrawn(region)]);
    }

    #[test]
    fn test_map_not_ready_keeps_previous_region() {
        let (mut tracker, log) = tracker();
        let viewport = PixelViewport {
            width: 1000.0,
            height: 800.0,
        };
        let first = tracker.on_viewport_changed(&viewport, true).unwrap();

        let moved = PixelViewport {
            width: 1200.0,
            height: 800.0,
        };
        assert_eq!(tracker.on_viewport_changed(&moved, false), None);
        assert_eq!(tracker.current(), Some(first));
        assert_eq!(log.events().len(), 1);
    }

    #[test]
    fn test_not_ready_before_first_load() {
        let (mut tracker, log) = tracker();
        let viewport = PixelViewport {
            width: 1000.0,
            height: 800.0,
        };
        assert_eq!(tracker.on_viewport_changed(&viewport, false), None);
        assert_eq!(tracker.current(), None);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_small_viewport_collapses_to_center() {
        let (mut tracker, _log) = tracker();
        let viewport = PixelViewport {
            width: 300.0,
            height: 100.0,
        };
        let region = tracker.on_viewport_changed(&viewport, true).unwrap();
        assert_eq!(region.min(), Coord { x: 150.0, y: -50.0 });
        assert_eq!(region.max(), region.min());
    }
}
