use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    /// Moves the view to `center` at `zoom`, clamped to the allowed zoom range
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// World pixel coordinates of a position at the current zoom
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        lat_lng.to_world_pixel(self.zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::default(), 1.0, Point::new(1024.0, 768.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_view_clamps_zoom() {
        let mut viewport = Viewport::default();
        viewport.set_view(LatLng::new(32.0695, 34.7987), 25.0);
        assert_eq!(viewport.zoom, 18.0);
        assert_eq!(viewport.center, LatLng::new(32.0695, 34.7987));
    }

    #[test]
    fn test_projection_follows_zoom() {
        let center = LatLng::new(32.0695, 34.7987);
        let mut viewport = Viewport::new(center, 13.0, Point::new(800.0, 600.0));
        let at_13 = viewport.project(&center);
        viewport.set_view(center, 14.0);
        let at_14 = viewport.project(&center);
        assert!((at_14.x - 2.0 * at_13.x).abs() < 1e-6);
        assert!((at_14.y - 2.0 * at_13.y).abs() < 1e-6);
    }
}
