use crate::constants::{MAX_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, Point, EARTH_RADIUS};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Half the width of the Web Mercator world in metres.
const HALF_WORLD: f64 = PI * EARTH_RADIUS;

/// The current view of the map: center, zoom, and container dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the map container in pixels
    pub size: Point,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, MAX_ZOOM),
            size,
        }
    }

    /// Sets the container size, e.g. after the host element was resized
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates at the current zoom (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let scale = self.scale();
        let meters = LatLng::new(LatLng::clamp_lat(lat_lng.lat), lat_lng.lng).to_mercator();

        Point::new(
            (meters.x + HALF_WORLD) / (2.0 * HALF_WORLD) * scale,
            (-meters.y + HALF_WORLD) / (2.0 * HALF_WORLD) * scale,
        )
    }

    /// Converts world pixel coordinates to projected map coordinates (metres)
    pub fn world_pixel_to_coordinate(&self, pixel: &Point) -> Point {
        let scale = self.scale();
        Point::new(
            pixel.x / scale * (2.0 * HALF_WORLD) - HALF_WORLD,
            HALF_WORLD - pixel.y / scale * (2.0 * HALF_WORLD),
        )
    }

    /// Converts a container-relative pixel (e.g. a pointer offset) into the
    /// projected map coordinate underneath it
    pub fn container_point_to_coordinate(&self, point: &Point) -> Point {
        let origin = self.project(&self.center);
        let half = Point::new(self.size.x / 2.0, self.size.y / 2.0);
        let world = origin.add(&point.subtract(&half));
        self.world_pixel_to_coordinate(&world)
    }

    /// Converts screen pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        LatLng::from_mercator(self.container_point_to_coordinate(pixel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yarmouth() -> Viewport {
        Viewport::new(
            LatLng::from_lon_lat(-66.1174, 43.8375),
            12.0,
            Point::new(800.0, 600.0),
        )
    }

    #[test]
    fn test_zoom_is_clamped() {
        let viewport = Viewport::new(LatLng::default(), 40.0, Point::new(1.0, 1.0));
        assert_eq!(viewport.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_container_center_maps_to_view_center() {
        let viewport = yarmouth();
        let coordinate = viewport.container_point_to_coordinate(&Point::new(400.0, 300.0));
        let expected = viewport.center.to_mercator();

        assert!((coordinate.x - expected.x).abs() < 1e-6);
        assert!((coordinate.y - expected.y).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_offsets_move_east_and_south() {
        let viewport = yarmouth();
        let center = viewport.pixel_to_lat_lng(&Point::new(400.0, 300.0));
        let south_east = viewport.pixel_to_lat_lng(&Point::new(500.0, 400.0));

        assert!(south_east.lng > center.lng);
        assert!(south_east.lat < center.lat);
    }
}
