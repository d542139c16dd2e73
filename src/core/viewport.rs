use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6378137.0;

/// Manages the current view of the map: center, zoom, and screen dimensions.
///
/// This is the transform provider every positioned overlay leans on: it
/// converts geographic coordinates to layer-space pixel points and back, and
/// hands out the provisional point/scale pairs used mid zoom animation.
/// Conversions are stable for a fixed view state, so repeated calls within a
/// render frame agree with each other.
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
    /// Pixel origin for coordinate transformations (to avoid precision issues)
    pixel_origin: Option<Point>,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let mut viewport = Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
            pixel_origin: None,
        };
        viewport.update_pixel_origin();
        viewport
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
        self.update_pixel_origin();
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.update_pixel_origin();
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Gets the relative scale factor between the current zoom and a target
    /// zoom, as used by animated zoom transforms
    pub fn zoom_scale(&self, target_zoom: f64) -> f64 {
        2_f64.powf(target_zoom - self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// using the standard Web Mercator projection (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = 256.0 * 2_f64.powf(z);

        let lat = LatLng::clamp_lat(lat_lng.lat);
        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = ((std::f64::consts::PI / 4.0 + lat.to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;

        // Convert from raw Mercator coordinates to pixel coordinates at the given zoom
        let world = 2.0 * std::f64::consts::PI * EARTH_RADIUS;
        let pixel_x = (x + std::f64::consts::PI * EARTH_RADIUS) / world * scale;
        let pixel_y = (-y + std::f64::consts::PI * EARTH_RADIUS) / world * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom
    /// level (inverse Web Mercator)
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = 256.0 * 2_f64.powf(z);

        let world = 2.0 * std::f64::consts::PI * EARTH_RADIUS;
        let x = (pixel.x / scale) * world - std::f64::consts::PI * EARTH_RADIUS;
        let y = std::f64::consts::PI * EARTH_RADIUS - (pixel.y / scale) * world;

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::PI / 2.0).to_degrees();

        LatLng::clamped(lat, lng)
    }

    /// Gets or calculates the pixel origin for this viewport.
    /// Keeps pixel coordinates small to avoid precision issues.
    pub fn get_pixel_origin(&self) -> Point {
        self.pixel_origin
            .unwrap_or_else(|| self.project(&self.center, None).floor())
    }

    fn update_pixel_origin(&mut self) {
        self.pixel_origin = Some(self.project(&self.center, None).floor());
    }

    /// Converts LatLng to layer point (relative to pixel origin)
    pub fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point {
        let projected_point = self.project(lat_lng, None);
        projected_point.subtract(&self.get_pixel_origin())
    }

    /// Converts layer point back to LatLng
    pub fn layer_point_to_lat_lng(&self, point: &Point) -> LatLng {
        let projected_point = point.add(&self.get_pixel_origin());
        self.unproject(&projected_point, None)
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let layer_point = self.lat_lng_to_layer_point(lat_lng);
        Point::new(
            layer_point.x + self.size.x / 2.0,
            layer_point.y + self.size.y / 2.0,
        )
    }

    /// Converts container pixel coordinates back to a geographical coordinate
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let layer_point = Point::new(pixel.x - self.size.x / 2.0, pixel.y - self.size.y / 2.0);
        self.layer_point_to_lat_lng(&layer_point)
    }

    /// The pixel origin that would be in effect for a target zoom and center.
    /// Mirrors the origin calculation in `get_pixel_origin` so provisional
    /// points line up with the post-animation layout.
    fn new_pixel_origin(&self, center: &LatLng, zoom: f64) -> Point {
        self.project(center, Some(zoom)).floor()
    }

    /// Computes the layer point a coordinate will occupy once an animated
    /// zoom towards `zoom`/`center` completes. Usable mid-animation without a
    /// full layout pass.
    pub fn lat_lng_to_new_layer_point(&self, lat_lng: &LatLng, zoom: f64, center: &LatLng) -> Point {
        let projected = self.project(lat_lng, Some(zoom));
        projected.subtract(&self.new_pixel_origin(center, zoom))
    }

    /// Pans the viewport by the given pixel offset
    pub fn pan(&mut self, delta: Point) {
        let current_layer_point = self.lat_lng_to_layer_point(&self.center);
        let new_layer_point = current_layer_point.subtract(&delta);
        let new_center = self.layer_point_to_lat_lng(&new_layer_point);
        self.set_center(new_center);
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&Point::new(self.size.x, self.size.y));

        LatLngBounds::from_corners(nw, se)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::clamped(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
