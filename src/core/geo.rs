use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Web Mercator projection constants
const EARTH_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate.
    ///
    /// Malformed input is rejected immediately rather than coerced: latitude
    /// must lie in [-90, 90] and longitude in [-180, 180], both finite.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !lng.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(MapError::InvalidCoordinates(format!(
                "({lat}, {lng}) is not a valid lat/lng pair"
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Creates a LatLng from raw values, clamping into the valid range.
    ///
    /// Used for coordinates that come out of the projection math, where small
    /// overshoots are expected and must not fail.
    pub fn clamped(lat: f64, lng: f64) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lng: Self::wrap_lng(lng),
        }
    }

    /// Calculates the distance to another LatLng using the Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to the projectable Web Mercator range
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn floor(&self) -> Point {
        Point::new(self.x.floor(), self.y.floor())
    }

    pub fn round(&self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Creates bounds from south-west and north-east corners.
    ///
    /// The corners must actually be ordered; swapped input is rejected at
    /// construction time.
    pub fn new(south_west: LatLng, north_east: LatLng) -> Result<Self> {
        if south_west.lat > north_east.lat || south_west.lng > north_east.lng {
            return Err(MapError::InvalidBounds(format!(
                "south-west corner ({}, {}) is not south-west of ({}, {})",
                south_west.lat, south_west.lng, north_east.lat, north_east.lng
            )));
        }
        Ok(Self {
            south_west,
            north_east,
        })
    }

    /// Creates bounds from any two opposite corners, normalizing their order.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng {
                lat: a.lat.min(b.lat),
                lng: a.lng.min(b.lng),
            },
            north_east: LatLng {
                lat: a.lat.max(b.lat),
                lng: a.lng.max(b.lng),
            },
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Result<Self> {
        Self::new(LatLng::new(south, west)?, LatLng::new(north, east)?)
    }

    /// The north-west corner, where a rectangular overlay anchors its element
    pub fn north_west(&self) -> LatLng {
        LatLng {
            lat: self.north_east.lat,
            lng: self.south_west.lng,
        }
    }

    /// The south-east corner
    pub fn south_east(&self) -> LatLng {
        LatLng {
            lat: self.south_west.lat,
            lng: self.north_east.lng,
        }
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::clamped(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}
