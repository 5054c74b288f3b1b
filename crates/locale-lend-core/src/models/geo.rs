//! Geographic Models
//!
//! Coordinates are longitude-first everywhere, matching GeoJSON and the
//! document store's `2dsphere` point layout.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated point on the globe.
///
/// Construction rejects non-finite values and anything outside
/// `[-180, 180]` longitude or `[-90, 90]` latitude, so every `GeoPoint`
/// in circulation is safe to feed into distance math.
///
/// Serialized as a GeoJSON point:
///
/// ```json
/// { "type": "Point", "coordinates": [80.4365, 16.3067] }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Guntur, Andhra Pradesh. Used when the device location is unavailable.
    pub const GUNTUR: GeoPoint = GeoPoint {
        longitude: 80.4365,
        latitude: 16.3067,
    };

    /// Create a point from longitude and latitude, in that order.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidCoordinates(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidCoordinates(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        Ok(Self { longitude, latitude })
    }

    /// Create a point from a GeoJSON `[longitude, latitude]` pair.
    pub fn from_coordinates(coordinates: [f64; 2]) -> Result<Self> {
        Self::new(coordinates[0], coordinates[1])
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// The GeoJSON `[longitude, latitude]` pair.
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Great-circle distance to `other` in whole meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        crate::core::geo::haversine_distance(self, other)
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::GUNTUR
    }
}

/// GeoJSON geometry type tag. Only points are stored for items and users.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GeoJsonType {
    Point,
}

/// Wire shape of a GeoJSON point, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: GeoJsonType,

    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = Error;

    fn try_from(point: GeoJsonPoint) -> Result<Self> {
        GeoPoint::from_coordinates(point.coordinates)
    }
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        GeoJsonPoint {
            kind: GeoJsonType::Point,
            coordinates: point.coordinates(),
        }
    }
}
