//! Coordinates and bounding boxes.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(rename = "lon", alias = "lng", alias = "longitude")]
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite, with latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        (coord.lat, coord.lng)
    }
}

/// Axis-aligned box given by its southwest and northeast corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub southwest: Coordinate,
    pub northeast: Coordinate,
}

impl BoundingBox {
    pub fn new(southwest: Coordinate, northeast: Coordinate) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    /// Box from the `north/east/south/west` edges used by the host.
    pub fn from_edges(north: f64, east: f64, south: f64, west: f64) -> Self {
        Self {
            southwest: Coordinate::new(south, west),
            northeast: Coordinate::new(north, east),
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        point.lat >= self.southwest.lat
            && point.lat <= self.northeast.lat
            && point.lng >= self.southwest.lng
            && point.lng <= self.northeast.lng
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.southwest.lat + self.northeast.lat) / 2.0,
            (self.southwest.lng + self.northeast.lng) / 2.0,
        )
    }
}

/// Min/max reduction over both axes.
///
/// A single point yields a degenerate box with both corners on that point.
pub fn bounding_box(coordinates: &[Coordinate]) -> Result<BoundingBox, GeometryError> {
    let (first, rest) = coordinates.split_first().ok_or(GeometryError::EmptyInput)?;

    let mut southwest = *first;
    let mut northeast = *first;
    for point in rest {
        southwest.lat = southwest.lat.min(point.lat);
        southwest.lng = southwest.lng.min(point.lng);
        northeast.lat = northeast.lat.max(point.lat);
        northeast.lng = northeast.lng.max(point.lng);
    }

    Ok(BoundingBox {
        southwest,
        northeast,
    })
}
