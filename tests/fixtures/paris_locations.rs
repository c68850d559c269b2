//! Real Paris locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use map_roads::geo::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coord(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

pub const LANDMARKS: &[Location] = &[
    Location::new("Tour Eiffel", 48.8582599, 2.2945006),
    Location::new("Louvre", 48.8611473, 2.3380277),
    Location::new("Notre-Dame", 48.8529372, 2.3500386),
    Location::new("Sacre-Coeur", 48.8867148, 2.3430851),
    Location::new("Arc de Triomphe", 48.8737917, 2.2950275),
    Location::new("Pantheon", 48.8461978, 2.3460793),
];

pub const STATIONS: &[Location] = &[
    Location::new("Gare du Nord", 48.8809481, 2.3553137),
    Location::new("Gare de Lyon", 48.8443038, 2.3743773),
    Location::new("Gare Montparnasse", 48.8412897, 2.3209016),
    Location::new("Gare Saint-Lazare", 48.8763827, 2.3253558),
];

pub fn landmark(name: &str) -> Coordinate {
    LANDMARKS
        .iter()
        .chain(STATIONS)
        .find(|location| location.name == name)
        .map(Location::coord)
        .unwrap_or_else(|| panic!("unknown fixture location {}", name))
}
