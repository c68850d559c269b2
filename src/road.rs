//! Road records and the keyed set the manager tracks them in.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::style::RoadStyle;
use crate::traits::{PrimitiveId, RouteMode};

/// Key used when a draw request does not name its road.
pub const IMPLICIT_ROAD_KEY: &str = "road";

/// Summary returned to the caller after a routed draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadInfo {
    pub distance: f64,
    pub duration: f64,
    #[serde(rename = "routePoints")]
    pub encoded_geometry: String,
}

/// One route to compute and draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRequest {
    pub key: Option<String>,
    pub waypoints: Vec<Coordinate>,
    /// Via points, already in traversal order.
    pub intermediate_points: Vec<Coordinate>,
    pub mode: RouteMode,
    pub style: RoadStyle,
}

impl RoadRequest {
    pub fn new(key: impl Into<String>, waypoints: Vec<Coordinate>) -> Self {
        Self {
            key: Some(key.into()),
            waypoints,
            intermediate_points: Vec::new(),
            mode: RouteMode::Car,
            style: RoadStyle::default(),
        }
    }

    pub fn with_intermediate_points(mut self, points: Vec<Coordinate>) -> Self {
        self.intermediate_points = points;
        self
    }

    pub fn with_mode(mut self, mode: RouteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_style(mut self, style: RoadStyle) -> Self {
        self.style = style;
        self
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(IMPLICIT_ROAD_KEY)
    }

    /// Waypoints sent to the router: intermediate points are spliced in
    /// right after the origin, not at their geometric position.
    pub fn waypoint_sequence(&self) -> Vec<Coordinate> {
        let mut sequence = Vec::with_capacity(self.waypoints.len() + self.intermediate_points.len());
        if let Some((origin, rest)) = self.waypoints.split_first() {
            sequence.push(*origin);
            sequence.extend_from_slice(&self.intermediate_points);
            sequence.extend_from_slice(rest);
        } else {
            sequence.extend_from_slice(&self.intermediate_points);
        }
        sequence
    }
}

/// A road drawn on the map.
///
/// Manual roads carry no distance or duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub key: String,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    pub geometry: String,
    pub style: RoadStyle,
    pub primitive: PrimitiveId,
}

impl Road {
    pub fn info(&self) -> Option<RoadInfo> {
        Some(RoadInfo {
            distance: self.distance?,
            duration: self.duration?,
            encoded_geometry: self.geometry.clone(),
        })
    }

    /// Payload sent to the host when the road's line is tapped.
    pub fn pick_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "key": self.key,
            "distance": self.distance.unwrap_or(0.0),
            "duration": self.duration.unwrap_or(0.0),
            "routePoints": self.geometry,
        })
    }
}

/// Key to road mapping in insertion order.
///
/// The last element is the most recently inserted road.
#[derive(Debug, Default)]
pub struct TrackedRoads {
    roads: Vec<Road>,
}

impl TrackedRoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `road`. The caller removes any road under the same key first.
    pub(crate) fn push(&mut self, road: Road) {
        debug_assert!(self.get(&road.key).is_none());
        self.roads.push(road);
    }

    pub fn get(&self, key: &str) -> Option<&Road> {
        self.roads.iter().find(|road| road.key == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Road> {
        let index = self.roads.iter().position(|road| road.key == key)?;
        Some(self.roads.remove(index))
    }

    pub fn pop_last(&mut self) -> Option<Road> {
        self.roads.pop()
    }

    pub fn last(&self) -> Option<&Road> {
        self.roads.last()
    }

    pub fn drain(&mut self) -> Vec<Road> {
        std::mem::take(&mut self.roads)
    }

    pub fn find_by_primitive(&self, primitive: PrimitiveId) -> Option<&Road> {
        self.roads.iter().find(|road| road.primitive == primitive)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.roads.iter().map(|road| road.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Road> {
        self.roads.iter()
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }
}
