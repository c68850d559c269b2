//! Seams between the road manager and its collaborators.
//!
//! The routing backend and the map view are external: concrete hosts
//! implement these traits for their own SDKs.

use serde::{Deserialize, Serialize};

use crate::error::{PolylineError, RoutingError};
use crate::geo::{BoundingBox, Coordinate};
use crate::polyline::Polyline;
use crate::style::RoadStyle;

/// Travel mode for a route request.
///
/// Unknown names fall back to [`RouteMode::Car`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum RouteMode {
    #[default]
    Car,
    Bike,
    Foot,
}

impl RouteMode {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "car" => RouteMode::Car,
            "bike" => RouteMode::Bike,
            "foot" => RouteMode::Foot,
            other => {
                tracing::warn!("unknown road type `{}`, falling back to car", other);
                RouteMode::Car
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMode::Car => "car",
            RouteMode::Bike => "bike",
            RouteMode::Foot => "foot",
        }
    }
}

impl From<String> for RouteMode {
    fn from(name: String) -> Self {
        RouteMode::from_name(&name)
    }
}

/// A computed route as returned by a routing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Total distance in meters.
    pub distance: f64,
    /// Total duration in seconds.
    pub duration: f64,
    /// Full path encoded at [`crate::polyline::DEFAULT_PRECISION`].
    pub geometry: String,
}

/// Computes routes through ordered waypoints.
///
/// Calls block until the backend answers; the manager runs them on its own
/// fetch pool, so implementations must be shareable across threads.
pub trait RoutingClient: Send + Sync {
    fn fetch_route(&self, waypoints: &[Coordinate], mode: RouteMode) -> Result<Route, RoutingError>;
}

/// Rejects sequences a backend cannot route: fewer than 2 waypoints, or a
/// waypoint outside WGS84 range.
pub fn check_waypoints(waypoints: &[Coordinate]) -> Result<(), RoutingError> {
    if waypoints.len() < 2 {
        return Err(RoutingError::InvalidWaypoints {
            count: waypoints.len(),
        });
    }
    match waypoints.iter().position(|point| !point.is_valid()) {
        Some(index) => Err(RoutingError::InvalidCoordinate {
            index,
            lat: waypoints[index].lat,
            lng: waypoints[index].lng,
        }),
        None => Ok(()),
    }
}

impl<T: RoutingClient + ?Sized> RoutingClient for std::sync::Arc<T> {
    fn fetch_route(&self, waypoints: &[Coordinate], mode: RouteMode) -> Result<Route, RoutingError> {
        (**self).fetch_route(waypoints, mode)
    }
}

/// Opaque handle to a line drawn on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimitiveId(pub u64);

/// A styled line to draw.
#[derive(Debug, Clone, Copy)]
pub struct LineSpec<'a> {
    pub geometry: &'a str,
    pub precision: u32,
    pub style: &'a RoadStyle,
}

impl LineSpec<'_> {
    /// Styling string understood by the vector map scene.
    pub fn styling(&self) -> String {
        self.style.styling_string()
    }

    pub fn path(&self) -> Result<Polyline, PolylineError> {
        Polyline::decode(self.geometry, self.precision)
    }
}

/// The part of the map view the road manager drives.
///
/// Only called from the thread owning the manager.
pub trait MapSurface {
    fn add_line(&mut self, line: LineSpec<'_>) -> PrimitiveId;

    fn remove_line(&mut self, primitive: PrimitiveId);

    /// Moves the camera so `bounds` fits with `padding` on each side.
    fn fit_camera(&mut self, bounds: BoundingBox, padding: f64);
}
