//! Error taxonomy for geometry, routing and road management.

use thiserror::Error;

/// An encoded polyline could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("malformed polyline at byte {position}")]
    Malformed { position: usize },
    #[error("polyline truncated after {position} bytes")]
    Truncated { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("bounding box of an empty coordinate set is undefined")]
    EmptyInput,
}

/// Failure reported by a [`crate::traits::RoutingClient`].
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no route found: {0}")]
    NoRoute(String),
    #[error("a route needs at least 2 waypoints, got {count}")]
    InvalidWaypoints { count: usize },
    #[error("waypoint {index} is not a valid coordinate ({lat}, {lng})")]
    InvalidCoordinate { index: usize, lat: f64, lng: f64 },
    #[error("routing backend error: {0}")]
    Backend(String),
}

/// A road could not be produced or displayed for a key.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    Encoding(#[from] PolylineError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("no road tracked under key `{0}`")]
    Key(String),
    #[error("no road is tracked")]
    Empty,
}

/// Error returned over the method channel.
///
/// `code` mirrors what the host side matches on ("400" for road failures).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ChannelError {
    pub code: String,
    pub message: String,
}

impl ChannelError {
    pub const ROAD_FAILED: &'static str = "400";
    pub const NOT_FOUND: &'static str = "404";
    pub const BAD_REQUEST: &'static str = "bad-request";
    pub const UNKNOWN_METHOD: &'static str = "unknown-method";
    pub const UNAVAILABLE: &'static str = "unavailable";

    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(Self::BAD_REQUEST, message)
    }
}

impl From<serde_json::Error> for ChannelError {
    fn from(err: serde_json::Error) -> Self {
        ChannelError::bad_request(err.to_string())
    }
}

impl From<NotFoundError> for ChannelError {
    fn from(err: NotFoundError) -> Self {
        ChannelError::new(Self::NOT_FOUND, err.to_string())
    }
}
