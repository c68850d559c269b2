//! Straight line router (fallback when OSRM unavailable).
//!
//! Joins the waypoints with great-circle segments and estimates travel time
//! from an assumed speed per mode. Less accurate than OSRM (ignores roads)
//! but always available.

use crate::error::RoutingError;
use crate::geo::Coordinate;
use crate::polyline::{DEFAULT_PRECISION, Polyline};
use crate::traits::{Route, RouteMode, RoutingClient, check_waypoints};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct StraightLineRouter {
    pub car_speed_kmh: f64,
    pub bike_speed_kmh: f64,
    pub foot_speed_kmh: f64,
}

impl Default for StraightLineRouter {
    fn default() -> Self {
        Self {
            car_speed_kmh: 40.0,
            bike_speed_kmh: 15.0,
            foot_speed_kmh: 5.0,
        }
    }
}

impl StraightLineRouter {
    pub fn speed_kmh(&self, mode: RouteMode) -> f64 {
        match mode {
            RouteMode::Car => self.car_speed_kmh,
            RouteMode::Bike => self.bike_speed_kmh,
            RouteMode::Foot => self.foot_speed_kmh,
        }
    }
}

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

impl RoutingClient for StraightLineRouter {
    fn fetch_route(&self, waypoints: &[Coordinate], mode: RouteMode) -> Result<Route, RoutingError> {
        check_waypoints(waypoints)?;
        let speed = self.speed_kmh(mode);
        if speed.is_nan() || speed <= 0.0 {
            return Err(RoutingError::Backend(format!(
                "no positive speed configured for {}",
                mode.as_str()
            )));
        }

        let km: f64 = waypoints
            .windows(2)
            .map(|pair| haversine_km(pair[0], pair[1]))
            .sum();

        Ok(Route {
            distance: km * 1000.0,
            duration: (km / speed * 3600.0).round(),
            geometry: Polyline::new(waypoints.to_vec()).encode(DEFAULT_PRECISION),
        })
    }
}
