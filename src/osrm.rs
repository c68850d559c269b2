//! OSRM HTTP adapter for routes.

use serde::Deserialize;

use crate::error::RoutingError;
use crate::geo::Coordinate;
use crate::traits::{Route, RouteMode, RoutingClient, check_waypoints};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub car_profile: String,
    pub bike_profile: String,
    pub foot_profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            car_profile: "car".to_string(),
            bike_profile: "bike".to_string(),
            foot_profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Defaults overridden by `OSRM_BASE_URL` and `OSRM_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("OSRM_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(timeout) = std::env::var("OSRM_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.timeout_secs = timeout;
        }
        config
    }

    pub fn profile(&self, mode: RouteMode) -> &str {
        match mode {
            RouteMode::Car => &self.car_profile,
            RouteMode::Bike => &self.bike_profile,
            RouteMode::Foot => &self.foot_profile,
        }
    }

    /// `/route/v1` URL with full overview geometry at precision 5.
    pub fn route_url(&self, waypoints: &[Coordinate], mode: RouteMode) -> String {
        let coords = waypoints
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=polyline&steps=false",
            self.base_url.trim_end_matches('/'),
            self.profile(mode),
            coords
        )
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }
}

impl RoutingClient for OsrmClient {
    fn fetch_route(&self, waypoints: &[Coordinate], mode: RouteMode) -> Result<Route, RoutingError> {
        check_waypoints(waypoints)?;

        let url = self.config.route_url(waypoints, mode);
        // OSRM answers routing failures with a 400 and a JSON body
        let body = self.client.get(url).send()?.json::<OsrmRouteResponse>()?;
        body.into_route()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: String,
}

impl OsrmRouteResponse {
    fn into_route(self) -> Result<Route, RoutingError> {
        let message = self.message.unwrap_or_else(|| self.code.clone());
        match self.code.as_str() {
            "Ok" => self
                .routes
                .into_iter()
                .next()
                .map(|route| Route {
                    distance: route.distance.max(0.0),
                    duration: route.duration.max(0.0),
                    geometry: route.geometry,
                })
                .ok_or_else(|| RoutingError::NoRoute("empty route list".to_string())),
            "NoRoute" | "NoSegment" => Err(RoutingError::NoRoute(message)),
            _ => Err(RoutingError::Backend(message)),
        }
    }
}
