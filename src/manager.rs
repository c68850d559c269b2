//! Road manager: turns route requests into tracked, drawn roads.
//!
//! Route fetches run on a fetch pool owned by the manager. Everything that
//! touches the tracked set or the map surface runs on the thread holding
//! `&mut RoadManager`, after the fetches it depends on have joined.

use rayon::prelude::*;

use crate::config::ManagerConfig;
use crate::error::{DrawError, NotFoundError, RoutingError};
use crate::geo::BoundingBox;
use crate::polyline::Polyline;
use crate::road::{IMPLICIT_ROAD_KEY, Road, RoadInfo, RoadRequest, TrackedRoads};
use crate::style::RoadStyle;
use crate::traits::{LineSpec, MapSurface, PrimitiveId, Route, RoutingClient, check_waypoints};

pub struct RoadManager<R, M> {
    client: R,
    surface: M,
    config: ManagerConfig,
    roads: TrackedRoads,
    pool: rayon::ThreadPool,
}

/// Geometry and metadata of a road about to be placed on the map.
struct Placement<'a> {
    key: &'a str,
    geometry: String,
    distance: Option<f64>,
    duration: Option<f64>,
    style: &'a RoadStyle,
}

impl<R, M> RoadManager<R, M>
where
    R: RoutingClient,
    M: MapSurface,
{
    pub fn new(client: R, surface: M, config: ManagerConfig) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.fetch_threads.max(1))
            .thread_name(|index| format!("route-fetch-{}", index))
            .build()?;

        Ok(Self {
            client,
            surface,
            config,
            roads: TrackedRoads::new(),
            pool,
        })
    }

    /// Fetches one route and draws it under the request's key.
    ///
    /// On failure nothing on the map changes, including any road already
    /// drawn under that key.
    pub fn draw_single_road(&mut self, request: &RoadRequest, fit_camera: bool) -> Result<RoadInfo, DrawError> {
        let client = &self.client;
        let route = self.pool.install(|| fetch(client, request))?;
        self.place_route(request, route, fit_camera)
    }

    /// Draws a caller supplied geometry without consulting the router.
    ///
    /// The geometry is decoded up front, so a malformed string fails
    /// before the map is touched.
    pub fn draw_manual_road(
        &mut self,
        key: Option<&str>,
        geometry: &str,
        style: &RoadStyle,
        fit_camera: bool,
    ) -> Result<(), DrawError> {
        let polyline = Polyline::decode(geometry, self.config.precision)?;
        let bounds = if fit_camera {
            Some(polyline.bounding_box()?)
        } else {
            None
        };

        self.place(
            Placement {
                key: key.unwrap_or(IMPLICIT_ROAD_KEY),
                geometry: geometry.to_string(),
                distance: None,
                duration: None,
                style,
            },
            bounds,
        );
        Ok(())
    }

    /// Fetches every route concurrently and draws each success.
    ///
    /// Returns one result per request, in request order. A failed request
    /// does not affect the others.
    pub fn draw_multiple_roads(&mut self, requests: &[RoadRequest]) -> Vec<Result<RoadInfo, DrawError>> {
        let client = &self.client;
        let fetched: Vec<Result<Route, RoutingError>> = self
            .pool
            .install(|| requests.par_iter().map(|request| fetch(client, request)).collect());

        let results: Vec<Result<RoadInfo, DrawError>> = requests
            .iter()
            .zip(fetched)
            .map(|(request, route)| {
                let route = route?;
                self.place_route(request, route, false)
            })
            .collect();

        let failed = results.iter().filter(|result| result.is_err()).count();
        tracing::info!(
            "drew {} of {} roads ({} failed)",
            results.len() - failed,
            results.len(),
            failed
        );

        results
    }

    /// Removes the road under `key`, or the most recently drawn road when
    /// no key is given.
    pub fn remove_road(&mut self, key: Option<&str>) -> Result<(), NotFoundError> {
        let road = match key {
            Some(key) => self
                .roads
                .remove(key)
                .ok_or_else(|| NotFoundError::Key(key.to_string()))?,
            None => self.roads.pop_last().ok_or(NotFoundError::Empty)?,
        };

        self.surface.remove_line(road.primitive);
        tracing::debug!("removed road `{}`", road.key);
        Ok(())
    }

    pub fn clear_all(&mut self) {
        let roads = self.roads.drain();
        for road in &roads {
            self.surface.remove_line(road.primitive);
        }
        if !roads.is_empty() {
            tracing::debug!("cleared {} roads", roads.len());
        }
    }

    pub fn lookup_road_by_primitive(&self, primitive: PrimitiveId) -> Option<&Road> {
        self.roads.find_by_primitive(primitive)
    }

    /// Host payload for a tap on a road line, if the line is a tracked road.
    pub fn road_picked(&self, primitive: PrimitiveId) -> Option<serde_json::Value> {
        self.lookup_road_by_primitive(primitive).map(Road::pick_payload)
    }

    pub fn zoom_to_region(&mut self, bounds: BoundingBox, padding: f64) {
        self.surface.fit_camera(bounds, padding);
    }

    /// Changes the color used by later draws that do not pick their own.
    pub fn set_default_color(&mut self, color: impl Into<String>) {
        self.config.default_style.color = color.into();
    }

    pub fn default_style(&self) -> &RoadStyle {
        &self.config.default_style
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn roads(&self) -> &TrackedRoads {
        &self.roads
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut M {
        &mut self.surface
    }

    pub fn client(&self) -> &R {
        &self.client
    }

    fn place_route(&mut self, request: &RoadRequest, route: Route, fit_camera: bool) -> Result<RoadInfo, DrawError> {
        let bounds = if fit_camera {
            Some(Polyline::decode(&route.geometry, self.config.precision)?.bounding_box()?)
        } else {
            None
        };

        let info = RoadInfo {
            distance: route.distance,
            duration: route.duration,
            encoded_geometry: route.geometry,
        };
        self.place(
            Placement {
                key: request.key(),
                geometry: info.encoded_geometry.clone(),
                distance: Some(info.distance),
                duration: Some(info.duration),
                style: &request.style,
            },
            bounds,
        );
        Ok(info)
    }

    /// Releases the road previously under the key, draws the new line,
    /// then fits the camera if `bounds` is given.
    fn place(&mut self, placement: Placement<'_>, bounds: Option<BoundingBox>) {
        if let Some(previous) = self.roads.remove(placement.key) {
            self.surface.remove_line(previous.primitive);
            tracing::debug!("replacing road `{}`", placement.key);
        }

        let primitive = self.surface.add_line(LineSpec {
            geometry: &placement.geometry,
            precision: self.config.precision,
            style: placement.style,
        });
        debug_assert!(self.roads.find_by_primitive(primitive).is_none());

        self.roads.push(Road {
            key: placement.key.to_string(),
            distance: placement.distance,
            duration: placement.duration,
            geometry: placement.geometry,
            style: placement.style.clone(),
            primitive,
        });
        tracing::debug!("drew road `{}` as {:?}", placement.key, primitive);

        if let Some(bounds) = bounds {
            self.surface.fit_camera(bounds, self.config.camera_padding);
        }
    }
}

fn fetch<R: RoutingClient>(client: &R, request: &RoadRequest) -> Result<Route, RoutingError> {
    let waypoints = request.waypoint_sequence();
    check_waypoints(&waypoints)?;

    tracing::debug!(
        "fetching {} route for `{}` through {} waypoints",
        request.mode.as_str(),
        request.key(),
        waypoints.len()
    );
    client
        .fetch_route(&waypoints, request.mode)
        .inspect_err(|err| tracing::warn!("route for `{}` failed: {}", request.key(), err))
}
