//! Recording doubles for the routing backend and the map surface.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use map_roads::error::RoutingError;
use map_roads::geo::{BoundingBox, Coordinate};
use map_roads::haversine::StraightLineRouter;
use map_roads::traits::{LineSpec, MapSurface, PrimitiveId, Route, RouteMode, RoutingClient};

#[derive(Debug, Clone, PartialEq)]
pub struct RouterCall {
    pub waypoints: Vec<Coordinate>,
    pub mode: RouteMode,
}

type Respond = dyn Fn(&[Coordinate], RouteMode) -> Result<Route, RoutingError> + Send + Sync;

/// Router answering through a closure and logging every call.
pub struct ScriptedRouter {
    respond: Box<Respond>,
    calls: Mutex<Vec<RouterCall>>,
}

impl ScriptedRouter {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&[Coordinate], RouteMode) -> Result<Route, RoutingError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same route.
    pub fn fixed(distance: f64, duration: f64, geometry: &str) -> Self {
        let geometry = geometry.to_string();
        Self::new(move |_, _| {
            Ok(Route {
                distance,
                duration,
                geometry: geometry.clone(),
            })
        })
    }

    /// Straight line routes through the requested waypoints.
    pub fn straight() -> Self {
        let router = StraightLineRouter::default();
        Self::new(move |waypoints, mode| router.fetch_route(waypoints, mode))
    }

    pub fn failing() -> Self {
        Self::new(|_, _| Err(RoutingError::NoRoute("scripted failure".to_string())))
    }

    pub fn calls(&self) -> Vec<RouterCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl RoutingClient for ScriptedRouter {
    fn fetch_route(&self, waypoints: &[Coordinate], mode: RouteMode) -> Result<Route, RoutingError> {
        self.calls.lock().unwrap().push(RouterCall {
            waypoints: waypoints.to_vec(),
            mode,
        });
        (self.respond)(waypoints, mode)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Added(PrimitiveId),
    Removed(PrimitiveId),
    Fit(BoundingBox, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveLine {
    pub geometry: String,
    pub styling: String,
}

/// Map surface keeping its live lines and every call it received.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    pub live: BTreeMap<PrimitiveId, LiveLine>,
    pub events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn fits(&self) -> Vec<(BoundingBox, f64)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Fit(bounds, padding) => Some((*bounds, *padding)),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    fn add_line(&mut self, line: LineSpec<'_>) -> PrimitiveId {
        self.next_id += 1;
        let id = PrimitiveId(self.next_id);
        self.live.insert(
            id,
            LiveLine {
                geometry: line.geometry.to_string(),
                styling: line.styling(),
            },
        );
        self.events.push(SurfaceEvent::Added(id));
        id
    }

    fn remove_line(&mut self, primitive: PrimitiveId) {
        assert!(
            self.live.remove(&primitive).is_some(),
            "released {:?} which is not live",
            primitive
        );
        self.events.push(SurfaceEvent::Removed(primitive));
    }

    fn fit_camera(&mut self, bounds: BoundingBox, padding: f64) {
        self.events.push(SurfaceEvent::Fit(bounds, padding));
    }
}

/// Surface shared with the test while a controller thread drives it.
#[derive(Debug, Clone, Default)]
pub struct SharedSurface(pub Arc<Mutex<RecordingSurface>>);

impl SharedSurface {
    pub fn live_count(&self) -> usize {
        self.0.lock().unwrap().live.len()
    }

    pub fn fits(&self) -> Vec<(BoundingBox, f64)> {
        self.0.lock().unwrap().fits()
    }
}

impl MapSurface for SharedSurface {
    fn add_line(&mut self, line: LineSpec<'_>) -> PrimitiveId {
        self.0.lock().unwrap().add_line(line)
    }

    fn remove_line(&mut self, primitive: PrimitiveId) {
        self.0.lock().unwrap().remove_line(primitive)
    }

    fn fit_camera(&mut self, bounds: BoundingBox, padding: f64) {
        self.0.lock().unwrap().fit_camera(bounds, padding)
    }
}
