//! Method channel surface: typed payloads for the host's road commands.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ChannelError;
use crate::geo::{BoundingBox, Coordinate};
use crate::manager::RoadManager;
use crate::road::RoadRequest;
use crate::style::RoadStyle;
use crate::traits::{MapSurface, PrimitiveId, RouteMode, RoutingClient};

pub const ROAD: &str = "road";
pub const DRAW_MULTI_ROAD: &str = "draw#multi#road";
pub const DRAW_ROAD_MANUALLY: &str = "drawRoad#manually";
pub const DELETE_ROAD: &str = "delete#road";
pub const CLEAR_ROADS: &str = "clear#roads";
pub const ZOOM_TO_REGION: &str = "zoomToRegion";
pub const SET_DEFAULT_ROAD_COLOR: &str = "road#defaultColor";
pub const GET_ROADS: &str = "get#roads";
pub const ROAD_PICKED: &str = "road#picked";

/// A call from the host: a method name and its payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    fn arguments<T: DeserializeOwned>(&self) -> Result<T, ChannelError> {
        T::deserialize(&self.arguments).map_err(|err| {
            ChannelError::bad_request(format!("invalid arguments for `{}`: {}", self.method, err))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoadArgs {
    #[serde(default)]
    key: Option<String>,
    way_points: Vec<Coordinate>,
    #[serde(default)]
    middle_points: Vec<Coordinate>,
    #[serde(default)]
    road_type: RouteMode,
    #[serde(flatten)]
    style: StyleArgs,
    #[serde(default)]
    zoom_into_region: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualRoadArgs {
    #[serde(default)]
    key: Option<String>,
    road: String,
    #[serde(flatten)]
    style: StyleArgs,
    #[serde(default)]
    zoom_into_region: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StyleArgs {
    road_color: Option<String>,
    road_width: Option<String>,
    road_border_color: Option<String>,
    road_border_width: Option<String>,
}

impl StyleArgs {
    fn into_style(self, defaults: &RoadStyle) -> RoadStyle {
        RoadStyle {
            color: self.road_color.unwrap_or_else(|| defaults.color.clone()),
            width: self.road_width.unwrap_or_else(|| defaults.width.clone()),
            border_color: self.road_border_color.or_else(|| defaults.border_color.clone()),
            border_width: self.road_border_width.or_else(|| defaults.border_width.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RegionArgs {
    north: f64,
    east: f64,
    south: f64,
    west: f64,
    #[serde(default)]
    padding: Option<f64>,
}

impl RoadArgs {
    fn into_request(self, defaults: &RoadStyle) -> (RoadRequest, bool) {
        let request = RoadRequest {
            key: self.key,
            waypoints: self.way_points,
            intermediate_points: self.middle_points,
            mode: self.road_type,
            style: self.style.into_style(defaults),
        };
        (request, self.zoom_into_region)
    }
}

/// Runs one host call against the manager.
pub fn dispatch<R, M>(manager: &mut RoadManager<R, M>, call: &MethodCall) -> Result<Value, ChannelError>
where
    R: RoutingClient,
    M: MapSurface,
{
    match call.method.as_str() {
        ROAD => {
            let args: RoadArgs = call.arguments()?;
            let (request, fit_camera) = args.into_request(manager.default_style());
            let info = manager
                .draw_single_road(&request, fit_camera)
                .map_err(|err| ChannelError::new(ChannelError::ROAD_FAILED, format!("error to draw road: {}", err)))?;
            Ok(serde_json::to_value(info)?)
        }
        DRAW_MULTI_ROAD => {
            let args: Vec<RoadArgs> = call.arguments()?;
            let requests: Vec<RoadRequest> = args
                .into_iter()
                .map(|args| args.into_request(manager.default_style()).0)
                .collect();

            let results = manager.draw_multiple_roads(&requests);
            if !results.is_empty() && results.iter().all(Result::is_err) {
                return Err(ChannelError::new(
                    ChannelError::ROAD_FAILED,
                    "error to draw multiple road",
                ));
            }

            let entries = results
                .into_iter()
                .map(|result| match result {
                    Ok(info) => serde_json::to_value(info),
                    Err(_) => Ok(Value::Null),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(entries))
        }
        DRAW_ROAD_MANUALLY => {
            let args: ManualRoadArgs = call.arguments()?;
            let style = args.style.into_style(manager.default_style());
            manager
                .draw_manual_road(args.key.as_deref(), &args.road, &style, args.zoom_into_region)
                .map_err(|err| ChannelError::new(ChannelError::ROAD_FAILED, format!("error to draw road: {}", err)))?;
            Ok(Value::Null)
        }
        DELETE_ROAD => {
            let key: Option<String> = call.arguments()?;
            manager.remove_road(key.as_deref())?;
            Ok(Value::Null)
        }
        CLEAR_ROADS => {
            manager.clear_all();
            Ok(Value::Null)
        }
        ZOOM_TO_REGION => {
            let args: RegionArgs = call.arguments()?;
            let padding = args.padding.unwrap_or(manager.config().camera_padding);
            manager.zoom_to_region(
                BoundingBox::from_edges(args.north, args.east, args.south, args.west),
                padding,
            );
            Ok(Value::Null)
        }
        SET_DEFAULT_ROAD_COLOR => {
            let color: String = call.arguments()?;
            manager.set_default_color(color);
            Ok(Value::Null)
        }
        GET_ROADS => Ok(Value::from(manager.roads().keys().collect::<Vec<_>>())),
        ROAD_PICKED => {
            let primitive: u64 = call.arguments()?;
            Ok(manager.road_picked(PrimitiveId(primitive)).unwrap_or(Value::Null))
        }
        other => Err(ChannelError::new(
            ChannelError::UNKNOWN_METHOD,
            format!("unknown method `{}`", other),
        )),
    }
}
