//! Road manager configuration.

use serde::{Deserialize, Serialize};

use crate::polyline::DEFAULT_PRECISION;
use crate::style::RoadStyle;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Style applied to fields a draw request leaves out.
    pub default_style: RoadStyle,
    /// Camera padding on each side when fitting to a road.
    pub camera_padding: f64,
    /// Decimal precision of encoded geometries.
    pub precision: u32,
    /// Worker threads used to fetch routes concurrently.
    pub fetch_threads: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_style: RoadStyle::default(),
            camera_padding: 25.0,
            precision: DEFAULT_PRECISION,
            fetch_threads: 4,
        }
    }
}
