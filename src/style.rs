//! Road line styling.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROAD_COLOR: &str = "#ff0000";
pub const DEFAULT_ROAD_WIDTH: &str = "5px";

/// Draw order of road lines in the scene, below markers.
const ROAD_ORDER: u32 = 1500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadStyle {
    /// Hex (`#rrggbb`) or named color.
    pub color: String,
    pub width: String,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub border_width: Option<String>,
}

impl Default for RoadStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_ROAD_COLOR.to_string(),
            width: DEFAULT_ROAD_WIDTH.to_string(),
            border_color: None,
            border_width: None,
        }
    }
}

impl RoadStyle {
    pub fn new(color: impl Into<String>, width: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            width: width.into(),
            border_color: None,
            border_width: None,
        }
    }

    pub fn with_border(mut self, color: impl Into<String>, width: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self.border_width = Some(width.into());
        self
    }

    /// Scene styling for the line. A border without its own color reuses
    /// the line color.
    pub fn styling_string(&self) -> String {
        let mut styling = format!(
            "{{ style: 'lines', interactive: true, color: '{}', width: {}, order: {}",
            self.color, self.width, ROAD_ORDER
        );
        if let Some(border_width) = &self.border_width {
            let border_color = self.border_color.as_deref().unwrap_or(&self.color);
            styling.push_str(&format!(
                ", outline: {{ color: '{}', width: {} }}",
                border_color, border_width
            ));
        }
        styling.push_str(" }");
        styling
    }
}
