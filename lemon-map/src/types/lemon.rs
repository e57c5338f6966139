use egui::Color32;
use serde::{Deserialize, Serialize};
use walkers::Position;

use super::{parse_hex_color, DEFAULT_LEMON_COLOR};

/// A point of interest as served by the lemons endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lemon {
    pub id: i64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub content: String,
}

impl Lemon {
    pub fn position(&self) -> Position {
        Position::from_lat_lon(self.latitude, self.longitude)
    }

    /// The hex colour for this lemon's marker, `#FFC700` when none was sent.
    pub fn color_or_default(&self) -> &str {
        match self.color.as_deref() {
            Some(color) if !color.trim().is_empty() => color,
            _ => DEFAULT_LEMON_COLOR,
        }
    }

    /// Whether the colour sent by the endpoint could be used as is.
    pub fn has_valid_color(&self) -> bool {
        parse_hex_color(self.color_or_default()).is_some()
    }

    pub fn marker_color(&self) -> Color32 {
        parse_hex_color(self.color_or_default())
            .or_else(|| parse_hex_color(DEFAULT_LEMON_COLOR))
            .unwrap_or(Color32::YELLOW)
    }
}
