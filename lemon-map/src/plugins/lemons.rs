use std::{cell::RefCell, rc::Rc};

use egui::{include_image, Color32, Image, Rect, Response, Vec2};
use walkers::{Plugin, Position, Projector};

use crate::types::Lemon;

const SYMBOL_SIZE: f32 = 30.0;
const HOVERED_SYMBOL_SIZE: f32 = 36.0;

/// What gets drawn for one lemon.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: i64,
    pub position: Position,
    pub color: Color32,
}

/// One marker per lemon, or none while the map has not finished loading.
pub fn markers(lemons: &[Lemon], visible: bool) -> Vec<Marker> {
    if !visible {
        return Vec::new();
    }
    lemons
        .iter()
        .map(|lemon| Marker {
            id: lemon.id,
            position: lemon.position(),
            color: lemon.marker_color(),
        })
        .collect()
}

/// Draws the lemons on the map and records the one that was clicked.
pub struct Lemons<'a> {
    lemons: &'a [Lemon],
    visible: bool,
    selected: Option<i64>,
    pressed: Rc<RefCell<Option<Lemon>>>,
}

impl<'a> Lemons<'a> {
    pub fn new(
        lemons: &'a [Lemon],
        visible: bool,
        selected: Option<i64>,
        pressed: Rc<RefCell<Option<Lemon>>>,
    ) -> Self {
        Self {
            lemons,
            visible,
            selected,
            pressed,
        }
    }
}

impl Plugin for Lemons<'_> {
    fn run(self: Box<Self>, ui: &mut egui::Ui, _response: &Response, projector: &Projector) {
        for (marker, lemon) in markers(self.lemons, self.visible).iter().zip(self.lemons) {
            let highlighted = self.selected == Some(marker.id);
            if marker.draw(ui, projector, highlighted) {
                *self.pressed.borrow_mut() = Some(lemon.clone());
            }
        }
    }
}

impl Marker {
    /// Returns whether the marker was clicked this frame.
    fn draw(&self, ui: &mut egui::Ui, projector: &Projector, highlighted: bool) -> bool {
        let screen_position = projector.project(self.position).to_pos2();

        let clickable_area = Rect::from_center_size(screen_position, Vec2::splat(SYMBOL_SIZE));
        let response = ui.allocate_rect(clickable_area, egui::Sense::click());

        let size = if response.hovered() || highlighted {
            HOVERED_SYMBOL_SIZE
        } else {
            SYMBOL_SIZE
        };
        let rect = Rect::from_center_size(screen_position, Vec2::splat(size));

        let image = Image::new(include_image!("../../assets/lemon.svg"))
            .tint(self.color)
            .fit_to_exact_size(Vec2::splat(size));
        ui.put(rect, image);

        response.clicked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemon(id: i64, color: Option<&str>) -> Lemon {
        Lemon {
            id,
            color: color.map(str::to_string),
            title: String::new(),
            latitude: 10.0 + id as f64,
            longitude: -20.0 - id as f64,
            content: String::new(),
        }
    }

    #[test]
    fn test_one_marker_per_lemon_at_its_position() {
        let lemons: Vec<Lemon> = (1..=5).map(|id| lemon(id, None)).collect();

        let markers = markers(&lemons, true);

        assert_eq!(markers.len(), lemons.len());
        for (marker, lemon) in markers.iter().zip(&lemons) {
            assert_eq!(marker.id, lemon.id);
            assert_eq!(marker.position.lat(), lemon.latitude);
            assert_eq!(marker.position.lon(), lemon.longitude);
        }
    }

    #[test]
    fn test_markers_hidden_before_map_load() {
        let lemons = vec![lemon(1, None), lemon(2, None)];

        assert!(markers(&lemons, false).is_empty());
    }

    #[test]
    fn test_marker_colors() {
        let lemons = vec![lemon(1, None), lemon(2, Some("#0000FF"))];

        let markers = markers(&lemons, true);

        assert_eq!(markers[0].color, Color32::from_rgb(0xFF, 0xC7, 0x00));
        assert_eq!(markers[1].color, Color32::BLUE);
    }
}
