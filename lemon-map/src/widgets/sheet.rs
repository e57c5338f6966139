use std::sync::mpsc::Sender;

use egui::{pos2, vec2, Align, Color32, Layout, Rect, RichText, Sense, Vec2};

use crate::{
    sheet::{BottomSheet, GestureEvent},
    types::Lemon,
};

const HANDLE_SIZE: Vec2 = vec2(75.0, 4.0);
const BODY_HEIGHT_RATIO: f32 = 0.93;
const CORNER_RADIUS: f32 = 15.0;
const CONTENT_PADDING: f32 = 15.0;
const BUTTON_HEIGHT: f32 = 40.0;

/// What the user asked for through the sheet this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SheetAction {
    pub close: bool,
    pub copy_link: bool,
}

/// Draws the bottom sheet and turns pointer drags on it into gesture events.
pub struct WidgetSheet {
    gestures: Sender<GestureEvent>,
    translation: f32,
}

impl WidgetSheet {
    pub fn new(gestures: Sender<GestureEvent>) -> Self {
        Self {
            gestures,
            translation: 0.0,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, sheet: &BottomSheet) -> SheetAction {
        let mut action = SheetAction::default();
        let Some(lemon) = sheet.lemon() else {
            return action;
        };

        let screen = ctx.screen_rect();
        let height = sheet.screen_height();
        let top = screen.top() + height + sheet.offset();
        if top >= screen.bottom() && !sheet.is_animating() {
            return action;
        }
        let sheet_rect = Rect::from_min_size(pos2(screen.left(), top), vec2(screen.width(), height));

        egui::Area::new(egui::Id::new("lemon_sheet"))
            .fixed_pos(sheet_rect.min)
            .constrain(false)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_width(sheet_rect.width());

                let drag = ui.interact(sheet_rect, ui.id().with("sheet_drag"), Sense::drag());
                self.post_gestures(&drag);

                ui.vertical_centered(|ui| {
                    let (handle, _) = ui.allocate_exact_size(HANDLE_SIZE, Sense::hover());
                    ui.painter().rect_filled(handle, 2.0, Color32::GRAY);
                });
                ui.add_space(5.0);

                egui::Frame::none()
                    .fill(Color32::WHITE)
                    .rounding(CORNER_RADIUS)
                    .inner_margin(CONTENT_PADDING)
                    .show(ui, |ui| {
                        ui.set_width(sheet_rect.width() - 2.0 * CONTENT_PADDING);
                        ui.set_height(height * BODY_HEIGHT_RATIO - 2.0 * CONTENT_PADDING);
                        ui.visuals_mut().override_text_color = Some(Color32::BLACK);
                        Self::body(ui, lemon, sheet.on_full_screen(), &mut action);
                    });
            });

        action
    }

    fn post_gestures(&mut self, drag: &egui::Response) {
        if drag.drag_started() {
            self.translation = 0.0;
            let _ = self.gestures.send(GestureEvent::Start);
        }
        if drag.dragged() {
            self.translation += drag.drag_delta().y;
            let _ = self.gestures.send(GestureEvent::Update {
                translation: self.translation,
            });
        }
        if drag.drag_stopped() {
            let _ = self.gestures.send(GestureEvent::End);
        }
    }

    fn body(ui: &mut egui::Ui, lemon: &Lemon, on_full_screen: bool, action: &mut SheetAction) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(&lemon.title).size(24.0).strong());
            // Close is only offered while expanded.
            if on_full_screen {
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let close = egui::Button::new(RichText::new("✖").size(22.0).color(Color32::GRAY))
                        .frame(false);
                    if ui.add(close).clicked() {
                        action.close = true;
                    }
                });
            }
        });
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let copy = egui::Button::new(
                RichText::new("Copy link to Lemon")
                    .size(18.0)
                    .color(Color32::WHITE),
            )
            .fill(Color32::BLACK)
            .rounding(CORNER_RADIUS);
            if ui
                .add_sized([ui.available_width() * 0.9, BUTTON_HEIGHT], copy)
                .clicked()
            {
                action.copy_link = true;
            }
        });
        ui.add_space(15.0);

        egui::ScrollArea::vertical()
            .id_salt(("lemon_sheet_body", lemon.id))
            .enable_scrolling(on_full_screen)
            .drag_to_scroll(on_full_screen)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(format!("latitude: {}", lemon.latitude)).size(18.0));
                ui.add_space(10.0);
                ui.label(RichText::new(format!("longitude: {}", lemon.longitude)).size(18.0));
                ui.add_space(10.0);
                ui.label(RichText::new(&lemon.content).size(18.0));
            });
    }
}
