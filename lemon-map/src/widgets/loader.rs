use egui::{Color32, RichText};

const SPINNER_SIZE: f32 = 100.0;

/// Full-screen loading indicator shown until the lemons arrive.
pub struct WidgetLoader;

impl WidgetLoader {
    pub fn show(ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                let top = (ui.available_height() - SPINNER_SIZE) / 2.0;
                ui.add_space(top.max(0.0));
                ui.add(
                    egui::Spinner::new()
                        .size(SPINNER_SIZE)
                        .color(Color32::BLACK),
                );
                ui.label(RichText::new("Loading lemons…").size(16.0));
            });
        });
        ctx.request_repaint();
    }
}
