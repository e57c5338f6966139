/// A small modal-looking window with a message and an OK button.
pub struct WidgetAlert {
    message: String,
}

impl WidgetAlert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `false` once the alert was dismissed.
    pub fn show(&self, ctx: &egui::Context) -> bool {
        let mut acknowledged = false;

        egui::Window::new("Lemons")
            .resizable(false)
            .collapsible(false)
            .title_bar(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new(&self.message).size(18.0));
                    ui.add_space(10.0);
                    if ui
                        .add_sized([80.0, 30.0], egui::Button::new("OK").rounding(8.0))
                        .clicked()
                    {
                        acknowledged = true;
                    }
                });
            });

        !acknowledged
    }
}
