//! Rendering logic for the panel.

use egui::{CentralPanel, Color32, Context, RichText, TopBottomPanel};

use super::PanelApp;
use crate::state::ConnectionState;

impl PanelApp {
    pub(super) fn render_panel(&mut self, ctx: &Context) {
        self.render_status_bar(ctx);

        CentralPanel::default().show(ctx, |ui| {
            ui.heading("Recording");
            ui.add_space(8.0);

            let mut submit_requested = false;

            ui.horizontal(|ui| {
                ui.label("Video name:");
                let response = ui.add_enabled(
                    self.controls.name_field,
                    egui::TextEdit::singleline(&mut self.video_name),
                );
                if response.changed() {
                    self.apply_name_cascade();
                }
                // Submit on Enter in either field
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit_requested = true;
                }
            });

            ui.horizontal(|ui| {
                ui.label("Scene:");
                let response = ui.add_enabled(
                    self.controls.scene_field,
                    egui::TextEdit::singleline(&mut self.scene_text).desired_width(60.0),
                );
                if response.changed() {
                    self.update_nav_buttons();
                }
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit_requested = true;
                }

                if ui
                    .add_enabled(self.controls.prev_button, egui::Button::new("◀ Prev"))
                    .clicked()
                {
                    self.bump_scene(false, ctx);
                }
                if ui
                    .add_enabled(self.controls.next_button, egui::Button::new("Next ▶"))
                    .clicked()
                {
                    self.bump_scene(true, ctx);
                }
            });

            ui.add_space(8.0);
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Current template:");
                ui.monospace(&self.template_display);
            });

            if submit_requested {
                self.send_template(ctx);
            }
        });
    }

    fn render_status_bar(&mut self, ctx: &Context) {
        TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (status_color, status_text) = match self.connection_state {
                    ConnectionState::Connected => (Color32::GREEN, "Connected"),
                    ConnectionState::Disconnected => (Color32::RED, "Disconnected"),
                };
                ui.label(RichText::new(status_text).color(status_color));
                ui.separator();
                ui.label(format!("OBS: {}", self.target));
            });
        });
    }
}
