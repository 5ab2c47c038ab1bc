use eframe::egui::{self, Ui};

use crate::overlay::drag::InteractionMode;
use crate::util::or_dash;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);

        ui.heading("Backend");
        ui.add_space(4.0);
        let api_edit = ui.text_edit_singleline(&mut self.api_base_edit);
        if api_edit.lost_focus() {
            self.apply_api_base();
        }

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Trip");
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui.button("Reset").clicked() {
                self.spawn_reset();
            }
            if ui.button("Step").clicked() {
                self.spawn_step(1);
            }
            if ui.button("Step x10").clicked() {
                self.spawn_step(10);
            }
        });
        ui.horizontal(|ui| {
            let play_button = ui.add_enabled(!self.playing, egui::Button::new("Play"));
            if play_button.clicked() {
                self.start_play(now);
            }
            let pause_button = ui.add_enabled(self.playing, egui::Button::new("Pause"));
            if pause_button.clicked() {
                self.stop_play();
            }
        });

        let slider = ui.add(
            egui::Slider::new(&mut self.step_interval_ms, 60..=1000)
                .suffix(" ms")
                .text("step interval"),
        );
        // Changing speed retimes a running loop from now.
        if slider.changed() && self.playing {
            self.next_tick = now + self.step_interval_ms as f64 / 1000.0;
        }

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Map");
        ui.add_space(4.0);
        let mut calibrating = self.mode == InteractionMode::Calibrating;
        if ui.toggle_value(&mut calibrating, "Calibrate overlay").changed() {
            self.set_mode(if calibrating {
                InteractionMode::Calibrating
            } else {
                InteractionMode::Viewing
            });
        }
        if calibrating {
            ui.small("Node clicks are disabled while calibrating.");
        }

        ui.add_space(6.0);
        ui.label(format!(
            "Home: {}",
            or_dash(self.session.data.home.as_deref().unwrap_or(""))
        ));
        ui.label(format!(
            "Taxi start: {}",
            or_dash(self.session.data.taxi_start.as_deref().unwrap_or(""))
        ));
        if ui.button("Clear picks").clicked() {
            self.clear_picks();
        }

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Find node");
        ui.add_space(4.0);
        ui.text_edit_singleline(&mut self.search);
        if let Some(matches) = self.search_matches() {
            ui.small(format!("{} matching nodes", matches.len()));
        }
    }
}
