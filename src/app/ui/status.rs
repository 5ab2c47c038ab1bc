use eframe::egui::{self, RichText, Ui};

use crate::util::{or_dash, truncate_middle};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_status(&mut self, ui: &mut Ui) {
        ui.heading("Trip Status");
        ui.add_space(6.0);

        let snapshot = &self.snapshot;
        egui::Grid::new("trip_status_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Step");
                ui.label(snapshot.step.to_string());
                ui.end_row();

                ui.label("Taxi");
                ui.label(or_dash(&snapshot.taxi.node));
                ui.end_row();

                ui.label("Onboard");
                ui.label(if snapshot.taxi.onboard { "yes" } else { "no" });
                ui.end_row();

                ui.label("Buyer");
                ui.label(or_dash(&snapshot.buyer.node));
                ui.end_row();

                ui.label("Home");
                ui.label(or_dash(&snapshot.buyer.home));
                ui.end_row();

                ui.label("Store");
                ui.label(or_dash(&snapshot.target.store_node));
                ui.end_row();

                ui.label("Branch");
                ui.label(or_dash(&snapshot.target.branch_id));
                ui.end_row();

                ui.label("Plan");
                ui.label(format!("{}/{}", snapshot.plan.index, snapshot.plan.len));
                ui.end_row();
            });

        if let Some(next) = &snapshot.plan.next {
            let movement = match (&next.a, &next.b) {
                (Some(a), Some(b)) => format!(
                    "{} {} -> {}",
                    next.kind,
                    truncate_middle(a, 14),
                    truncate_middle(b, 14)
                ),
                _ => next.kind.clone(),
            };
            ui.small(format!("next: {movement}"));
        }

        if snapshot.finished {
            ui.add_space(4.0);
            ui.label(
                RichText::new("Arrived at destination")
                    .color(egui::Color32::from_rgb(34, 197, 94))
                    .strong(),
            );
        }

        ui.add_space(8.0);
        ui.separator();
        ui.label(RichText::new("Log").strong());
        ui.add_space(4.0);

        if snapshot.messages.is_empty() {
            ui.label("—");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("trip_log_scroll")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &snapshot.messages {
                    ui.label(message);
                }
            });
    }
}
