use std::sync::mpsc;

use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::overlay::drag::InteractionMode;
use crate::overlay::mapping::GraphBounds;
use crate::session::SessionStore;
use crate::sim::TravelClient;

use super::super::{LoadedWorld, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        world: LoadedWorld,
        session: SessionStore,
        fallback_api_base: &str,
    ) -> Self {
        let bounds = GraphBounds::of(world.graph.nodes.iter().map(|node| (node.x, node.y)));
        let api_base = session
            .data
            .api_base
            .clone()
            .unwrap_or_else(|| fallback_api_base.to_owned());
        let calib = session.data.calibration.unwrap_or_default();
        let (snapshot_tx, snapshot_rx) = mpsc::channel();

        Self {
            graph: world.graph,
            bounds,
            snapshot: world.snapshot,
            client: TravelClient::new(&api_base),
            session,
            api_base_edit: api_base,
            calib,
            mode: InteractionMode::Viewing,
            drag: None,
            anim: None,
            playing: false,
            step_interval_ms: 240,
            next_tick: 0.0,
            pending_requests: 0,
            status_ok: true,
            status_line: "Ready".to_owned(),
            search: String::new(),
            search_matches: None,
            background: world.background,
            background_texture: None,
            canvas: None,
            screen_positions: Vec::new(),
            snapshot_tx,
            snapshot_rx,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.drain_snapshots(ctx);
        self.drive_autoplay(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("travel-viz");
                    ui.separator();
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let (dot, color) = if self.status_ok {
                            ("● OK", Color32::from_rgb(34, 197, 94))
                        } else {
                            ("● ERROR", Color32::from_rgb(239, 68, 68))
                        };
                        ui.label(RichText::new(dot).color(color));
                        ui.label(self.status_line.as_str());
                        if self.pending_requests > 0 || is_reloading {
                            ui.spinner();
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(270.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("trip_status")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_status(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| self.draw_map(ui));
        });
    }
}
