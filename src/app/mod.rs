use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use eframe::egui::{self, ColorImage, Context, Pos2, Rect, TextureHandle};

use crate::overlay::anim::AnimSession;
use crate::overlay::calib::CalibrationRect;
use crate::overlay::drag::{DragSession, InteractionMode};
use crate::overlay::mapping::{GraphBounds, node_to_screen};
use crate::session::SessionStore;
use crate::sim::{CityGraph, NodeKind, TravelClient, TravelState};

mod background;
mod map;
mod render_utils;
mod ui;

pub struct AppConfig {
    pub api_base: String,
    pub background: PathBuf,
    pub state_file: PathBuf,
}

pub struct TravelApp {
    config: AppConfig,
    pending_session: Option<SessionStore>,
    state: AppState,
    reload_rx: Option<Receiver<Result<LoadedWorld, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedWorld, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct LoadedWorld {
    graph: CityGraph,
    snapshot: TravelState,
    background: Option<ColorImage>,
}

type SnapshotResult = Result<TravelState, String>;

struct ViewModel {
    graph: CityGraph,
    bounds: GraphBounds,
    snapshot: TravelState,
    client: TravelClient,
    session: SessionStore,
    api_base_edit: String,

    calib: CalibrationRect,
    mode: InteractionMode,
    drag: Option<DragSession>,
    anim: Option<AnimSession>,

    playing: bool,
    step_interval_ms: u32,
    next_tick: f64,
    pending_requests: usize,

    status_ok: bool,
    status_line: String,

    search: String,
    search_matches: Option<SearchMatchCache>,

    background: Option<ColorImage>,
    background_texture: Option<TextureHandle>,

    canvas: Option<Rect>,
    screen_positions: Vec<Pos2>,

    snapshot_tx: Sender<SnapshotResult>,
    snapshot_rx: Receiver<SnapshotResult>,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<usize>>,
}

impl TravelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let session = SessionStore::load(config.state_file.clone());
        let api_base = session
            .data
            .api_base
            .clone()
            .unwrap_or_else(|| config.api_base.clone());
        let state = AppState::Loading {
            rx: Self::spawn_load(TravelClient::new(&api_base), config.background.clone()),
        };

        Self {
            config,
            pending_session: Some(session),
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(
        client: TravelClient,
        background_path: PathBuf,
    ) -> Receiver<Result<LoadedWorld, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = (|| -> anyhow::Result<LoadedWorld> {
                let graph = client.fetch_graph()?;
                let snapshot = client.fetch_state()?;
                log::info!(
                    "loaded travel graph: {} nodes, {} edges",
                    graph.node_count(),
                    graph.edge_count()
                );
                Ok(LoadedWorld {
                    graph,
                    snapshot,
                    background: background::load(&background_path),
                })
            })()
            .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn into_ready(&mut self, world: LoadedWorld) -> AppState {
        let session = self
            .pending_session
            .take()
            .unwrap_or_else(|| SessionStore::load(self.config.state_file.clone()));
        AppState::Ready(Box::new(ViewModel::new(
            world,
            session,
            &self.config.api_base,
        )))
    }
}

impl eframe::App for TravelApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut received = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    received = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading city graph and trip state...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to reach the travel backend");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });

                if retry {
                    let api_base = self
                        .pending_session
                        .as_ref()
                        .and_then(|session| session.data.api_base.clone())
                        .unwrap_or_else(|| self.config.api_base.clone());
                    self.state = AppState::Loading {
                        rx: Self::spawn_load(
                            TravelClient::new(&api_base),
                            self.config.background.clone(),
                        ),
                    };
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(
                        model.client.clone(),
                        self.config.background.clone(),
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            received = Some(result);
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.network_failure("background reload worker disconnected");
                        }
                    }
                }
            }
        }

        if let Some(result) = received {
            self.reload_rx = None;
            match result {
                Ok(world) => self.state = self.into_ready(world),
                // A failed reload keeps the current model alive; only the
                // initial load falls through to the error screen.
                Err(error) => {
                    if let AppState::Ready(model) = &mut self.state {
                        model.network_failure(&error);
                    } else {
                        self.state = AppState::Error(error);
                    }
                }
            }
        }
    }
}

impl ViewModel {
    fn drain_snapshots(&mut self, ctx: &Context) {
        let now = ctx.input(|input| input.time);

        while let Ok(result) = self.snapshot_rx.try_recv() {
            self.pending_requests = self.pending_requests.saturating_sub(1);
            match result {
                Ok(snapshot) => self.apply_snapshot(now, snapshot),
                Err(error) => self.network_failure(&error),
            }
        }
    }

    /// Last response wins: each snapshot is complete, so late arrivals from
    /// overlapping requests simply repaint with what they carry.
    fn apply_snapshot(&mut self, now: f64, snapshot: TravelState) {
        let previous = std::mem::take(&mut self.snapshot.taxi.node);
        if previous != snapshot.taxi.node {
            self.animate_taxi(now, &previous, &snapshot.taxi.node);
        }

        if snapshot.finished {
            self.playing = false;
            self.set_status(true, "Trip finished — taxi at destination");
        } else {
            self.set_status(true, "OK");
        }

        self.snapshot = snapshot;
    }

    /// Map both endpoints with the calibration/bounds in effect right now;
    /// the new session supersedes any active one.
    fn animate_taxi(&mut self, now: f64, from_id: &str, to_id: &str) {
        let Some(canvas) = self.canvas else {
            return;
        };
        let (Some(from), Some(to)) = (self.graph.node(from_id), self.graph.node(to_id)) else {
            return;
        };

        let from = node_to_screen(from.x, from.y, canvas, &self.bounds, &self.calib);
        let to = node_to_screen(to.x, to.y, canvas, &self.bounds, &self.calib);
        self.anim = Some(AnimSession::new(
            from,
            to,
            now,
            self.step_interval_ms as f32 / 1000.0,
        ));
    }

    fn network_failure(&mut self, message: &str) {
        log::warn!("backend request failed: {message}");
        self.playing = false;
        self.anim = None;
        self.set_status(false, message);
    }

    fn set_status(&mut self, ok: bool, message: &str) {
        self.status_ok = ok;
        self.status_line = message.to_owned();
    }

    fn spawn_step(&mut self, n: u32) {
        let client = self.client.clone();
        let tx = self.snapshot_tx.clone();
        self.pending_requests += 1;
        thread::spawn(move || {
            let _ = tx.send(client.step(n).map_err(|error| format!("{error:#}")));
        });
    }

    fn spawn_reset(&mut self) {
        self.playing = false;
        let client = self.client.clone();
        let tx = self.snapshot_tx.clone();
        let home = self.session.data.home.clone();
        let taxi = self.session.data.taxi_start.clone();
        self.pending_requests += 1;
        thread::spawn(move || {
            let _ = tx.send(
                client
                    .reset(home.as_deref(), taxi.as_deref())
                    .map_err(|error| format!("{error:#}")),
            );
        });
    }

    /// One request per elapsed interval, fire-and-forget; in-flight requests
    /// are never awaited or cancelled.
    fn drive_autoplay(&mut self, ctx: &Context) {
        if !self.playing || self.snapshot.finished {
            return;
        }

        let now = ctx.input(|input| input.time);
        let interval = self.step_interval_ms as f64 / 1000.0;
        if now >= self.next_tick {
            self.spawn_step(1);
            self.next_tick = now + interval;
        }

        ctx.request_repaint_after(std::time::Duration::from_secs_f64(
            (self.next_tick - now).clamp(0.0, interval),
        ));
    }

    fn start_play(&mut self, now: f64) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.next_tick = now + self.step_interval_ms as f64 / 1000.0;
    }

    fn stop_play(&mut self) {
        self.playing = false;
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode == mode {
            return;
        }
        if mode != InteractionMode::Calibrating {
            self.cancel_drag();
        }
        self.mode = mode;
    }

    /// Discard an in-flight drag; the last committed rectangle stands.
    fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.calib = drag.committed();
        }
    }

    fn commit_drag(&mut self) {
        self.drag = None;
        self.session.data.calibration = Some(self.calib);
        self.session.save();
    }

    /// Home-kind nodes fill the home role; every other kind is a taxi start.
    fn select_node(&mut self, index: usize) {
        let node = &self.graph.nodes[index];
        if node.kind == NodeKind::Home {
            self.session.data.home = Some(node.id.clone());
        } else {
            self.session.data.taxi_start = Some(node.id.clone());
        }
        self.session.save();
    }

    fn clear_picks(&mut self) {
        self.session.data.home = None;
        self.session.data.taxi_start = None;
        self.session.save();
    }

    fn apply_api_base(&mut self) {
        let entered = self.api_base_edit.trim().trim_end_matches('/').to_owned();
        if entered.is_empty() || entered == self.client.base() {
            return;
        }

        self.client = TravelClient::new(&entered);
        self.session.data.api_base = Some(entered);
        self.session.save();
    }

    fn search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            self.search_matches = None;
            return None;
        }

        let stale = self
            .search_matches
            .as_ref()
            .is_none_or(|cache| cache.query != query);
        if stale {
            use fuzzy_matcher::FuzzyMatcher;
            let matcher = fuzzy_matcher::skim::SkimMatcherV2::default();
            let matches = self
                .graph
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| matcher.fuzzy_match(&node.id, query).map(|_| index))
                .collect::<HashSet<_>>();
            self.search_matches = Some(SearchMatchCache {
                query: query.to_owned(),
                matches: Arc::new(matches),
            });
        }

        self.search_matches
            .as_ref()
            .map(|cache| Arc::clone(&cache.matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn sample_world() -> LoadedWorld {
        let mut graph: CityGraph = serde_json::from_str(
            r#"{
                "nodes": [
                    {"id": "A", "x": 0.0, "y": 0.0, "kind": "home"},
                    {"id": "B", "x": 10.0, "y": 0.0, "kind": "taxi_stand"},
                    {"id": "C", "x": 10.0, "y": 10.0, "kind": "store"}
                ],
                "edges": [
                    {"a": "A", "b": "B", "class": "arterial"},
                    {"a": "B", "b": "C"}
                ]
            }"#,
        )
        .unwrap();
        graph.build_index();

        let mut snapshot = TravelState::default();
        snapshot.taxi.node = "B".to_owned();

        LoadedWorld {
            graph,
            snapshot,
            background: None,
        }
    }

    fn session_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "travel-viz-app-test-{name}-{}.json",
            std::process::id()
        ))
    }

    fn model(name: &str) -> ViewModel {
        let mut model = ViewModel::new(
            sample_world(),
            SessionStore::load(session_path(name)),
            "http://localhost:8000",
        );
        model.canvas = Some(Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0)));
        model
    }

    #[test]
    fn selection_roles_follow_node_kind_and_persist() {
        let path = session_path("selection");
        let _ = std::fs::remove_file(&path);

        let mut model = model("selection");
        model.select_node(0); // A, home
        model.select_node(1); // B, taxi stand
        assert_eq!(model.session.data.home.as_deref(), Some("A"));
        assert_eq!(model.session.data.taxi_start.as_deref(), Some("B"));

        // Store nodes are taxi starts too: anything that is not a home.
        model.select_node(2);
        assert_eq!(model.session.data.taxi_start.as_deref(), Some("C"));

        let reloaded = SessionStore::load(path.clone());
        assert_eq!(reloaded.data.home.as_deref(), Some("A"));
        assert_eq!(reloaded.data.taxi_start.as_deref(), Some("C"));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn a_taxi_move_starts_exactly_one_animation_between_mapped_endpoints() {
        let mut model = model("anim");

        let mut moved = TravelState::default();
        moved.taxi.node = "C".to_owned();
        model.apply_snapshot(2.0, moved);

        let anim = model.anim.expect("a hop B -> C starts a session");
        let canvas = model.canvas.unwrap();
        let from = node_to_screen(10.0, 0.0, canvas, &model.bounds, &model.calib);
        let to = node_to_screen(10.0, 10.0, canvas, &model.bounds, &model.calib);
        assert_eq!(anim.from, from);
        assert_eq!(anim.to, to);
        assert_eq!(anim.start_time, 2.0);

        // Same position again: no new session.
        model.anim = None;
        let mut unchanged = TravelState::default();
        unchanged.taxi.node = "C".to_owned();
        model.apply_snapshot(3.0, unchanged);
        assert!(model.anim.is_none());
    }

    #[test]
    fn unknown_taxi_nodes_do_not_animate() {
        let mut model = model("ghost");
        let mut moved = TravelState::default();
        moved.taxi.node = "ghost".to_owned();
        model.apply_snapshot(2.0, moved);
        assert!(model.anim.is_none());
    }

    #[test]
    fn a_finished_snapshot_stops_autoplay() {
        let mut model = model("finished");
        model.playing = true;

        let mut done = TravelState::default();
        done.taxi.node = "B".to_owned();
        done.finished = true;
        model.apply_snapshot(2.0, done);

        assert!(!model.playing);
        assert!(model.status_ok);
    }

    #[test]
    fn leaving_calibrating_discards_the_in_flight_drag() {
        let mut model = model("cancel");
        model.mode = InteractionMode::Calibrating;
        let committed = model.calib;

        let canvas = model.canvas.unwrap();
        let inside = mapping_center(canvas, &committed);
        model.drag = DragSession::begin(inside, canvas, committed);
        assert!(model.drag.is_some());
        model.calib = model.drag.unwrap().apply(inside + vec2(120.0, 90.0), canvas);
        assert_ne!(model.calib, committed);

        model.set_mode(InteractionMode::Viewing);
        assert!(model.drag.is_none());
        assert_eq!(model.calib, committed);
    }

    #[test]
    fn a_network_failure_halts_play_and_animation() {
        let mut model = model("netfail");
        model.playing = true;
        model.anim = Some(AnimSession::new(
            pos2(0.0, 0.0),
            pos2(1.0, 1.0),
            0.0,
            1.0,
        ));

        model.network_failure("backend unreachable");

        assert!(!model.playing);
        assert!(model.anim.is_none());
        assert!(!model.status_ok);
    }

    fn mapping_center(canvas: Rect, calib: &CalibrationRect) -> Pos2 {
        crate::overlay::mapping::rect_px(canvas, calib).center()
    }
}
