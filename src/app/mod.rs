use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Pos2, Vec2};

use crate::dataset::{AnimeRecord, EraBuckets, LoaderConfig, load_dataset};

mod encoding;
mod graph;
mod physics;
mod render_utils;
mod reveal;
mod ui;

use encoding::Legend;
use physics::{ForceSimulation, PhysicsConfig};
use reveal::ChartState;

pub use physics::DEFAULT_SETTLE_SECS;

#[derive(Clone, Debug)]
pub struct ChartConfig {
    pub dataset_path: PathBuf,
    pub loader: LoaderConfig,
    pub settle_secs: f32,
}

pub struct AnimeErasApp {
    config: ChartConfig,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<EraBuckets, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RankingMode {
    Members,
    Score,
}

struct ViewModel {
    buckets: EraBuckets,
    chart: ChartState,
    graph: BubbleGraph,
    simulation: ForceSimulation,
    physics: PhysicsConfig,
    settle_secs: f32,
    live_physics: bool,
    legend: Legend,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    selected: Option<String>,
    pan: Vec2,
    zoom: f32,
    ranking_mode: RankingMode,
    ranking_rows_visible: usize,
    ranking_cache: Option<RankingCache>,
    started: bool,
}

struct SearchMatchCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<usize>>,
}

struct RankingCache {
    mode: RankingMode,
    graph_revision: u64,
    indices: Vec<usize>,
}

/// Every node ever merged, in merge order. Titles are unique.
#[derive(Default)]
struct BubbleGraph {
    nodes: Vec<BubbleNode>,
    index_by_title: HashMap<String, usize>,
    revision: u64,
    physics_scratch: PhysicsScratch,
    view_scratch: ViewScratch,
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    deltas: Vec<Vec2>,
}

#[derive(Default)]
struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_radii: Vec<f32>,
    visible_indices: Vec<usize>,
    visible_mask: Vec<bool>,
    draw_order: Vec<usize>,
    draw_order_len: usize,
}

struct BubbleNode {
    record: AnimeRecord,
    primary_genre: String,
    world_pos: Vec2,
    velocity: Vec2,
    radius: f32,
    fill: Color32,
    previous_fill: Color32,
    fill_changed_at: f64,
}

impl AnimeErasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ChartConfig) -> Self {
        let state = Self::start_load(&config);
        Self { config, state }
    }

    fn start_load(config: &ChartConfig) -> AppState {
        let (tx, rx) = mpsc::channel();
        let path = config.dataset_path.clone();
        let loader = config.loader;

        thread::spawn(move || {
            let result = load_dataset(&path, &loader).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        AppState::Loading { rx }
    }
}

impl eframe::App for AnimeErasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(buckets)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            buckets,
                            self.config.settle_secs,
                        ))));
                    }
                    Ok(Err(error)) => {
                        tracing::error!(%error, "dataset load failed");
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading anime dataset...");
                        ui.add_space(8.0);
                        ui.label(self.config.dataset_path.display().to_string());
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the anime dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.config));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx, &self.config),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
