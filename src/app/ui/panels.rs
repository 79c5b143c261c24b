use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::dataset::{Era, EraBuckets};

use super::super::encoding::{ColorMode, legend_for, recolor};
use super::super::physics::{ForceSimulation, PhysicsConfig};
use super::super::reveal::{Action, ChartState, Effect};
use super::super::{BubbleGraph, ChartConfig, RankingMode, ViewModel};

impl ViewModel {
    pub(in crate::app) const INITIAL_RANKING_ROWS: usize = 20;
    pub(in crate::app) const RANKING_PAGE_ROWS: usize = 20;
    pub(in crate::app) const RANKING_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(buckets: EraBuckets, settle_secs: f32) -> Self {
        Self {
            buckets,
            chart: ChartState::default(),
            graph: BubbleGraph::default(),
            simulation: ForceSimulation::default(),
            physics: PhysicsConfig::default(),
            settle_secs,
            live_physics: true,
            legend: legend_for(ColorMode::Genre),
            search: String::new(),
            search_match_cache: None,
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            ranking_mode: RankingMode::Members,
            ranking_rows_visible: Self::INITIAL_RANKING_ROWS,
            ranking_cache: None,
            started: false,
        }
    }

    /// Seeds the canvas with the early era. Later calls are no-ops.
    pub(in crate::app) fn start(&mut self, now: f64) {
        if self.started {
            return;
        }
        self.started = true;
        self.reveal_era(Era::Early, now);
    }

    pub(in crate::app) fn dispatch(&mut self, action: Action, now: f64) {
        let previous = self.chart;
        let (next, effect) = previous.apply(action);
        self.chart = next;

        if next.step != previous.step {
            tracing::info!(from = ?previous.step, to = ?next.step, "reveal step advanced");
        }

        match effect {
            Some(Effect::MergeEra(era)) => self.reveal_era(era, now),
            Some(Effect::UnlockEncodings) => tracing::info!("encoding controls unlocked"),
            Some(Effect::Recolor(mode)) => {
                self.legend = recolor(&mut self.graph.nodes, mode, now);
                tracing::info!(mode = mode.label(), "encoding mode switched");
            }
            None => {}
        }
    }

    fn reveal_era(&mut self, era: Era, now: f64) {
        let added = self
            .graph
            .merge_batch(self.buckets.bucket(era), self.chart.mode, now);
        tracing::info!(
            era = era.label(),
            added,
            total = self.graph.nodes.len(),
            "era revealed"
        );
        self.simulation.restart(now, self.settle_secs);
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, config: &ChartConfig) {
        self.start(ctx.input(|input| input.time));

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Anime eras");
                    ui.separator();
                    ui.label(format!("dataset: {}", config.dataset_path.display()));
                    ui.label(format!("records: {}", self.buckets.record_count()));
                    ui.label(format!("shown: {}", self.graph.nodes.len()));
                    ui.label(format!("dropped rows: {}", self.buckets.dropped_rows));
                    if ui.button("Reset view").clicked() {
                        self.reset_view();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("step {}/4", self.chart.step.index() + 1));
                        ui.label(format!("color: {}", self.chart.mode.label()));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(350.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_canvas(ui));
    }
}
