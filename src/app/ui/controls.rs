use eframe::egui::{self, Align, Layout, RichText, Ui};

use crate::util::format_count;

use super::super::encoding::ColorMode;
use super::super::physics::HaltReason;
use super::super::reveal::Action;
use super::super::{BubbleGraph, RankingCache, RankingMode, ViewModel};

/// Node indices ordered best-first for `mode`. Ties keep merge order.
fn ranked_indices(graph: &BubbleGraph, mode: RankingMode) -> Vec<usize> {
    let mut indices = (0..graph.nodes.len()).collect::<Vec<_>>();
    match mode {
        RankingMode::Members => indices.sort_by(|a, b| {
            graph.nodes[*b]
                .record
                .members
                .cmp(&graph.nodes[*a].record.members)
        }),
        RankingMode::Score => indices.sort_by(|a, b| {
            graph.nodes[*b]
                .record
                .score
                .total_cmp(&graph.nodes[*a].record.score)
        }),
    }
    indices
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);

        ui.heading("Chart Controls");
        ui.separator();
        ui.add_space(4.0);

        for line in self.chart.step.caption() {
            ui.label(*line);
        }
        ui.add_space(6.0);

        let advance = ui
            .add_enabled(
                self.chart.step.can_advance(),
                egui::Button::new(self.chart.step.advance_label()),
            )
            .on_hover_text("Merge the next era into the chart.");
        if advance.clicked() {
            self.dispatch(Action::Advance, now);
        }

        if self.chart.step.encodings_unlocked() {
            ui.add_space(6.0);
            ui.label("Color by");
            ui.horizontal_wrapped(|ui| {
                for mode in ColorMode::ALL {
                    if ui
                        .selectable_label(self.chart.mode == mode, mode.label())
                        .clicked()
                    {
                        self.dispatch(Action::SetMode(mode), now);
                    }
                }
            });
        }

        ui.separator();

        ui.label("Search titles")
            .on_hover_text("Fuzzy-highlight matching bubbles and dim the rest.");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Step the force layout every frame while it is settling.");

        ui.collapsing("Physics tuning", |ui| {
            ui.add(
                egui::Slider::new(&mut self.physics.charge_strength, -40.0..=0.0)
                    .text("Charge")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Many-body strength. More negative pushes bubbles further apart.");
            ui.add(
                egui::Slider::new(&mut self.physics.center_strength, 0.0..=1.0)
                    .text("Centering")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("How strongly the cloud is pulled toward the middle.");
            ui.add(
                egui::Slider::new(&mut self.settle_secs, 1.0..=30.0)
                    .text("Settle seconds")
                    .clamping(egui::SliderClamping::Always),
            )
            .on_hover_text("Wall-clock time after a restart before the layout is frozen.");

            ui.horizontal(|ui| {
                if ui.button("Shake").clicked() {
                    self.simulation.restart(now, self.settle_secs);
                }
                if ui
                    .add_enabled(self.simulation.is_running(), egui::Button::new("Freeze"))
                    .clicked()
                {
                    self.simulation.stop(HaltReason::Manual);
                }
            });

            match self.simulation.remaining_secs(now) {
                Some(remaining) => ui.label(format!(
                    "settling: {remaining:.1}s left, alpha {:.3}",
                    self.simulation.alpha()
                )),
                None => ui.label("layout frozen"),
            };
        });

        ui.separator();

        egui::CollapsingHeader::new("Rankings")
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let members = ui
                        .selectable_value(&mut self.ranking_mode, RankingMode::Members, "Members")
                        .on_hover_text("Shown titles with the most members.");
                    let score = ui
                        .selectable_value(&mut self.ranking_mode, RankingMode::Score, "Score")
                        .on_hover_text("Shown titles with the highest rating.");
                    if members.changed() || score.changed() {
                        self.ranking_rows_visible = Self::INITIAL_RANKING_ROWS;
                    }
                });
                ui.add_space(6.0);
                self.draw_ranking(ui);
            });
    }

    fn ranking_indices(&mut self) -> &[usize] {
        let stale = self.ranking_cache.as_ref().is_none_or(|cache| {
            cache.mode != self.ranking_mode || cache.graph_revision != self.graph.revision
        });
        if stale {
            self.ranking_cache = Some(RankingCache {
                mode: self.ranking_mode,
                graph_revision: self.graph.revision,
                indices: ranked_indices(&self.graph, self.ranking_mode),
            });
        }

        self.ranking_cache
            .as_ref()
            .map(|cache| cache.indices.as_slice())
            .unwrap_or_default()
    }

    fn draw_ranking(&mut self, ui: &mut Ui) {
        let indices = self.ranking_indices().to_vec();
        let row_count = indices.len().min(self.ranking_rows_visible);
        let mut should_load_more = false;
        let mut selected_title = None;

        egui::ScrollArea::vertical()
            .id_salt("ranking_scroll")
            .max_height(260.0)
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                if row_range.end + Self::RANKING_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for row in row_range {
                    let Some(node) = indices.get(row).and_then(|&index| self.graph.nodes.get(index))
                    else {
                        continue;
                    };

                    let title = node.record.title.as_str();
                    let is_selected = self.selected.as_deref() == Some(title);
                    let value_label = match self.ranking_mode {
                        RankingMode::Members => format_count(node.record.members),
                        RankingMode::Score => format!("{:.2}", node.record.score),
                    };

                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(is_selected, format!("{}. {title}", row + 1))
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(RichText::new(value_label).weak());
                            });
                            clicked
                        })
                        .inner;

                    if clicked {
                        selected_title = Some(title.to_owned());
                    }
                }
            });

        if let Some(title) = selected_title {
            self.set_selected(Some(title));
        }

        if should_load_more && row_count < indices.len() {
            self.ranking_rows_visible = (row_count + Self::RANKING_PAGE_ROWS).min(indices.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dataset::sample_record;

    fn ranked_titles(graph: &BubbleGraph, mode: RankingMode) -> Vec<&str> {
        ranked_indices(graph, mode)
            .into_iter()
            .map(|index| graph.nodes[index].record.title.as_str())
            .collect()
    }

    #[test]
    fn rankings_order_best_first() {
        let mut graph = BubbleGraph::default();
        graph.merge_batch(
            &[
                sample_record("Akira", 1988, 8.2, 400_000),
                sample_record("Cowboy Bebop", 1998, 8.75, 1_900_000),
                sample_record("Steins;Gate", 2011, 9.07, 2_600_000),
                sample_record("Toradora!", 2008, 7.8, 2_100_000),
            ],
            ColorMode::Genre,
            0.0,
        );

        assert_eq!(
            ranked_titles(&graph, RankingMode::Members),
            vec!["Steins;Gate", "Toradora!", "Cowboy Bebop", "Akira"]
        );
        assert_eq!(
            ranked_titles(&graph, RankingMode::Score),
            vec!["Steins;Gate", "Cowboy Bebop", "Akira", "Toradora!"]
        );
    }
}
