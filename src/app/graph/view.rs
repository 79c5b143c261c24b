use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::physics::HaltReason;
use super::super::render_utils::{draw_background, fade_color, world_to_screen};
use super::super::{BubbleGraph, SearchMatchCache, ViewModel};

const SELECTED_STROKE: Color32 = Color32::from_rgb(20, 24, 40);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    fn update_screen_space(rect: egui::Rect, pan: egui::Vec2, zoom: f32, graph: &mut BubbleGraph) {
        let scratch = &mut graph.view_scratch;
        scratch.screen_positions.clear();
        scratch.screen_radii.clear();
        for node in &graph.nodes {
            scratch
                .screen_positions
                .push(world_to_screen(rect, pan, zoom, node.world_pos));
            scratch.screen_radii.push((node.radius * zoom).max(0.75));
        }
    }

    /// Largest bubbles first so small ones stay visible on top.
    fn ensure_draw_order(graph: &mut BubbleGraph) {
        if graph.view_scratch.draw_order_len == graph.nodes.len() {
            return;
        }

        let order = &mut graph.view_scratch.draw_order;
        order.clear();
        order.extend(0..graph.nodes.len());
        order.sort_by(|a, b| graph.nodes[*b].radius.total_cmp(&graph.nodes[*a].radius));
        graph.view_scratch.draw_order_len = graph.nodes.len();
    }

    pub(in crate::app) fn search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.graph_revision == self.graph.revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| fuzzy_match_score(&matcher, &node.record.title, query).is_some())
            .map(|(index, _)| index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            graph_revision: self.graph.revision,
            matches: Arc::clone(&matches),
        });
        Some(matches)
    }

    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_canvas_zoom(ui, rect, &response);
        self.handle_canvas_pan(&response);

        if self.live_physics && self.simulation.step(&mut self.graph, self.physics, now) {
            ui.ctx().request_repaint();
        } else if self.simulation.is_running() {
            // Paused by the user; still honour the deadline.
            if self.simulation.remaining_secs(now) == Some(0.0) {
                self.simulation.stop(HaltReason::Deadline);
            } else {
                ui.ctx().request_repaint();
            }
        }

        let search_matches = self.search_matches();
        let pan = self.pan;
        let zoom = self.zoom;
        let graph = &mut self.graph;

        Self::update_screen_space(rect, pan, zoom, graph);
        Self::ensure_draw_order(graph);
        Self::visible_indices_into(
            rect,
            &graph.view_scratch.screen_positions,
            &graph.view_scratch.screen_radii,
            &mut graph.view_scratch.visible_indices,
        );
        let scratch = &mut graph.view_scratch;
        scratch.visible_mask.clear();
        scratch.visible_mask.resize(graph.nodes.len(), false);
        for &index in &scratch.visible_indices {
            scratch.visible_mask[index] = true;
        }

        let hovered = Self::hovered_index(
            ui.input(|input| input.pointer.hover_pos()),
            &scratch.draw_order,
            &scratch.visible_mask,
            &scratch.screen_positions,
            &scratch.screen_radii,
        );
        if hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());
        let mut transitioning = false;

        for &index in &scratch.draw_order {
            if !scratch.visible_mask[index] {
                continue;
            }

            let node = &graph.nodes[index];
            let position = scratch.screen_positions[index];
            let radius = scratch.screen_radii[index];
            let is_selected = self.selected.as_deref() == Some(node.record.title.as_str());
            let is_hovered = hovered == Some(index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            transitioning |= node.is_fill_transitioning(now);
            let fill = node.display_fill(now);
            let fill = if search_active && !is_match && !is_selected {
                fade_color(fill, 0.78)
            } else {
                fill
            };

            painter.circle_filled(position, radius, fill);
            if is_selected || is_hovered {
                painter.circle_stroke(position, radius + 1.5, Stroke::new(2.0, SELECTED_STROKE));
            } else if search_active && is_match {
                painter.circle_stroke(position, radius + 1.0, Stroke::new(1.4, SELECTED_STROKE));
            }

            if is_selected || radius > 22.0 {
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    &node.record.title,
                    FontId::proportional((radius * 0.32).clamp(10.0, 14.0)),
                    Color32::from_gray(250),
                );
            }
        }

        if transitioning {
            ui.ctx().request_repaint();
        }

        self.draw_caption(&painter, rect);
        self.draw_legend(&painter, rect);

        if let Some(index) = hovered
            && let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
        {
            self.draw_tooltip(&painter, rect, pointer + vec2(10.0, 10.0), index);
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let title = hovered.and_then(|index| {
                self.graph
                    .nodes
                    .get(index)
                    .map(|node| node.record.title.clone())
            });
            self.set_selected(title);
        }
    }
}
