use std::collections::HashSet;

use eframe::egui::{Vec2, vec2};

use crate::dataset::AnimeRecord;

use super::super::encoding::{ColorMode, color_for};
use super::super::render_utils::radius_for_members;
use super::super::{BubbleGraph, BubbleNode};

const INITIAL_RADIUS: f32 = 10.0;

/// Phyllotaxis seat for the `index`-th node: successive indices spiral
/// outward without overlapping, so late arrivals start around the existing
/// cloud.
fn phyllotaxis_position(index: usize) -> Vec2 {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(radius * angle.cos(), radius * angle.sin())
}

impl BubbleGraph {
    pub(in crate::app) fn node_by_title(&self, title: &str) -> Option<&BubbleNode> {
        self.index_by_title
            .get(title)
            .and_then(|&index| self.nodes.get(index))
    }

    /// Appends the titles of `batch` that are not yet known, colored for
    /// `mode`. Returns how many nodes were added; existing nodes are untouched.
    pub(in crate::app) fn merge_batch(
        &mut self,
        batch: &[AnimeRecord],
        mode: ColorMode,
        now: f64,
    ) -> usize {
        let mut seen_in_batch = HashSet::new();
        let novel = batch
            .iter()
            .filter(|record| {
                !self.index_by_title.contains_key(&record.title)
                    && seen_in_batch.insert(record.title.as_str())
            })
            .collect::<Vec<_>>();

        if novel.is_empty() {
            return 0;
        }

        let added = novel.len();
        self.nodes.reserve(added);
        for record in novel {
            let index = self.nodes.len();
            let primary_genre = record.primary_genre().to_owned();
            let fill = color_for(mode, &primary_genre, record);

            self.index_by_title.insert(record.title.clone(), index);
            self.nodes.push(BubbleNode {
                record: record.clone(),
                primary_genre,
                world_pos: phyllotaxis_position(index),
                velocity: Vec2::ZERO,
                radius: radius_for_members(record.members),
                fill,
                previous_fill: fill,
                fill_changed_at: now,
            });
        }

        self.revision = self.revision.wrapping_add(1);
        tracing::debug!(
            batch = batch.len(),
            added,
            total = self.nodes.len(),
            "merged batch into node registry"
        );
        added
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dataset::sample_record;

    fn titles(graph: &BubbleGraph) -> Vec<String> {
        graph
            .nodes
            .iter()
            .map(|node| node.record.title.clone())
            .collect()
    }

    #[test]
    fn merging_the_same_batch_twice_is_a_no_op() {
        let batch = vec![
            sample_record("Akira", 1988, 8.2, 400_000),
            sample_record("Ghost in the Shell", 1995, 8.3, 800_000),
        ];

        let mut once = BubbleGraph::default();
        assert_eq!(once.merge_batch(&batch, ColorMode::Genre, 0.0), 2);

        let mut twice = BubbleGraph::default();
        twice.merge_batch(&batch, ColorMode::Genre, 0.0);
        let positions = twice.nodes.iter().map(|node| node.world_pos).collect::<Vec<_>>();
        let revision = twice.revision;
        assert_eq!(twice.merge_batch(&batch, ColorMode::Genre, 1.0), 0);

        assert_eq!(titles(&once), titles(&twice));
        assert_eq!(
            twice.nodes.iter().map(|node| node.world_pos).collect::<Vec<_>>(),
            positions
        );
        assert_eq!(twice.revision, revision);
    }

    #[test]
    fn only_novel_titles_are_appended() {
        let mut graph = BubbleGraph::default();
        graph.merge_batch(
            &[sample_record("Akira", 1988, 8.2, 400_000)],
            ColorMode::Genre,
            0.0,
        );
        let original = graph.nodes[0].world_pos;

        let added = graph.merge_batch(
            &[
                sample_record("Akira", 1988, 8.2, 400_000),
                sample_record("Cowboy Bebop", 1998, 8.75, 1_900_000),
                sample_record("Cowboy Bebop", 1998, 8.75, 1_900_000),
            ],
            ColorMode::Genre,
            1.0,
        );

        assert_eq!(added, 1);
        assert_eq!(titles(&graph), vec!["Akira", "Cowboy Bebop"]);
        assert_eq!(graph.nodes[0].world_pos, original);
        assert_eq!(graph.index_by_title.len(), graph.nodes.len());
        assert!(graph.node_by_title("Cowboy Bebop").is_some());
    }

    #[test]
    fn new_nodes_carry_primary_genre_radius_and_current_mode_fill() {
        let mut record = sample_record("Frieren", 2023, 9.3, 1_000_000);
        record.genres = "Adventure, Drama, Fantasy".to_owned();

        let mut graph = BubbleGraph::default();
        graph.merge_batch(&[record], ColorMode::Score, 0.0);

        let node = graph.node_by_title("Frieren").expect("merged");
        assert_eq!(node.primary_genre, "Adventure");
        assert_eq!(node.radius, 10.0);
        assert_eq!(node.fill, crate::app::encoding::score_color(9.3));
        assert_eq!(node.previous_fill, node.fill);
    }

    #[test]
    fn phyllotaxis_is_deterministic_and_spirals_outward() {
        assert_eq!(phyllotaxis_position(7), phyllotaxis_position(7));
        assert!(phyllotaxis_position(100).length() > phyllotaxis_position(10).length());
        assert!((phyllotaxis_position(0).length() - INITIAL_RADIUS * 0.5_f32.sqrt()).abs() < 1e-4);
    }
}
