mod forces;
mod quadtree;

use eframe::egui::Vec2;

use super::BubbleGraph;
use forces::{ChargeParams, CollisionParams, accumulate_charge_for_node, accumulate_collision_pairs};
use quadtree::QuadNode;

pub const DEFAULT_SETTLE_SECS: f32 = 6.0;

const ALPHA_MIN: f32 = 0.001;
const VELOCITY_DECAY: f32 = 0.4;
const COLLISION_STRENGTH: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct PhysicsConfig {
    pub(in crate::app) center_strength: f32,
    pub(in crate::app) charge_strength: f32,
    pub(in crate::app) collision_padding: f32,
    pub(in crate::app) theta: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            center_strength: 0.2,
            charge_strength: -10.0,
            collision_padding: 2.0,
            theta: 0.9,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum HaltReason {
    Deadline,
    Cooled,
    Manual,
}

/// Alpha-cooled simulation with a hard wall-clock stop. Every restart reheats
/// to full energy and pushes the stop time out; it never waits for
/// convergence.
#[derive(Clone, Debug)]
pub(in crate::app) struct ForceSimulation {
    alpha: f32,
    alpha_decay: f32,
    deadline: Option<f64>,
    ticks: u64,
}

impl Default for ForceSimulation {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
            deadline: None,
            ticks: 0,
        }
    }
}

impl ForceSimulation {
    pub(in crate::app) fn restart(&mut self, now: f64, settle_secs: f32) {
        let superseded = self.deadline.is_some();
        self.alpha = 1.0;
        self.ticks = 0;
        self.deadline = Some(now + f64::from(settle_secs.max(0.0)));
        tracing::debug!(now, settle_secs, superseded, "force simulation restarted");
    }

    pub(in crate::app) fn stop(&mut self, reason: HaltReason) {
        if self.deadline.take().is_some() {
            tracing::debug!(
                ?reason,
                ticks = self.ticks,
                alpha = self.alpha,
                "force simulation halted"
            );
        }
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn remaining_secs(&self, now: f64) -> Option<f64> {
        self.deadline.map(|deadline| (deadline - now).max(0.0))
    }

    /// Advances one tick. Returns whether the nodes moved.
    pub(in crate::app) fn step(
        &mut self,
        graph: &mut BubbleGraph,
        config: PhysicsConfig,
        now: f64,
    ) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now >= deadline {
            self.stop(HaltReason::Deadline);
            return false;
        }

        self.alpha += -self.alpha * self.alpha_decay;
        if self.alpha < ALPHA_MIN {
            self.stop(HaltReason::Cooled);
            return false;
        }

        apply_forces(graph, config, self.alpha);
        for node in &mut graph.nodes {
            node.velocity *= 1.0 - VELOCITY_DECAY;
            node.world_pos += node.velocity;
        }
        self.ticks += 1;
        true
    }
}

fn apply_forces(graph: &mut BubbleGraph, config: PhysicsConfig, alpha: f32) {
    let node_count = graph.nodes.len();
    if node_count == 0 {
        return;
    }

    let scratch = &mut graph.physics_scratch;
    scratch.positions.clear();
    scratch.radii.clear();
    let mut max_radius = 0.0_f32;
    for node in &graph.nodes {
        let radius = node.radius + config.collision_padding;
        scratch.positions.push(node.world_pos);
        scratch.radii.push(radius);
        max_radius = max_radius.max(radius);
    }

    let center_pull = config.center_strength.max(0.0) * alpha;
    for node in &mut graph.nodes {
        node.velocity -= node.world_pos * center_pull;
    }

    if node_count < 2 {
        return;
    }

    if let Some(quadtree) = QuadNode::build(&scratch.positions) {
        let params = ChargeParams {
            strength: config.charge_strength * alpha,
            theta: config.theta.clamp(0.1, 2.0),
        };
        for (index, node) in graph.nodes.iter_mut().enumerate() {
            accumulate_charge_for_node(
                &quadtree,
                index,
                &scratch.positions,
                params,
                &mut node.velocity,
            );
        }
    }

    // Collisions resolve against where nodes are about to be.
    for (position, node) in scratch.positions.iter_mut().zip(&graph.nodes) {
        *position = node.world_pos + node.velocity;
    }
    scratch.deltas.clear();
    scratch.deltas.resize(node_count, Vec2::ZERO);

    if let Some(quadtree) = QuadNode::build(&scratch.positions) {
        let max_reach = max_radius * 2.0;
        accumulate_collision_pairs(
            &quadtree,
            &quadtree,
            true,
            &scratch.positions,
            &scratch.radii,
            CollisionParams {
                strength: COLLISION_STRENGTH,
                max_reach_sq: max_reach * max_reach,
            },
            &mut scratch.deltas,
        );
    }

    for (node, delta) in graph.nodes.iter_mut().zip(&scratch.deltas) {
        node.velocity += *delta;
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::app::encoding::ColorMode;
    use crate::dataset::sample_record;

    fn graph_of(count: usize) -> BubbleGraph {
        let records = (0..count)
            .map(|index| sample_record(&format!("title-{index}"), 2000, 7.5, 90_000 + index as u64))
            .collect::<Vec<_>>();
        let mut graph = BubbleGraph::default();
        graph.merge_batch(&records, ColorMode::Genre, 0.0);
        graph
    }

    #[test]
    fn halts_at_the_deadline_without_converging() {
        let mut graph = graph_of(30);
        let mut simulation = ForceSimulation::default();
        simulation.restart(0.0, 1.0);

        assert!(simulation.step(&mut graph, PhysicsConfig::default(), 0.5));
        assert!(simulation.alpha() > ALPHA_MIN);
        assert!(!simulation.step(&mut graph, PhysicsConfig::default(), 1.0));
        assert!(!simulation.is_running());

        let frozen = graph.nodes.iter().map(|node| node.world_pos).collect::<Vec<_>>();
        assert!(!simulation.step(&mut graph, PhysicsConfig::default(), 1.5));
        let after = graph.nodes.iter().map(|node| node.world_pos).collect::<Vec<_>>();
        assert_eq!(frozen, after);
    }

    #[test]
    fn restarting_supersedes_the_previous_deadline() {
        let mut simulation = ForceSimulation::default();
        simulation.restart(0.0, 6.0);
        simulation.restart(4.0, 6.0);

        assert_eq!(simulation.remaining_secs(7.0), Some(3.0));
        assert_eq!(simulation.alpha(), 1.0);
    }

    #[test]
    fn cools_below_alpha_min_and_stops() {
        let mut graph = graph_of(2);
        let mut simulation = ForceSimulation::default();
        simulation.restart(0.0, 1.0e6);

        let mut ticks = 0;
        while simulation.step(&mut graph, PhysicsConfig::default(), 1.0) {
            ticks += 1;
            assert!(ticks < 1_000, "simulation never cooled");
        }
        assert!(ticks >= 290);
        assert!(!simulation.is_running());
    }

    #[test]
    fn collision_separates_overlapping_nodes() {
        let mut graph = graph_of(2);
        graph.nodes[0].world_pos = vec2(-0.5, 0.0);
        graph.nodes[1].world_pos = vec2(0.5, 0.0);
        let reach = graph.nodes[0].radius + graph.nodes[1].radius + 4.0;

        let mut simulation = ForceSimulation::default();
        simulation.restart(0.0, 60.0);
        for tick in 0..200 {
            simulation.step(&mut graph, PhysicsConfig::default(), f64::from(tick) * 0.016);
        }

        let distance = (graph.nodes[0].world_pos - graph.nodes[1].world_pos).length();
        assert!(distance > reach * 0.9, "nodes still overlap: {distance} < {reach}");
    }

    #[test]
    fn centering_pulls_the_cloud_toward_the_origin() {
        let mut graph = graph_of(20);
        for node in &mut graph.nodes {
            node.world_pos += vec2(400.0, -300.0);
        }

        let mut simulation = ForceSimulation::default();
        simulation.restart(0.0, 60.0);
        for tick in 0..150 {
            simulation.step(&mut graph, PhysicsConfig::default(), f64::from(tick) * 0.016);
        }

        let centroid = graph
            .nodes
            .iter()
            .fold(Vec2::ZERO, |sum, node| sum + node.world_pos)
            / graph.nodes.len() as f32;
        assert!(centroid.length() < 50.0, "centroid drifted to {centroid:?}");
    }
}
