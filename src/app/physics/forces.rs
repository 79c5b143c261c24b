use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

/// Below this squared distance the charge falls off with distance, not its square.
const CHARGE_DISTANCE_MIN_SQ: f32 = 1.0;

fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Velocity change on a node at `point` from `weight` units of charge at `source`.
/// Negative `strength` repels.
fn charge_from(point: Vec2, source: Vec2, strength: f32, weight: f32, jitter: Vec2) -> Vec2 {
    let mut delta = source - point;
    let mut distance_sq = delta.length_sq();
    if distance_sq < 1e-12 {
        delta = jitter * 1e-3;
        distance_sq = delta.length_sq();
    }
    if distance_sq < CHARGE_DISTANCE_MIN_SQ {
        distance_sq = (CHARGE_DISTANCE_MIN_SQ * distance_sq).sqrt();
    }
    delta * (strength * weight / distance_sq)
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    /// Charge strength already scaled by alpha.
    pub(super) strength: f32,
    pub(super) theta: f32,
}

pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    velocity: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other in &node.indices {
            if other != index {
                *velocity += charge_from(
                    point,
                    positions[other],
                    params.strength,
                    1.0,
                    fallback_direction(other, index),
                );
            }
        }
        return;
    }

    let distance = (node.center_of_mass - point).length().max(0.0001);
    let far_enough =
        !node.bounds.contains(point) && node.bounds.side_length() / distance < params.theta;
    if far_enough {
        *velocity += charge_from(
            point,
            node.center_of_mass,
            params.strength,
            node.mass,
            fallback_direction(index, 0),
        );
        return;
    }

    for child in node.children() {
        accumulate_charge_for_node(child, index, positions, params, velocity);
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) max_reach_sq: f32,
}

/// Pushes an overlapping pair apart, the smaller node moving more.
fn collide_pair(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    strength: f32,
    deltas: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut offset = positions[from] - positions[to];
    let mut distance_sq = offset.length_sq();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq < 1e-12 {
        offset = fallback_direction(from, to) * 1e-3;
        distance_sq = offset.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = offset * ((reach - distance) / distance * strength);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let total = (from_sq + to_sq).max(f32::EPSILON);

    deltas[from] += push * (to_sq / total);
    deltas[to] -= push * (from_sq / total);
}

pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    if node_a.bounds.gap_sq(node_b.bounds) > params.max_reach_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    collide_pair(from, to, positions, radii, params.strength, deltas);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    collide_pair(from, to, positions, radii, params.strength, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        let children = node_a.children().collect::<Vec<_>>();
        for (offset, child_a) in children.iter().enumerate() {
            accumulate_collision_pairs(child_a, child_a, true, positions, radii, params, deltas);
            for child_b in &children[offset + 1..] {
                accumulate_collision_pairs(
                    child_a, child_b, false, positions, radii, params, deltas,
                );
            }
        }
        return;
    }

    let split_a = !node_a.is_leaf()
        && (node_b.is_leaf() || node_a.bounds.half_extent >= node_b.bounds.half_extent);

    if split_a {
        for child in node_a.children() {
            accumulate_collision_pairs(child, node_b, false, positions, radii, params, deltas);
        }
    } else {
        for child in node_b.children() {
            accumulate_collision_pairs(node_a, child, false, positions, radii, params, deltas);
        }
    }
}
