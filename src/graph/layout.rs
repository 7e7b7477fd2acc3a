use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

use super::diagram::Diagram;

const MAX_ITERATIONS: usize = 400;
const MIN_DISTANCE: f32 = 0.5;
const SPRING_STRENGTH: f32 = 0.18;
const CENTER_PULL: f32 = 0.0012;
const OVERLAP_PUSH: f32 = 2.4;
const STEP_DAMPING: f32 = 0.92;
const COOLING: f32 = 0.965;
const TEMPERATURE_FLOOR: f32 = 0.25;
/// Largest per-node force below which the relaxation counts as settled;
/// this is what makes a repeated `arrange` a near-no-op.
const CONVERGENCE_EPS: f32 = 0.05;

/// One full spring-embedder relaxation. Unplaced nodes are seeded on a
/// circle with label-keyed jitter; placed ones relax from where the previous
/// call left them.
pub(super) fn run(diagram: &mut Diagram) {
    let ids = diagram.order.clone();
    let n = ids.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        let node = diagram.node_mut(ids[0]).expect("live slot");
        node.set_position(Vec2::ZERO);
        return;
    }

    let seed_radius = (n as f32).sqrt() * 60.0;
    for (index, &id) in ids.iter().enumerate() {
        let node = diagram.node_mut(id).expect("live slot");
        if node.placed {
            continue;
        }

        let jitter_key = node
            .label_text()
            .map(str::to_owned)
            .unwrap_or_else(|| index.to_string());
        let (jx, jy) = stable_pair(&jitter_key);
        let angle = (index as f32 / n as f32) * TAU;
        let radial = vec2(angle.cos(), angle.sin()) * seed_radius;
        node.set_position(radial + vec2(jx * 24.0, jy * 24.0));
    }

    let mut positions = Vec::with_capacity(n);
    let mut radii = Vec::with_capacity(n);
    for &id in &ids {
        let node = diagram.node(id).expect("live slot");
        positions.push(node.position());
        radii.push(node.size().max_elem() / 2.0);
    }

    let index_of = |target| {
        ids.iter()
            .position(|&id| id == target)
            .expect("edge endpoint is live")
    };
    let edges = diagram
        .edges()
        .map(|(parent, child)| (index_of(parent), index_of(child)))
        .collect::<Vec<_>>();

    let area = (seed_radius * 2.4).powi(2);
    let k = (area / n as f32).sqrt().max(24.0);
    let mut temperature = (k * 5.5).max(140.0);

    for _ in 0..MAX_ITERATIONS {
        let mut disp = vec![Vec2::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[i] - positions[j];
                let distance = delta.length().max(MIN_DISTANCE);
                let direction = if delta.length() > 0.0001 {
                    delta / distance
                } else {
                    let angle =
                        ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * TAU;
                    vec2(angle.cos(), angle.sin())
                };

                let force = (k * k) / distance;
                disp[i] += direction * force;
                disp[j] -= direction * force;

                let min_separation = (radii[i] + radii[j]) * 3.0;
                if distance < min_separation {
                    let push = (min_separation - distance) * OVERLAP_PUSH;
                    disp[i] += direction * push;
                    disp[j] -= direction * push;
                }
            }
        }

        for &(from, to) in &edges {
            if from == to {
                continue;
            }

            let delta = positions[from] - positions[to];
            let distance = delta.length().max(MIN_DISTANCE);
            let direction = delta / distance;

            let ideal_length = k + (radii[from] + radii[to]) * 3.5;
            let force = (distance - ideal_length) * SPRING_STRENGTH;
            disp[from] -= direction * force;
            disp[to] += direction * force;
        }

        for i in 0..n {
            disp[i] -= positions[i] * CENTER_PULL;
        }

        let mut max_force = 0.0_f32;
        for i in 0..n {
            let demand = disp[i];
            let length = demand.length();
            max_force = max_force.max(length);
            if length > 0.0 {
                positions[i] += demand / length * length.min(temperature) * STEP_DAMPING;
            }
        }

        // Cancel collective drift so gravity only has to contain the spread.
        let mut centroid = Vec2::ZERO;
        for &position in &positions {
            centroid += position;
        }
        centroid /= n as f32;
        if centroid.length_sq() > 0.000_001 {
            for position in &mut positions {
                *position -= centroid;
            }
        }

        temperature = (temperature * COOLING).max(TEMPERATURE_FLOOR);
        if max_force < CONVERGENCE_EPS {
            break;
        }
    }

    for (index, &id) in ids.iter().enumerate() {
        let node = diagram.node_mut(id).expect("live slot");
        node.set_position(positions[index]);
    }
}
