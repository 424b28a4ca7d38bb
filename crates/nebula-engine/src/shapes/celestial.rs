//! Astronomical templates: ringed planet, spiral galaxy, cosmic web.

use glam::{Quat, Vec3};
use std::f32::consts::TAU;

use super::split_counts;
use crate::core::rng::RandomSource;

const PLANET_SHARE: f32 = 0.45;
const PLANET_RADIUS: f32 = 0.55;
const PLANET_OBLATENESS: f32 = 0.88;
const RING_INNER: f32 = 0.7;
const RING_OUTER: f32 = 1.3;
const RING_TILT: f32 = 0.35;

const GALAXY_ARMS: usize = 3;
const GALAXY_CORE_SHARE: f32 = 0.2;
const GALAXY_WINDING: f32 = 1.7;

/// Sub-cluster weights of the cosmic web. Filaments take `FILAMENT_WEIGHT`;
/// whatever remains of 1.0 goes to the sparse background field.
const CLUSTER_WEIGHTS: [f32; 5] = [0.18, 0.14, 0.12, 0.10, 0.08];
const FILAMENT_WEIGHT: f32 = 0.25;
const FILAMENTS: [(usize, usize); 6] = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 2)];

/// Oblate planet carrying ~45% of the points plus a flat annulus, tilted toward the viewer.
pub fn saturn(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let planet = (count as f32 * PLANET_SHARE) as usize;
    let tilt = Quat::from_rotation_x(RING_TILT);
    (0..count)
        .map(|i| {
            let p = if i < planet {
                let mut p = rng.unit_ball() * PLANET_RADIUS;
                p.y *= PLANET_OBLATENESS;
                p
            } else {
                let r = rng.range(RING_INNER, RING_OUTER);
                let angle = rng.next_f32() * TAU;
                Vec3::new(r * angle.cos(), rng.signed() * 0.02, r * angle.sin())
            };
            tilt * p * scale
        })
        .collect()
}

/// Flattened core plus logarithmic-ish spiral arms whose lateral spread grows with radius.
pub fn galaxy(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let core = (count as f32 * GALAXY_CORE_SHARE) as usize;
    let arm_offset = TAU / GALAXY_ARMS as f32;
    (0..count)
        .map(|i| {
            let p = if i < core {
                let mut p = rng.unit_ball() * 0.22;
                p.y *= 0.35;
                p
            } else {
                let arm = (i % GALAXY_ARMS) as f32;
                let t = rng.next_f32().powf(0.8);
                let r = 0.12 + 0.88 * t;
                let theta = arm * arm_offset + (1.0 + 6.0 * t).ln() * GALAXY_WINDING;
                let spread = 0.03 + 0.09 * t;
                Vec3::new(
                    r * theta.cos() + rng.signed() * spread,
                    rng.signed() * 0.06 * (1.0 - 0.6 * t),
                    r * theta.sin() + rng.signed() * spread,
                )
            };
            p * scale
        })
        .collect()
}

/// Weighted sub-cluster spheres, filaments between cluster pairs, and a sparse field.
pub fn cosmic_web(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let centers: Vec<(Vec3, f32)> = CLUSTER_WEIGHTS
        .iter()
        .map(|_| {
            let c = Vec3::new(rng.signed() * 0.6, rng.signed() * 0.6, rng.signed() * 0.4);
            (c, rng.range(0.12, 0.22))
        })
        .collect();

    let mut weights = CLUSTER_WEIGHTS.to_vec();
    weights.push(FILAMENT_WEIGHT);
    let field_weight = (1.0 - weights.iter().sum::<f32>()).max(0.0);
    weights.push(field_weight);
    let shares = split_counts(count, &weights);

    let mut points = Vec::with_capacity(count);
    for (&(center, radius), &n) in centers.iter().zip(&shares) {
        for _ in 0..n {
            points.push(center + rng.unit_vector() * radius * rng.next_f32().sqrt());
        }
    }
    for _ in 0..shares[CLUSTER_WEIGHTS.len()] {
        let (a, b) = FILAMENTS[rng.index(FILAMENTS.len())];
        let p = centers[a].0.lerp(centers[b].0, rng.next_f32());
        points.push(p + rng.unit_vector() * 0.04 * rng.next_f32());
    }
    for _ in 0..shares[CLUSTER_WEIGHTS.len() + 1] {
        points.push(Vec3::new(rng.signed(), rng.signed(), rng.signed()));
    }
    points.into_iter().map(|p| p * scale).collect()
}
