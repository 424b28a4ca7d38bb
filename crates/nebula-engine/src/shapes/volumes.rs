//! Volumetric templates: solid sphere, core/halo cluster, star slab.

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::core::rng::RandomSource;

/// Radius of the dense inner tier, as a fraction of scale.
pub const CORE_RADIUS: f32 = 0.3;

const STAR_POINTS: usize = 5;
const STAR_INNER_RADIUS: f32 = 0.4;
const STAR_THICKNESS: f32 = 0.25;

/// Solid sphere with uniform density (inverse-cube-root radius sampling).
pub fn uniform_sphere(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    (0..count).map(|_| rng.unit_ball() * scale).collect()
}

/// Two-tier globular cluster.
///
/// The first `core_fraction` of the points fill the core with `r ∝ u^0.5`
/// (denser toward the center); the rest form a halo outside the core with
/// `r ∝ u^1.2`, biased toward its inner edge.
pub fn core_halo(count: usize, scale: f32, core_fraction: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let core_count = ((count as f32 * core_fraction.clamp(0.0, 1.0)).round() as usize).min(count);
    let core_radius = CORE_RADIUS * scale;
    let halo_depth = scale - core_radius;

    (0..count)
        .map(|i| {
            let r = if i < core_count {
                core_radius * rng.next_f32().sqrt()
            } else {
                core_radius + halo_depth * rng.next_f32().powf(1.2)
            };
            rng.unit_vector() * r
        })
        .collect()
}

/// Five-pointed star slab, thickest at the center.
pub fn star(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let sector = TAU / STAR_POINTS as f32;
    (0..count)
        .map(|_| {
            let theta = rng.next_f32() * TAU;
            // 0 at a tip, 1 at the next tip, valley halfway.
            let a = (theta - FRAC_PI_2).rem_euclid(sector) / sector;
            let valley = 1.0 - (2.0 * a - 1.0).abs();
            let edge = scale * (1.0 + (STAR_INNER_RADIUS - 1.0) * valley);
            let r = edge * rng.next_f32().sqrt();
            let bulge = STAR_THICKNESS * scale * (1.0 - r / edge.max(f32::EPSILON));
            Vec3::new(r * theta.cos(), r * theta.sin(), rng.signed() * bulge)
        })
        .collect()
}
