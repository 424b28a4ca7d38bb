//! Composite templates: seated figure with halo, fireworks.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::core::rng::RandomSource;

/// One anatomical region of the seated figure, in units of scale.
#[derive(Debug, Clone, Copy)]
enum Region {
    /// Solid ellipsoid.
    Ellipsoid { center: Vec3, radii: Vec3 },
    /// Thick line segment.
    Segment { from: Vec3, to: Vec3, thickness: f32 },
    /// Ring in the XY plane.
    Ring { center: Vec3, radius: f32, thickness: f32 },
}

/// `(weight, region)`; weights sum to 1.
const FIGURE: [(f32, Region); 7] = [
    // head
    (0.14, Region::Ellipsoid { center: Vec3::new(0.0, 0.55, 0.0), radii: Vec3::new(0.16, 0.16, 0.16) }),
    // crown bump
    (0.03, Region::Ellipsoid { center: Vec3::new(0.0, 0.74, 0.0), radii: Vec3::new(0.06, 0.06, 0.06) }),
    // torso
    (0.30, Region::Ellipsoid { center: Vec3::new(0.0, 0.1, 0.0), radii: Vec3::new(0.3, 0.35, 0.2) }),
    // crossed legs
    (0.25, Region::Ellipsoid { center: Vec3::new(0.0, -0.38, 0.05), radii: Vec3::new(0.55, 0.14, 0.3) }),
    // left arm
    (0.07, Region::Segment { from: Vec3::new(-0.3, 0.3, 0.0), to: Vec3::new(-0.18, -0.2, 0.15), thickness: 0.06 }),
    // right arm
    (0.07, Region::Segment { from: Vec3::new(0.3, 0.3, 0.0), to: Vec3::new(0.18, -0.2, 0.15), thickness: 0.06 }),
    // halo
    (0.14, Region::Ring { center: Vec3::new(0.0, 0.55, -0.25), radius: 0.45, thickness: 0.03 }),
];

impl Region {
    fn sample(&self, rng: &mut dyn RandomSource) -> Vec3 {
        match *self {
            Region::Ellipsoid { center, radii } => center + rng.unit_ball() * radii,
            Region::Segment { from, to, thickness } => {
                from.lerp(to, rng.next_f32()) + rng.unit_ball() * thickness
            }
            Region::Ring { center, radius, thickness } => {
                let angle = rng.next_f32() * TAU;
                center
                    + Vec3::new(angle.cos(), angle.sin(), 0.0) * radius
                    + rng.unit_ball() * thickness
            }
        }
    }
}

/// Seated meditating figure with a halo behind the head.
/// Each point draws a uniform "section" value and lands in the region it selects.
pub fn humanoid(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let section = rng.next_f32();
            let mut acc = 0.0;
            let mut region = &FIGURE[FIGURE.len() - 1].1;
            for (weight, r) in FIGURE.iter() {
                acc += weight;
                if section < acc {
                    region = r;
                    break;
                }
            }
            region.sample(rng) * scale
        })
        .collect()
}

const BURST_SHARE: f32 = 0.85;
const GROUND_LEVEL: f32 = -0.9;

/// 3–5 bursts, each a sphere with `r ∝ √u`, plus sparks scattered along the ground.
pub fn fireworks(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let bursts: Vec<(Vec3, f32)> = (0..3 + rng.index(3))
        .map(|_| {
            let center = Vec3::new(rng.signed() * 0.6, rng.range(0.0, 0.8), rng.signed() * 0.4);
            (center, rng.range(0.3, 0.5))
        })
        .collect();
    let burst_points = (count as f32 * BURST_SHARE) as usize;

    (0..count)
        .map(|i| {
            let p = if i < burst_points {
                let (center, radius) = bursts[i % bursts.len()];
                center + rng.unit_vector() * radius * rng.next_f32().sqrt()
            } else {
                Vec3::new(
                    rng.signed(),
                    GROUND_LEVEL + rng.signed() * 0.1,
                    rng.signed(),
                )
            };
            p * scale
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    #[test]
    fn figure_weights_sum_to_one() {
        let total: f32 = FIGURE.iter().map(|(w, _)| w).sum();
        assert!((total - 1.0).abs() < 1e-5, "weights sum to {}", total);
    }

    #[test]
    fn figure_is_upright() {
        let mut rng = Rng::new(31);
        let points = humanoid(5000, 1.0, &mut rng);
        let head = points.iter().filter(|p| p.y > 0.4 && p.x.abs() < 0.2).count();
        let legs = points.iter().filter(|p| p.y < -0.25).count();
        assert!(head > 500, "head = {}", head);
        assert!(legs > 1000, "legs = {}", legs);
    }

    #[test]
    fn fireworks_bursts_sit_above_ground() {
        let mut rng = Rng::new(32);
        let count = 2000;
        let points = fireworks(count, 1.0, &mut rng);
        let burst_points = (count as f32 * BURST_SHARE) as usize;
        for p in &points[..burst_points] {
            assert!(p.y >= -0.5, "burst point below horizon: {}", p.y);
        }
        for p in &points[burst_points..] {
            assert!((p.y - GROUND_LEVEL).abs() <= 0.1 + 1e-5);
        }
    }
}
