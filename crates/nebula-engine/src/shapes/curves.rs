//! Parametric-curve templates: heart, rose, phyllotaxis disk, double helix.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

use crate::core::rng::RandomSource;

/// Golden angle π(3 − √5), in radians.
pub const GOLDEN_ANGLE: f32 = PI * (3.0 - 2.236_068);

const HEART_EXTENT: f32 = 17.0;
const HEART_Y_SHIFT: f32 = 2.5;
const HEART_DEPTH: f32 = 0.35;
const HEART_JITTER: f32 = 0.04;

const HELIX_TURNS: f32 = 3.0;
const HELIX_RADIUS: f32 = 0.35;
const HELIX_RUNGS: usize = 24;
const HELIX_RUNG_SHARE: f32 = 0.2;

/// Classic heart curve `x = 16 sin³t, y = 13 cos t − 5 cos 2t − 2 cos 3t − cos 4t`,
/// filled toward its center and given depth so it reads as a volume.
pub fn heart(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let t = rng.next_f32() * TAU;
            let s = t.sin();
            let x = 16.0 * s * s * s;
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            let fill = rng.next_f32().sqrt();
            let depth = HEART_DEPTH * (1.0 - fill * fill).max(0.0).sqrt() * rng.signed();
            let outline = Vec3::new(
                x / HEART_EXTENT * fill,
                (y + HEART_Y_SHIFT) / HEART_EXTENT * fill,
                depth,
            );
            (outline + rng.unit_vector() * HEART_JITTER * rng.next_f32()) * scale
        })
        .collect()
}

/// Rose curve `r = cos(kθ)`: `petals` petals for odd k, filled and cupped upward.
pub fn rose(count: usize, scale: f32, petals: u32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let k = petals.max(1) as f32;
    (0..count)
        .map(|_| {
            let theta = rng.next_f32() * PI;
            let r = (k * theta).cos() * rng.next_f32().sqrt();
            let cup = 0.25 * r * r - 0.1;
            let p = Vec3::new(r * theta.cos(), r * theta.sin(), cup);
            (p + rng.unit_vector() * 0.03 * rng.next_f32()) * scale
        })
        .collect()
}

/// Sunflower seed head: point `i` sits at angle `i·φ` and radius `∝ √i`.
pub fn phyllotaxis(count: usize, radius: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let n = count.max(1) as f32;
    (0..count)
        .map(|i| {
            let rho = ((i as f32 + 0.5) / n).sqrt();
            let angle = i as f32 * GOLDEN_ANGLE;
            let dome = 0.1 * (1.0 - rho * rho);
            Vec3::new(
                rho * angle.cos(),
                rho * angle.sin(),
                dome + rng.signed() * 0.03,
            ) * radius
        })
        .collect()
}

/// Two phase-offset helical strands joined by evenly spaced rungs.
pub fn double_helix(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let rung_points = (count as f32 * HELIX_RUNG_SHARE) as usize;
    let strand_points = count - rung_points;
    let strand = |t: f32, phase: f32| {
        let angle = t * HELIX_TURNS * TAU + phase;
        Vec3::new(
            HELIX_RADIUS * angle.cos(),
            2.0 * t - 1.0,
            HELIX_RADIUS * angle.sin(),
        )
    };

    let mut points = Vec::with_capacity(count);
    for i in 0..strand_points {
        let phase = if i % 2 == 0 { 0.0 } else { PI };
        let p = strand(rng.next_f32(), phase) + rng.unit_vector() * 0.03 * rng.next_f32();
        points.push(p * scale);
    }
    for _ in 0..rung_points {
        let t = (rng.index(HELIX_RUNGS) as f32 + 0.5) / HELIX_RUNGS as f32;
        let a = strand(t, 0.0);
        let b = strand(t, PI);
        let p = a.lerp(b, rng.next_f32()) + rng.unit_vector() * 0.015 * rng.next_f32();
        points.push(p * scale);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;

    #[test]
    fn golden_angle_value() {
        assert!((GOLDEN_ANGLE - 2.399_963).abs() < 1e-4);
    }

    #[test]
    fn heart_is_wider_than_deep() {
        let mut rng = Rng::new(4);
        let points = heart(5000, 1.0, &mut rng);
        let max_x = points.iter().map(|p| p.x.abs()).fold(0.0, f32::max);
        let max_z = points.iter().map(|p| p.z.abs()).fold(0.0, f32::max);
        assert!(max_x > 0.8, "max_x = {}", max_x);
        assert!(max_z < 0.45, "max_z = {}", max_z);
    }

    #[test]
    fn heart_has_cleft_at_top() {
        // The outline dips at x = 0 on top: no point near (0, top of lobes).
        let mut rng = Rng::new(6);
        let points = heart(20_000, 1.0, &mut rng);
        let top = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let center_top = points
            .iter()
            .filter(|p| p.x.abs() < 0.05)
            .map(|p| p.y)
            .fold(f32::MIN, f32::max);
        assert!(center_top < top - 0.1, "center {} vs top {}", center_top, top);
    }

    #[test]
    fn phyllotaxis_fills_disk_evenly() {
        let mut rng = Rng::new(1);
        let points = phyllotaxis(1000, 1.0, &mut rng);
        let inner = points.iter().filter(|p| p.truncate().length() < 0.5_f32.sqrt()).count();
        // Half the area, half the points.
        assert!((480..=520).contains(&inner), "inner = {}", inner);
    }

    #[test]
    fn helix_spans_full_height() {
        let mut rng = Rng::new(10);
        let points = double_helix(4000, 2.0, &mut rng);
        let min_y = points.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        assert!(min_y < -1.8 && max_y > 1.8, "y range {}..{}", min_y, max_y);
        for p in &points {
            let radial = Vec3::new(p.x, 0.0, p.z).length();
            assert!(radial <= (HELIX_RADIUS + 0.03) * 2.0 + 1e-4);
        }
    }

    #[test]
    fn rose_cups_upward_toward_petal_tips() {
        let mut rng = Rng::new(3);
        let points = rose(5000, 1.0, 5, &mut rng);
        let (mut near, mut far) = (Vec::new(), Vec::new());
        for p in &points {
            let r = p.truncate().length();
            if r < 0.2 {
                near.push(p.z);
            } else if r > 0.8 {
                far.push(p.z);
            }
        }
        let mean = |v: &[f32]| v.iter().sum::<f32>() / v.len().max(1) as f32;
        assert!(!near.is_empty() && !far.is_empty());
        assert!(mean(&far) > mean(&near), "far {} near {}", mean(&far), mean(&near));
    }
}
