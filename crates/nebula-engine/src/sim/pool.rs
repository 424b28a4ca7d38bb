//! The particle pool: live, target and velocity arrays plus static attributes.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::core::rng::RandomSource;
use crate::shapes::{self, ShapeId};
use crate::stars;

/// Per-particle attributes uploaded once. 6 floats = 24 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct StaticAttribute {
    pub color: [f32; 3],
    pub size: f32,
    pub brightness: f32,
    /// Random phase in [0, 1) seeding wobble and twinkle.
    pub seed: f32,
}

pub const STATIC_ATTRIBUTE_FLOATS: usize = 6;

/// Flat float view of an attribute slice, in upload order.
pub fn attributes_as_floats(attrs: &[StaticAttribute]) -> &[f32] {
    bytemuck::cast_slice(attrs)
}

/// Index-aligned particle arrays. `count` never changes after creation.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    pub current: Vec<Vec3>,
    pub target: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    attrs: Vec<StaticAttribute>,
}

impl ParticlePool {
    /// Build a pool sitting at rest on `shape`.
    pub fn new(
        count: usize,
        shape: ShapeId,
        scale: f32,
        core_fraction: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let target = shapes::generate_points(shape, count, scale, rng);
        let stars = stars::generate(count, core_fraction, rng);
        let attrs = (0..count)
            .map(|i| StaticAttribute {
                color: [
                    stars.colors[i * 3],
                    stars.colors[i * 3 + 1],
                    stars.colors[i * 3 + 2],
                ],
                size: stars.sizes[i],
                brightness: stars.brightnesses[i],
                seed: rng.next_f32(),
            })
            .collect();
        Self {
            current: target.clone(),
            velocity: vec![Vec3::ZERO; count],
            target,
            attrs,
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn attributes(&self) -> &[StaticAttribute] {
        &self.attrs
    }

    /// Flat `[x, y, z, ...]` view of the live positions.
    pub fn positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.current)
    }

    /// Replace the target geometry. Static attributes are untouched.
    pub fn retarget(&mut self, target: Vec<Vec3>) {
        debug_assert_eq!(target.len(), self.len(), "target length must match the pool");
        self.target = target;
        self.target.resize(self.current.len(), Vec3::ZERO);
    }

    /// Snap any non-finite particle back onto its (scaled, offset) target.
    /// Returns how many were repaired.
    pub fn sanitize(&mut self, scale: f32, offset: Vec3) -> usize {
        let mut repaired = 0;
        for i in 0..self.current.len() {
            if !self.current[i].is_finite() || !self.velocity[i].is_finite() {
                self.current[i] = self.target[i] * scale + offset;
                self.velocity[i] = Vec3::ZERO;
                repaired += 1;
            }
        }
        repaired
    }

    /// Largest per-particle distance to the scaled target.
    pub fn max_error(&self, scale: f32, offset: Vec3) -> f32 {
        self.current
            .iter()
            .zip(&self.target)
            .map(|(c, t)| c.distance(*t * scale + offset))
            .fold(0.0, f32::max)
    }
}
