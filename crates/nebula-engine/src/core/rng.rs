//! Seedable pseudo-random number generator (xorshift64) and the
//! `RandomSource` seam every generator in the engine draws from.

use glam::Vec3;
use std::f32::consts::TAU;

/// Source of uniform random numbers.
///
/// Shape and star generators take `&mut dyn RandomSource` so tests can inject a
/// seeded generator while the host seeds production runs from its own entropy.
pub trait RandomSource {
    /// Uniform sample in [0, 1).
    fn next_f32(&mut self) -> f32;

    /// Uniform sample in [min, max).
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Uniform sample in [-1, 1).
    fn signed(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f32() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Uniformly distributed direction on the unit sphere.
    fn unit_vector(&mut self) -> Vec3 {
        let z = self.signed();
        let phi = self.next_f32() * TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * phi.cos(), r * phi.sin(), z)
    }

    /// Uniformly distributed point inside the unit ball (inverse-cube-root radius).
    fn unit_ball(&mut self) -> Vec3 {
        self.unit_vector() * self.next_f32().cbrt()
    }
}

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, fast, no-std compatible.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random number in [0, upper_bound).
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Derive an independent generator, e.g. one per regenerated shape.
    pub fn fork(&mut self) -> Rng {
        Rng::new(self.next_u64() ^ 0x9E37_79B9_7F4A_7C15)
    }
}

impl RandomSource for Rng {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill the f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }
}
