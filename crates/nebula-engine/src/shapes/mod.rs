//! Shape catalog: pure point-cloud generators, one per named template.
//!
//! Every generator maps `(count, scale, rng)` to exactly `count` points whose
//! coordinates stay within `ShapeId::bound() * scale`. Generators own no state;
//! each call draws fresh randomness from the injected source.

mod celestial;
mod curves;
mod figures;
mod volumes;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::rng::RandomSource;

pub use celestial::{cosmic_web, galaxy, saturn};
pub use curves::{double_helix, heart, phyllotaxis, rose};
pub use figures::{fireworks, humanoid};
pub use volumes::{core_halo, star, uniform_sphere};

/// Fraction of points placed in the dense inner tier of the cluster template.
pub const DEFAULT_CORE_FRACTION: f32 = 0.2;

/// Named templates the UI can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeId {
    #[default]
    Sphere,
    Cluster,
    Heart,
    Flower,
    Saturn,
    Buddha,
    Fireworks,
    Dna,
    Galaxy,
    Star,
    Cosmos,
}

impl ShapeId {
    pub const ALL: [ShapeId; 11] = [
        ShapeId::Sphere,
        ShapeId::Cluster,
        ShapeId::Heart,
        ShapeId::Flower,
        ShapeId::Saturn,
        ShapeId::Buddha,
        ShapeId::Fireworks,
        ShapeId::Dna,
        ShapeId::Galaxy,
        ShapeId::Star,
        ShapeId::Cosmos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeId::Sphere => "sphere",
            ShapeId::Cluster => "cluster",
            ShapeId::Heart => "heart",
            ShapeId::Flower => "flower",
            ShapeId::Saturn => "saturn",
            ShapeId::Buddha => "buddha",
            ShapeId::Fireworks => "fireworks",
            ShapeId::Dna => "dna",
            ShapeId::Galaxy => "galaxy",
            ShapeId::Star => "star",
            ShapeId::Cosmos => "cosmos",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }

    /// Resolve a UI-provided name, falling back to the default template.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            log::warn!("unknown shape {:?}, falling back to {}", name, ShapeId::default().as_str());
            ShapeId::default()
        })
    }

    /// Upper bound C such that every coordinate satisfies |c| <= C * scale.
    pub fn bound(self) -> f32 {
        match self {
            ShapeId::Sphere => 1.0,
            ShapeId::Cluster => 1.0,
            ShapeId::Heart => 1.2,
            ShapeId::Flower => 1.15,
            ShapeId::Saturn => 1.4,
            ShapeId::Buddha => 1.1,
            ShapeId::Fireworks => 2.0,
            ShapeId::Dna => 1.1,
            ShapeId::Galaxy => 1.25,
            ShapeId::Star => 1.0,
            ShapeId::Cosmos => 1.1,
        }
    }
}

/// Generate `count` points for a template.
pub fn generate_points(shape: ShapeId, count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let points = match shape {
        ShapeId::Sphere => uniform_sphere(count, scale, rng),
        ShapeId::Cluster => core_halo(count, scale, DEFAULT_CORE_FRACTION, rng),
        ShapeId::Heart => heart(count, scale, rng),
        ShapeId::Flower => flower(count, scale, rng),
        ShapeId::Saturn => saturn(count, scale, rng),
        ShapeId::Buddha => humanoid(count, scale, rng),
        ShapeId::Fireworks => fireworks(count, scale, rng),
        ShapeId::Dna => double_helix(count, scale, rng),
        ShapeId::Galaxy => galaxy(count, scale, rng),
        ShapeId::Star => star(count, scale, rng),
        ShapeId::Cosmos => cosmic_web(count, scale, rng),
    };
    debug_assert_eq!(points.len(), count, "{} produced the wrong count", shape.as_str());
    points
}

/// Flat `[x, y, z, x, y, z, ...]` positions, length `count * 3`.
pub fn generate(shape: ShapeId, count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<f32> {
    let points = generate_points(shape, count, scale, rng);
    bytemuck::cast_slice::<Vec3, f32>(&points).to_vec()
}

/// Rose petals with a phyllotaxis seed head in the middle.
fn flower(count: usize, scale: f32, rng: &mut dyn RandomSource) -> Vec<Vec3> {
    let head = count / 4;
    let mut points = rose(count - head, scale, 5, rng);
    points.extend(phyllotaxis(head, scale * 0.25, rng));
    points
}

/// Split `count` into integer shares proportional to `weights`.
/// The last share absorbs rounding so the total is exact.
pub(crate) fn split_counts(count: usize, weights: &[f32]) -> Vec<usize> {
    let total: f32 = weights.iter().sum();
    let mut shares = Vec::with_capacity(weights.len());
    let mut assigned = 0;
    for (i, w) in weights.iter().enumerate() {
        let share = if i + 1 == weights.len() {
            count - assigned
        } else {
            (((count as f32) * w / total) as usize).min(count - assigned)
        };
        assigned += share;
        shares.push(share);
    }
    shares
}
