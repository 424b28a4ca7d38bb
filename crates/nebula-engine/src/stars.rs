//! Stellar colour catalog.
//!
//! Assigns each particle a static colour, size and brightness once, when the pool
//! is created. The first `core_fraction` of the pool draws from a bright,
//! hot-star-heavy population; the rest (the halo) from a dimmer, redder one.
//! A linear dimming ramp over the particle index then stands in for distance
//! from the center.

use crate::core::rng::RandomSource;

/// `base + u^exponent * spread`; exponent > 1 biases toward `base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledRange {
    pub base: f32,
    pub spread: f32,
    pub exponent: f32,
}

impl SampledRange {
    pub const fn new(base: f32, spread: f32, exponent: f32) -> Self {
        Self { base, spread, exponent }
    }

    pub fn sample(&self, rng: &mut dyn RandomSource) -> f32 {
        self.base + rng.next_f32().powf(self.exponent) * self.spread
    }

    pub fn max(&self) -> f32 {
        self.base + self.spread
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StellarClass {
    pub name: &'static str,
    pub color: [f32; 3],
    pub size: SampledRange,
    pub brightness: SampledRange,
}

pub const STELLAR_CLASSES: [StellarClass; 9] = [
    StellarClass { name: "O", color: [0.61, 0.69, 1.00], size: SampledRange::new(1.6, 1.0, 2.0), brightness: SampledRange::new(1.1, 0.5, 2.0) },
    StellarClass { name: "B", color: [0.67, 0.75, 1.00], size: SampledRange::new(1.3, 0.8, 2.0), brightness: SampledRange::new(1.0, 0.4, 2.0) },
    StellarClass { name: "A", color: [0.79, 0.84, 1.00], size: SampledRange::new(1.1, 0.6, 2.0), brightness: SampledRange::new(0.9, 0.3, 2.0) },
    StellarClass { name: "F", color: [0.97, 0.97, 1.00], size: SampledRange::new(1.0, 0.5, 2.0), brightness: SampledRange::new(0.8, 0.3, 2.0) },
    StellarClass { name: "G", color: [1.00, 0.96, 0.92], size: SampledRange::new(0.9, 0.4, 2.5), brightness: SampledRange::new(0.7, 0.3, 2.0) },
    StellarClass { name: "K", color: [1.00, 0.82, 0.63], size: SampledRange::new(0.8, 0.4, 2.5), brightness: SampledRange::new(0.6, 0.3, 2.5) },
    StellarClass { name: "M", color: [1.00, 0.69, 0.45], size: SampledRange::new(0.6, 0.3, 3.0), brightness: SampledRange::new(0.45, 0.25, 3.0) },
    StellarClass { name: "red giant", color: [1.00, 0.55, 0.35], size: SampledRange::new(1.8, 1.2, 1.5), brightness: SampledRange::new(0.9, 0.4, 1.5) },
    StellarClass { name: "white dwarf", color: [0.85, 0.90, 1.00], size: SampledRange::new(0.4, 0.2, 3.0), brightness: SampledRange::new(0.6, 0.3, 2.0) },
];

/// Core population: young, hot and bright.
pub const CORE_WEIGHTS: [f32; 9] = [0.04, 0.10, 0.14, 0.16, 0.18, 0.14, 0.10, 0.10, 0.04];
/// Halo population: old, cool and dim.
pub const HALO_WEIGHTS: [f32; 9] = [0.0, 0.01, 0.03, 0.08, 0.14, 0.22, 0.38, 0.04, 0.10];

/// Brightness lost from the first particle to the last.
pub const DISTANCE_DIMMING: f32 = 0.45;
pub const MIN_BRIGHTNESS: f32 = 0.15;
pub const MAX_BRIGHTNESS: f32 = 1.6;

/// Per-particle static visual attributes, flat and index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarAttributes {
    /// `count * 3` RGB values.
    pub colors: Vec<f32>,
    pub sizes: Vec<f32>,
    pub brightnesses: Vec<f32>,
}

impl StarAttributes {
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Draw a class index from a weighted categorical distribution.
fn pick_class(weights: &[f32; 9], rng: &mut dyn RandomSource) -> usize {
    let total: f32 = weights.iter().sum();
    let mut roll = rng.next_f32() * total;
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            return i;
        }
        roll -= w;
    }
    // Float rounding can leave a sliver past the last non-zero weight.
    weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}

/// Generate colours, sizes and brightnesses for `count` particles.
pub fn generate(count: usize, core_fraction: f32, rng: &mut dyn RandomSource) -> StarAttributes {
    let core_count = ((count as f32 * core_fraction.clamp(0.0, 1.0)).round() as usize).min(count);
    let mut attrs = StarAttributes {
        colors: Vec::with_capacity(count * 3),
        sizes: Vec::with_capacity(count),
        brightnesses: Vec::with_capacity(count),
    };

    for i in 0..count {
        let weights = if i < core_count { &CORE_WEIGHTS } else { &HALO_WEIGHTS };
        let class = &STELLAR_CLASSES[pick_class(weights, rng)];
        let size = class.size.sample(rng);
        let brightness = class.brightness.sample(rng);

        let distance = i as f32 / count as f32;
        let dimmed = brightness * (1.0 - DISTANCE_DIMMING * distance);

        attrs.colors.extend_from_slice(&class.color);
        attrs.sizes.push(size);
        attrs.brightnesses.push(dimmed.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS));
    }
    attrs
}
