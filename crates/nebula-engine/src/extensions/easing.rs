// extensions/easing.rs
//
// Ramp curves for the transition state machine, plus the scalar helpers the
// CPU side shares with the shaders.

/// Shape of a normalized 0..1 ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Slow start; used to land particles at the end of reforming.
    QuadIn,
    /// Fast start; used for the explosion intensity ramp.
    QuadOut,
}

impl Easing {
    /// Map `t` (clamped to [0, 1]) through the curve. Both ends are fixed points.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite step between two edges, as WGSL `smoothstep`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
