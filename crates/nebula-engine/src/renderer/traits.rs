//! Renderer seam between the scene and a GPU backend.
//!
//! The browser host renders with WebGPU from TypeScript; the web crate implements
//! this trait by publishing frames into a shared buffer the host reads. A native
//! backend would implement the same contract directly.

use super::uniforms::ParticleUniforms;
use crate::api::types::SceneEvent;
use crate::sim::StaticAttribute;

/// Complete frame data for rendering.
pub struct FrameData<'a> {
    pub uniforms: &'a ParticleUniforms,
    /// Live positions, `count * 3` floats.
    pub positions: &'a [f32],
    /// Trail snapshots, newest first, `trail_slots * count * 3` floats.
    pub trail_positions: &'a [f32],
    /// Per-slot per-particle trail alpha, `trail_slots * count` floats.
    pub trail_alphas: &'a [f32],
    pub trail_slots: usize,
    pub count: usize,
    /// Events emitted this frame.
    pub events: &'a [SceneEvent],
}

/// GPU backend contract.
pub trait Renderer {
    /// Backend identifier (e.g. "shared-buffer", "webgpu").
    fn backend(&self) -> &'static str;

    /// Upload the immutable per-particle attributes. Called once per pool.
    fn upload_static(&mut self, attributes: &[StaticAttribute]);

    /// Draw a complete frame: trails first (additive), then particles.
    fn draw(&mut self, frame: &FrameData);

    /// Viewport changed; `width`/`height` are physical pixels.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32);

    /// Free every GPU resource. No further calls follow.
    fn release(&mut self);
}
