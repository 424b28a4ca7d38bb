//! Per-frame render preparation: camera, uniforms, one-time static upload.

use super::camera::Camera3D;
use super::traits::{FrameData, Renderer};
use super::uniforms::ParticleUniforms;
use crate::api::types::SceneEvent;
use crate::sim::{ParticlePool, PulseWave, TrailRing};

/// Scalar inputs for one frame's uniforms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInputs {
    pub time: f32,
    pub tension: f32,
    pub explosion: f32,
}

pub struct RenderPipeline {
    camera: Camera3D,
    uniforms: ParticleUniforms,
    static_uploaded: bool,
    pending_resize: Option<(u32, u32, f32)>,
    released: bool,
}

impl RenderPipeline {
    pub fn new(camera: Camera3D, point_size: f32) -> Self {
        let mut uniforms = ParticleUniforms {
            point_size,
            ..ParticleUniforms::default()
        };
        uniforms.set_camera(&camera);
        Self {
            camera,
            uniforms,
            static_uploaded: false,
            pending_resize: None,
            released: false,
        }
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn uniforms(&self) -> &ParticleUniforms {
        &self.uniforms
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Physical pixel size. Forwarded to the backend on the next submit.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.camera.resize(width as f32, height as f32);
        self.uniforms.set_camera(&self.camera);
        self.uniforms.viewport = [width.max(1) as f32, height.max(1) as f32];
        if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            self.uniforms.pixel_ratio = pixel_ratio;
        }
        self.pending_resize = Some((width, height, self.uniforms.pixel_ratio));
    }

    pub fn set_tint(&mut self, rgb: [f32; 3]) {
        self.uniforms.set_tint(rgb);
    }

    /// Refresh the per-frame uniforms.
    pub fn update(&mut self, inputs: FrameInputs, pulse: &PulseWave) {
        self.uniforms.time = inputs.time;
        self.uniforms.tension = inputs.tension.clamp(0.0, 1.0);
        self.uniforms.explosion = inputs.explosion.clamp(0.0, 1.0);
        self.uniforms.pulse_radius = pulse.radius();
        self.uniforms.pulse_strength = pulse.strength();
        self.uniforms.pulse_width = pulse.width();
    }

    /// Force the static attributes to be uploaded again (new pool or lost device).
    pub fn invalidate_static(&mut self) {
        self.static_uploaded = false;
    }

    /// Hand one frame to the backend.
    pub fn submit(
        &mut self,
        renderer: &mut dyn Renderer,
        pool: &ParticlePool,
        trail: &TrailRing,
        events: &[SceneEvent],
    ) {
        if self.released {
            return;
        }
        if let Some((width, height, ratio)) = self.pending_resize.take() {
            renderer.resize(width, height, ratio);
        }
        if !self.static_uploaded {
            renderer.upload_static(pool.attributes());
            self.static_uploaded = true;
        }
        renderer.draw(&FrameData {
            uniforms: &self.uniforms,
            positions: pool.positions(),
            trail_positions: trail.positions(),
            trail_alphas: trail.alphas(),
            trail_slots: trail.len(),
            count: pool.len(),
            events,
        });
    }

    /// Release the backend once; later submits are no-ops.
    pub fn release(&mut self, renderer: &mut dyn Renderer) {
        if !self.released {
            renderer.release();
            self.released = true;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::sim::StaticAttribute;

    /// Records what the pipeline asked of it.
    #[derive(Default)]
    pub struct RecordingRenderer {
        pub uploads: usize,
        pub uploaded_len: usize,
        pub draws: usize,
        pub last_count: usize,
        pub last_explosion: f32,
        pub last_events: usize,
        pub resizes: Vec<(u32, u32, f32)>,
        pub releases: usize,
    }

    impl Renderer for RecordingRenderer {
        fn backend(&self) -> &'static str {
            "recording"
        }

        fn upload_static(&mut self, attributes: &[StaticAttribute]) {
            self.uploads += 1;
            self.uploaded_len = attributes.len();
        }

        fn draw(&mut self, frame: &FrameData) {
            assert_eq!(frame.positions.len(), frame.count * 3);
            assert_eq!(frame.trail_positions.len(), frame.trail_slots * frame.count * 3);
            assert_eq!(frame.trail_alphas.len(), frame.trail_slots * frame.count);
            self.draws += 1;
            self.last_count = frame.count;
            self.last_explosion = frame.uniforms.explosion;
            self.last_events = frame.events.len();
        }

        fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
            self.resizes.push((width, height, pixel_ratio));
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }
}
