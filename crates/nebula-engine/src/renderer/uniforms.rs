//! Per-frame uniform block shared by the particle and trail shaders.

use bytemuck::{Pod, Zeroable};

use super::camera::Camera3D;

/// 192 bytes, std140-compatible; field order matches `ParticleUniforms` in WGSL.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    /// Simulated seconds; drives wobble, twinkle and noise.
    pub time: f32,
    pub tension: f32,
    pub explosion: f32,
    pub pulse_radius: f32,
    pub pulse_strength: f32,
    pub pulse_width: f32,
    /// Pixels per unit of particle size at unit depth.
    pub point_size: f32,
    pub pixel_ratio: f32,
    /// RGB tint, alpha unused.
    pub tint: [f32; 4],
    /// Physical viewport size in pixels.
    pub viewport: [f32; 2],
    pub _pad: [f32; 2],
}

pub const UNIFORM_FLOATS: usize = std::mem::size_of::<ParticleUniforms>() / 4;

impl Default for ParticleUniforms {
    fn default() -> Self {
        let identity = glam::Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_proj: identity,
            view: identity,
            time: 0.0,
            tension: 0.0,
            explosion: 0.0,
            pulse_radius: 0.0,
            pulse_strength: 0.0,
            pulse_width: 1.0,
            point_size: 60.0,
            pixel_ratio: 1.0,
            tint: [1.0; 4],
            viewport: [1.0, 1.0],
            _pad: [0.0; 2],
        }
    }
}

impl ParticleUniforms {
    pub fn set_camera(&mut self, camera: &Camera3D) {
        let cam = camera.uniform();
        self.view_proj = cam.view_proj;
        self.view = cam.view;
    }

    pub fn set_tint(&mut self, rgb: [f32; 3]) {
        self.tint = [rgb[0], rgb[1], rgb[2], 1.0];
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_192_bytes() {
        assert_eq!(std::mem::size_of::<ParticleUniforms>(), 192);
        assert_eq!(UNIFORM_FLOATS, 48);
        assert_eq!(std::mem::offset_of!(ParticleUniforms, time), 128);
        assert_eq!(std::mem::offset_of!(ParticleUniforms, tint), 160);
        assert_eq!(std::mem::offset_of!(ParticleUniforms, viewport), 176);
    }

    #[test]
    fn tint_fills_alpha() {
        let mut u = ParticleUniforms::default();
        u.set_tint([0.5, 0.8, 1.0]);
        assert_eq!(u.tint, [0.5, 0.8, 1.0, 1.0]);
        assert_eq!(u.as_floats()[40..44], [0.5, 0.8, 1.0, 1.0]);
    }
}
