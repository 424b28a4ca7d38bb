use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Perspective camera looking at the origin.
/// Produces the view and projection matrices for the particle shaders.
pub struct Camera3D {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

impl Camera3D {
    /// Camera on +Z at `distance`, looking at the origin.
    pub fn new(distance: f32, fov_y: f32, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            fov_y,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Right-handed perspective, depth in [0, 1] (WebGPU convention).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            view: self.view_matrix().to_cols_array_2d(),
        }
    }

    /// Resize the viewport. Zero-sized viewports (minimized tab) keep the old aspect.
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        if viewport_width > 0.0 && viewport_height > 0.0 {
            self.aspect = viewport_width / viewport_height;
        }
    }

    /// Distance from the eye along the view axis.
    pub fn depth_of(&self, point: Vec3) -> f32 {
        -self.view_matrix().transform_point3(point).z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera3D::new(18.0, 60f32.to_radians(), 16.0 / 9.0);
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth in WebGPU range, got {}", ndc.z);
    }

    #[test]
    fn nearer_points_have_smaller_depth() {
        let cam = Camera3D::new(18.0, 1.0, 1.0);
        assert!((cam.depth_of(Vec3::ZERO) - 18.0).abs() < 1e-4);
        assert!(cam.depth_of(Vec3::new(0.0, 0.0, 5.0)) < cam.depth_of(Vec3::ZERO));
    }

    #[test]
    fn resize_tracks_aspect() {
        let mut cam = Camera3D::new(18.0, 1.0, 1.0);
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        cam.resize(0.0, 0.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
