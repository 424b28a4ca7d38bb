pub mod camera;
pub mod pipeline;
pub mod shaders;
pub mod traits;
pub mod uniforms;

// Re-export key types for convenient access
pub use camera::{Camera3D, CameraUniform};
pub use pipeline::{FrameInputs, RenderPipeline};
pub use shaders::{particle_shader, trail_shader};
pub use traits::{FrameData, Renderer};
pub use uniforms::{ParticleUniforms, UNIFORM_FLOATS};
