pub mod api;
pub mod core;
pub mod shapes;
pub mod stars;
pub mod gesture;
pub mod sim;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;
pub mod prefs;

// Re-export key types at crate root for convenience
pub use api::config::{PerformanceTier, SceneConfig};
pub use api::scene::ParticleScene;
pub use api::types::{PulseReason, SceneEvent, SceneEventKind};
pub use crate::core::init::{InitComponent, InitError, InitStatus, InitTracker};
pub use crate::core::rng::{RandomSource, Rng};
pub use crate::core::time::FrameClock;
pub use shapes::ShapeId;
pub use stars::StarAttributes;
pub use gesture::{
    ControlCell, ControlSignals, DetectedHand, GestureConfig, GestureInterpreter, GestureState,
    HandLandmarks,
};
pub use sim::{
    ParticlePool, Phase, PulseWave, Simulation, StaticAttribute, TrailRing, TransitionConfig,
    TransitionMode, TransitionState,
};
pub use renderer::{Camera3D, FrameData, ParticleUniforms, RenderPipeline, Renderer};
pub use bridge::protocol::ProtocolLayout;
pub use input::queue::{ControlEvent, ControlQueue};
pub use prefs::{Preferences, PrefsError};

// Small math helpers
pub use extensions::{lerp, smoothstep, Easing};
