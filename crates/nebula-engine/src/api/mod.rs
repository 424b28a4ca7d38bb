pub mod config;
pub mod scene;
pub mod types;

pub use config::{PerformanceTier, SceneConfig};
pub use scene::ParticleScene;
pub use types::{PulseReason, SceneEvent, SceneEventKind};
