use crate::gesture::GestureConfig;
use crate::shapes::{ShapeId, DEFAULT_CORE_FRACTION};
use crate::sim::{PulseConfig, TrailConfig, TransitionConfig, TransitionMode};

/// Particle budget by device capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerformanceTier {
    Low,
    #[default]
    Medium,
    High,
}

impl PerformanceTier {
    pub fn particle_count(self) -> usize {
        match self {
            Self::Low => 6_000,
            Self::Medium => 15_000,
            Self::High => 30_000,
        }
    }

    /// Host wire code: 0 = low, 1 = medium, 2 = high. Unknown codes map to medium.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Low,
            2 => Self::High,
            _ => Self::Medium,
        }
    }
}

/// Configuration for the scene, fixed at creation.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Pool size; never changes after creation.
    pub particle_count: usize,
    /// World-space radius of the shape templates.
    pub shape_scale: f32,
    /// Fraction of the pool in the bright core population.
    pub core_fraction: f32,
    pub seed: u64,
    /// Largest simulated frame delta in seconds.
    pub max_dt: f32,
    /// World units the cloud travels as the hands cross the frame.
    pub gesture_offset_range: f32,
    pub camera_distance: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Pixels per unit of particle size at unit depth.
    pub point_size: f32,
    /// Maximum scene events buffered per frame.
    pub max_events: usize,
    pub initial_shape: ShapeId,
    pub initial_mode: TransitionMode,
    pub initial_tint: [f32; 3],
    pub transition: TransitionConfig,
    pub trail: TrailConfig,
    pub pulse: PulseConfig,
    pub gesture: GestureConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: PerformanceTier::default().particle_count(),
            shape_scale: 5.0,
            core_fraction: DEFAULT_CORE_FRACTION,
            seed: 0x5eed_cafe,
            max_dt: 0.05,
            gesture_offset_range: 4.0,
            camera_distance: 18.0,
            fov_y: 60f32.to_radians(),
            point_size: 60.0,
            max_events: 32,
            initial_shape: ShapeId::default(),
            initial_mode: TransitionMode::default(),
            initial_tint: [1.0, 1.0, 1.0],
            transition: TransitionConfig::default(),
            trail: TrailConfig::default(),
            pulse: PulseConfig::default(),
            gesture: GestureConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn for_tier(tier: PerformanceTier) -> Self {
        Self {
            particle_count: tier.particle_count(),
            ..Self::default()
        }
    }

    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_shape(mut self, shape: ShapeId) -> Self {
        self.initial_shape = shape;
        self
    }

    pub fn with_mode(mut self, mode: TransitionMode) -> Self {
        self.initial_mode = mode;
        self
    }

    pub fn with_tint(mut self, tint: [f32; 3]) -> Self {
        self.initial_tint = tint;
        self
    }

    pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = transition;
        self
    }
}
