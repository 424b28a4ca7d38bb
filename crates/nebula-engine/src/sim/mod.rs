//! Particle simulation: pool, transition state machine, trails and pulse.
//!
//! Everything here runs on the frame thread. Gesture input arrives only as a
//! [`Drive`] computed from the control cell snapshot.

pub mod pool;
pub mod pulse;
pub mod trail;
pub mod transition;

pub use pool::{ParticlePool, StaticAttribute, STATIC_ATTRIBUTE_FLOATS};
pub use pulse::{pulse_band, PulseConfig, PulseWave};
pub use trail::{TrailConfig, TrailRing};
pub use transition::{Drive, Phase, TransitionConfig, TransitionMode, TransitionState};

use glam::Vec3;

use crate::core::rng::{RandomSource, Rng};

/// Owns the pool and its transition state.
pub struct Simulation {
    pool: ParticlePool,
    state: TransitionState,
    config: TransitionConfig,
    rng: Rng,
}

impl Simulation {
    pub fn new(pool: ParticlePool, config: TransitionConfig, rng: Rng) -> Self {
        Self {
            pool,
            state: TransitionState::Idle,
            config,
            rng,
        }
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn explosion_intensity(&self) -> f32 {
        self.state.explosion_intensity(&self.config)
    }

    /// Random source for new targets, shared with burst generation.
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut self.rng
    }

    /// Head toward `target` using `mode`.
    pub fn trigger(&mut self, mode: TransitionMode, target: Vec<Vec3>) {
        let state = std::mem::take(&mut self.state);
        self.state = state.begin(mode, target, &mut self.pool, &self.config, &mut self.rng);
    }

    /// Advance one frame. Returns the previous phase if it changed.
    pub fn step(&mut self, dt: f32, drive: Drive) -> Option<Phase> {
        let before = self.state.phase();
        let state = std::mem::take(&mut self.state);
        self.state = state.step(&mut self.pool, drive, dt, &self.config);

        let repaired = self.pool.sanitize(drive.scale, drive.offset);
        if repaired > 0 {
            log::warn!("repaired {} non-finite particles", repaired);
        }

        let after = self.state.phase();
        (after != before).then_some(before)
    }
}
