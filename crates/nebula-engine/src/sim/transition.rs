//! Transition state machine: idle, morphing, exploding, reforming.
//!
//! The state is an explicit tagged enum. [`TransitionState::begin`] and
//! [`TransitionState::step`] consume the current state and return the next one,
//! mutating only the pool they are handed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::pool::ParticlePool;
use crate::core::rng::RandomSource;
use crate::extensions::easing::{lerp, Easing};
use crate::gesture::ControlSignals;

/// How a new shape is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// Retarget and let the spring pull particles over.
    #[default]
    Morph,
    /// Radial burst, then reform.
    Explode,
    /// Tangential spin, then reform.
    Vortex,
}

impl TransitionMode {
    pub const ALL: [TransitionMode; 3] = [Self::Morph, Self::Explode, Self::Vortex];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morph => "morph",
            Self::Explode => "explode",
            Self::Vortex => "vortex",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(name))
    }

    pub fn has_burst(self) -> bool {
        !matches!(self, Self::Morph)
    }
}

/// Physics and timing tunables. Every value is a default, not a requirement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    pub spring: f32,
    pub damping: f32,
    /// Seconds of ballistic flight.
    pub explode_duration: f32,
    pub reform_duration: f32,
    pub burst_speed_multiplier: f32,
    /// Radial burst speed range (units/s).
    pub explode_speed: (f32, f32),
    pub explode_jitter: f32,
    /// Scale applied to the `(-z, 0, x)` tangent.
    pub vortex_speed: (f32, f32),
    pub vortex_jitter: f32,
    /// Reform spring constant ramps linearly from `.0` to `.1`.
    pub reform_spring: (f32, f32),
    pub reform_damping: f32,
    /// Blend of positions onto the target while reforming. Must reach 1 at the
    /// end of the phase so the cloud is on shape when the state goes idle.
    pub reform_easing: Easing,
    /// Morphing ends once every particle is this close to its target.
    pub morph_settle_epsilon: f32,
    /// Upper bound on morphing time.
    pub morph_max_duration: f32,
    /// Curve for the explosion intensity ramp.
    pub intensity_easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            spring: 0.06,
            damping: 0.92,
            explode_duration: 1.6,
            reform_duration: 0.8,
            burst_speed_multiplier: 1.0,
            explode_speed: (20.0, 45.0),
            explode_jitter: 8.0,
            vortex_speed: (1.5, 3.0),
            vortex_jitter: 0.5,
            reform_spring: (0.08, 0.30),
            reform_damping: 0.95,
            reform_easing: Easing::QuadIn,
            morph_settle_epsilon: 0.01,
            morph_max_duration: 3.0,
            intensity_easing: Easing::QuadOut,
        }
    }
}

/// Gesture-derived transform applied to the target every spring step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drive {
    pub scale: f32,
    pub offset: Vec3,
}

impl Default for Drive {
    fn default() -> Self {
        Self { scale: 1.0, offset: Vec3::ZERO }
    }
}

impl Drive {
    /// Map control signals to a drive. The hands' center moves the cloud across
    /// `range` world units; image y grows downward.
    pub fn from_signals(signals: &ControlSignals, range: f32) -> Self {
        let scale = if signals.scale.is_finite() { signals.scale } else { 1.0 };
        let offset = Vec3::new(
            (signals.center_x - 0.5) * range,
            (0.5 - signals.center_y) * range,
            0.0,
        );
        Self {
            scale,
            offset: if offset.is_finite() { offset } else { Vec3::ZERO },
        }
    }
}

/// Fieldless mirror of [`TransitionState`] for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Morphing,
    Exploding,
    Reforming,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Morphing => "morphing",
            Self::Exploding => "exploding",
            Self::Reforming => "reforming",
        }
    }

    /// Numeric code used on the host wire.
    pub fn code(self) -> u32 {
        match self {
            Self::Idle => 0,
            Self::Morphing => 1,
            Self::Exploding => 2,
            Self::Reforming => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    Morphing {
        elapsed: f32,
    },
    Exploding {
        burst_velocities: Vec<Vec3>,
        pending_target: Vec<Vec3>,
        elapsed: f32,
    },
    Reforming {
        elapsed: f32,
    },
}

impl TransitionState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Morphing { .. } => Phase::Morphing,
            Self::Exploding { .. } => Phase::Exploding,
            Self::Reforming { .. } => Phase::Reforming,
        }
    }

    /// Start a transition toward `new_target`.
    ///
    /// While exploding, only the pending target is replaced so the running
    /// burst plays out. From any other phase the transition starts fresh.
    pub fn begin(
        self,
        mode: TransitionMode,
        new_target: Vec<Vec3>,
        pool: &mut ParticlePool,
        config: &TransitionConfig,
        rng: &mut dyn RandomSource,
    ) -> Self {
        if let Self::Exploding { burst_velocities, elapsed, .. } = self {
            return Self::Exploding {
                burst_velocities,
                pending_target: new_target,
                elapsed,
            };
        }
        match mode {
            TransitionMode::Morph => {
                pool.retarget(new_target);
                Self::Morphing { elapsed: 0.0 }
            }
            TransitionMode::Explode | TransitionMode::Vortex => Self::Exploding {
                burst_velocities: burst_velocities(mode, &pool.current, config, rng),
                pending_target: new_target,
                elapsed: 0.0,
            },
        }
    }

    /// Advance one frame. `dt` is already clamped by the frame clock.
    pub fn step(self, pool: &mut ParticlePool, drive: Drive, dt: f32, config: &TransitionConfig) -> Self {
        match self {
            Self::Idle => {
                spring_step(pool, drive, config.spring, config.damping);
                Self::Idle
            }
            Self::Morphing { elapsed } => {
                spring_step(pool, drive, config.spring, config.damping);
                let elapsed = elapsed + dt;
                let settled = pool.max_error(drive.scale, drive.offset) < config.morph_settle_epsilon;
                if settled || elapsed >= config.morph_max_duration {
                    Self::Idle
                } else {
                    Self::Morphing { elapsed }
                }
            }
            Self::Exploding { burst_velocities, pending_target, elapsed } => {
                let factor = dt * config.burst_speed_multiplier;
                for ((current, velocity), burst) in pool
                    .current
                    .iter_mut()
                    .zip(pool.velocity.iter_mut())
                    .zip(&burst_velocities)
                {
                    *velocity = *burst * factor;
                    *current += *velocity;
                }
                let elapsed = elapsed + dt;
                if elapsed >= config.explode_duration {
                    pool.retarget(pending_target);
                    pool.velocity.iter_mut().for_each(|v| *v = Vec3::ZERO);
                    Self::Reforming { elapsed: 0.0 }
                } else {
                    Self::Exploding { burst_velocities, pending_target, elapsed }
                }
            }
            Self::Reforming { elapsed } => {
                let elapsed = elapsed + dt;
                let t = (elapsed / config.reform_duration).clamp(0.0, 1.0);
                let spring = lerp(config.reform_spring.0, config.reform_spring.1, t);
                spring_step(pool, drive, spring, config.reform_damping);
                settle_toward_target(pool, drive, config.reform_easing.apply(t));
                if elapsed >= config.reform_duration {
                    Self::Idle
                } else {
                    Self::Reforming { elapsed }
                }
            }
        }
    }

    /// Explosion intensity in [0, 1]: rises through the burst, falls while reforming.
    pub fn explosion_intensity(&self, config: &TransitionConfig) -> f32 {
        match self {
            Self::Exploding { elapsed, .. } => {
                config.intensity_easing.apply(elapsed / config.explode_duration)
            }
            Self::Reforming { elapsed } => 1.0 - (elapsed / config.reform_duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Per-frame spring toward `target * scale + offset`. Not dt-scaled.
pub fn spring_step(pool: &mut ParticlePool, drive: Drive, spring: f32, damping: f32) {
    for ((current, velocity), target) in pool
        .current
        .iter_mut()
        .zip(pool.velocity.iter_mut())
        .zip(&pool.target)
    {
        let diff = *target * drive.scale + drive.offset - *current;
        *velocity = (*velocity + diff * spring) * damping;
        *current += *velocity;
    }
}

/// Pull positions onto the scaled target by `blend` and bleed velocity by
/// the same amount. `blend == 1` lands every particle with zero velocity.
fn settle_toward_target(pool: &mut ParticlePool, drive: Drive, blend: f32) {
    for ((current, velocity), target) in pool
        .current
        .iter_mut()
        .zip(pool.velocity.iter_mut())
        .zip(&pool.target)
    {
        *current = current.lerp(*target * drive.scale + drive.offset, blend);
        *velocity *= 1.0 - blend;
    }
}

fn burst_velocities(
    mode: TransitionMode,
    positions: &[Vec3],
    config: &TransitionConfig,
    rng: &mut dyn RandomSource,
) -> Vec<Vec3> {
    positions
        .iter()
        .map(|p| match mode {
            TransitionMode::Explode => {
                let outward = p.try_normalize().unwrap_or_else(|| rng.unit_vector());
                let speed = rng.range(config.explode_speed.0, config.explode_speed.1);
                outward * speed + rng.unit_vector() * rng.range(0.0, config.explode_jitter)
            }
            TransitionMode::Vortex => {
                let tangent = Vec3::new(-p.z, 0.0, p.x);
                let speed = rng.range(config.vortex_speed.0, config.vortex_speed.1);
                tangent * speed + rng.unit_vector() * rng.range(0.0, config.vortex_jitter)
            }
            TransitionMode::Morph => Vec3::ZERO,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::Rng;
    use crate::shapes::{generate_points, ShapeId};

    const DT: f32 = 1.0 / 60.0;

    fn setup(count: usize) -> (ParticlePool, Vec<Vec3>, Rng) {
        let mut rng = Rng::new(11);
        let pool = ParticlePool::new(count, ShapeId::Sphere, 5.0, 0.2, &mut rng);
        let next = generate_points(ShapeId::Galaxy, count, 5.0, &mut rng);
        (pool, next, rng)
    }

    fn run(mut state: TransitionState, pool: &mut ParticlePool, steps: usize, cfg: &TransitionConfig) -> TransitionState {
        for _ in 0..steps {
            state = state.step(pool, Drive::default(), DT, cfg);
        }
        state
    }

    #[test]
    fn explode_walks_every_phase_in_order() {
        let cfg = TransitionConfig::default();
        let (mut pool, next, mut rng) = setup(300);
        let state = TransitionState::Idle.begin(TransitionMode::Explode, next.clone(), &mut pool, &cfg, &mut rng);
        assert_eq!(state.phase(), Phase::Exploding, "burst starts immediately");

        // 1.6 s at 60 Hz is 96 steps.
        let state = run(state, &mut pool, 94, &cfg);
        assert_eq!(state.phase(), Phase::Exploding);
        assert_ne!(pool.target, next, "new target waits for the burst to finish");
        let state = run(state, &mut pool, 4, &cfg);
        assert_eq!(state.phase(), Phase::Reforming);
        assert_eq!(pool.target, next);

        // 0.8 s is 48 steps.
        let state = run(state, &mut pool, 46, &cfg);
        assert_eq!(state.phase(), Phase::Reforming);
        let state = run(state, &mut pool, 4, &cfg);
        assert_eq!(state, TransitionState::Idle);
    }

    fn mean_error(pool: &ParticlePool) -> f32 {
        let total: f32 = pool.current.iter().zip(&pool.target).map(|(c, t)| c.distance(*t)).sum();
        total / pool.len() as f32
    }

    #[test]
    fn reform_lands_on_the_new_shape() {
        let cfg = TransitionConfig::default();
        let mut rng = Rng::new(11);
        let mut pool = ParticlePool::new(2000, ShapeId::Sphere, 5.0, 0.2, &mut rng);
        let next = generate_points(ShapeId::Galaxy, 2000, 5.0, &mut rng);
        let mut state = TransitionState::Idle.begin(TransitionMode::Explode, next, &mut pool, &cfg, &mut rng);
        while state.phase() == Phase::Exploding {
            state = state.step(&mut pool, Drive::default(), DT, &cfg);
        }
        let scattered = mean_error(&pool);
        assert!(scattered > 20.0, "burst should scatter the cloud, got {}", scattered);

        state = run(state, &mut pool, 24, &cfg);
        assert_eq!(state.phase(), Phase::Reforming);
        let halfway = mean_error(&pool);
        assert!(halfway < scattered * 0.5, "reform should close most of the gap: {} vs {}", halfway, scattered);

        while state.phase() == Phase::Reforming {
            state = state.step(&mut pool, Drive::default(), DT, &cfg);
        }
        assert_eq!(state, TransitionState::Idle);
        let landed = pool.max_error(1.0, Vec3::ZERO);
        assert!(landed < 0.5, "cloud should be on shape when reforming ends, max error {}", landed);
        assert!(pool.velocity.iter().all(|v| v.length() < 1e-3));
    }

    #[test]
    fn explosion_leaves_the_frame() {
        let cfg = TransitionConfig::default();
        let (mut pool, next, mut rng) = setup(200);
        let mut state = TransitionState::Idle.begin(TransitionMode::Explode, next, &mut pool, &cfg, &mut rng);
        while state.phase() == Phase::Exploding {
            state = state.step(&mut pool, Drive::default(), DT, &cfg);
        }
        let min_radius = pool.current.iter().map(|p| p.length()).fold(f32::MAX, f32::min);
        // Radial speed is at least 20 - 8 units/s for 1.6 s.
        assert!(min_radius > 15.0, "every particle should be far out, got {}", min_radius);
    }

    #[test]
    fn vortex_spins_about_y() {
        let cfg = TransitionConfig::default();
        let (mut pool, next, mut rng) = setup(200);
        let state = TransitionState::Idle.begin(TransitionMode::Vortex, next, &mut pool, &cfg, &mut rng);
        let TransitionState::Exploding { burst_velocities, .. } = &state else {
            panic!("vortex should enter the burst phase");
        };
        for (burst, p) in burst_velocities.iter().zip(&pool.current) {
            assert!(burst.y.abs() <= cfg.vortex_jitter + 1e-4);
            let tangent = Vec3::new(-p.z, 0.0, p.x);
            if tangent.length() > 1.0 {
                assert!(burst.dot(tangent) > 0.0, "vortex should follow the tangent");
            }
        }
    }

    #[test]
    fn explode_bursts_point_outward() {
        let cfg = TransitionConfig::default();
        let (mut pool, next, mut rng) = setup(500);
        let state = TransitionState::Idle.begin(TransitionMode::Explode, next, &mut pool, &cfg, &mut rng);
        let TransitionState::Exploding { burst_velocities, .. } = &state else {
            panic!("explode should enter the burst phase");
        };
        for (burst, p) in burst_velocities.iter().zip(&pool.current) {
            if p.length() > 1e-3 {
                assert!(burst.dot(*p) > 0.0);
            }
            assert!(burst.length() >= cfg.explode_speed.0 - cfg.explode_jitter);
        }
    }

    #[test]
    fn morph_never_explodes_and_converges_monotonically() {
        let cfg = TransitionConfig {
            damping: 0.5,
            ..TransitionConfig::default()
        };
        let (mut pool, next, mut rng) = setup(100);
        let mut state = TransitionState::Idle.begin(TransitionMode::Morph, next.clone(), &mut pool, &cfg, &mut rng);
        assert_eq!(pool.target, next, "morph retargets immediately");

        let mut previous: Vec<f32> = pool.current.iter().zip(&next).map(|(c, t)| c.distance(*t)).collect();
        for _ in 0..60 {
            state = state.step(&mut pool, Drive::default(), DT, &cfg);
            assert_ne!(state.phase(), Phase::Exploding);
            for (i, (c, t)) in pool.current.iter().zip(&next).enumerate() {
                let d = c.distance(*t);
                assert!(d <= previous[i] + 1e-5, "particle {} moved away: {} > {}", i, d, previous[i]);
                previous[i] = d;
            }
        }
    }

    #[test]
    fn default_spring_settles_and_morph_ends() {
        let cfg = TransitionConfig::default();
        let (mut pool, next, mut rng) = setup(100);
        let initial = pool.current.iter().zip(&next).map(|(c, t)| c.distance(*t)).fold(0.0, f32::max);
        let mut state = TransitionState::Idle.begin(TransitionMode::Morph, next, &mut pool, &cfg, &mut rng);
        state = run(state, &mut pool, 300, &cfg);
        assert_eq!(state, TransitionState::Idle);
        assert!(pool.max_error(1.0, Vec3::ZERO) < initial * 0.01);
    }

    #[test]
    fn intensity_rises_then_falls() {
        let cfg = TransitionConfig::default();
        let (mut pool, next, mut rng) = setup(50);
        let mut state = TransitionState::Idle.begin(TransitionMode::Explode, next, &mut pool, &cfg, &mut rng);
        let mut last = state.explosion_intensity(&cfg);
        assert_eq!(last, 0.0);
        while state.phase() == Phase::Exploding {
            state = state.step(&mut pool, Drive::default(), DT, &cfg);
            let now = state.explosion_intensity(&cfg);
            if state.phase() == Phase::Exploding {
                assert!(now >= last);
            }
            last = now;
        }
        assert!((last - 1.0).abs() < 1e-6, "reform starts at full intensity");
        while state.phase() == Phase::Reforming {
            state = state.step(&mut pool, Drive::default(), DT, &cfg);
            let now = state.explosion_intensity(&cfg);
            assert!(now <= last);
            last = now;
        }
        assert_eq!(last, 0.0);
    }

    #[test]
    fn retrigger_while_exploding_swaps_pending_target() {
        let cfg = TransitionConfig::default();
        let (mut pool, first, mut rng) = setup(80);
        let second = generate_points(ShapeId::Heart, 80, 5.0, &mut rng);
        let state = TransitionState::Idle.begin(TransitionMode::Explode, first, &mut pool, &cfg, &mut rng);
        let state = run(state, &mut pool, 10, &cfg);
        let state = state.begin(TransitionMode::Morph, second.clone(), &mut pool, &cfg, &mut rng);
        let TransitionState::Exploding { pending_target, elapsed, .. } = &state else {
            panic!("burst should keep running");
        };
        assert_eq!(pending_target, &second);
        assert!(*elapsed > 0.15);
        let _ = run(state, &mut pool, 100, &cfg);
        assert_eq!(pool.target, second);
    }

    #[test]
    fn drive_maps_center_to_offset() {
        let signals = ControlSignals {
            center_x: 1.0,
            center_y: 0.0,
            scale: 1.5,
            ..ControlSignals::default()
        };
        let drive = Drive::from_signals(&signals, 4.0);
        assert_eq!(drive.scale, 1.5);
        assert_eq!(drive.offset, Vec3::new(2.0, 2.0, 0.0));
        assert_eq!(Drive::from_signals(&ControlSignals::default(), 4.0), Drive::default());
    }

    #[test]
    fn mode_names() {
        assert_eq!(TransitionMode::parse(" Vortex "), Some(TransitionMode::Vortex));
        assert_eq!(TransitionMode::parse("spin"), None);
        assert!(!TransitionMode::Morph.has_burst());
        assert_eq!(serde_json::to_string(&TransitionMode::Explode).unwrap(), "\"explode\"");
    }
}
