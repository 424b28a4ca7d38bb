//! Scene orchestrator: one simulation + render step per display frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::config::SceneConfig;
use super::types::{PulseReason, SceneEvent, SceneEventKind};
use crate::core::rng::Rng;
use crate::core::time::FrameClock;
use crate::gesture::{ControlCell, ControlSignals};
use crate::input::queue::{ControlEvent, ControlQueue};
use crate::renderer::{Camera3D, FrameInputs, RenderPipeline, Renderer};
use crate::shapes::{self, ShapeId};
use crate::sim::{Drive, ParticlePool, Phase, PulseWave, Simulation, TrailRing, TransitionMode};

/// Owns every piece of per-frame state. Gesture input arrives only through
/// the shared [`ControlCell`]; UI input only through [`ControlEvent`]s.
pub struct ParticleScene {
    config: SceneConfig,
    sim: Simulation,
    trail: TrailRing,
    pulse: PulseWave,
    pipeline: RenderPipeline,
    clock: FrameClock,
    controls: Arc<ControlCell>,
    alive: Arc<AtomicBool>,
    queue: ControlQueue,
    events: Vec<SceneEvent>,
    shape: ShapeId,
    mode: TransitionMode,
    signals: ControlSignals,
}

impl ParticleScene {
    pub fn new(config: SceneConfig, controls: Arc<ControlCell>) -> Self {
        let count = config.particle_count.max(1);
        let mut rng = Rng::new(config.seed);
        let pool = ParticlePool::new(
            count,
            config.initial_shape,
            config.shape_scale,
            config.core_fraction,
            &mut rng,
        );
        let trail = TrailRing::new(config.trail, &pool.current);
        let sim = Simulation::new(pool, config.transition, rng.fork());

        let camera = Camera3D::new(config.camera_distance, config.fov_y, 1.0);
        let mut pipeline = RenderPipeline::new(camera, config.point_size);
        pipeline.set_tint(config.initial_tint);

        log::info!(
            "scene created: {} particles, shape {}, mode {}",
            count,
            config.initial_shape.as_str(),
            config.initial_mode.as_str()
        );

        Self {
            sim,
            trail,
            pulse: PulseWave::new(config.pulse),
            pipeline,
            clock: FrameClock::new(config.max_dt),
            controls,
            alive: Arc::new(AtomicBool::new(true)),
            queue: ControlQueue::new(),
            events: Vec::with_capacity(config.max_events),
            shape: config.initial_shape,
            mode: config.initial_mode,
            signals: ControlSignals::default(),
            config,
        }
    }

    /// Liveness flag to hand to the gesture interpreter.
    pub fn liveness(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.alive)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.sim.phase()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn trail(&self) -> &TrailRing {
        &self.trail
    }

    pub fn pulse(&self) -> &PulseWave {
        &self.pulse
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    /// Control signals as read at the start of the last tick.
    pub fn signals(&self) -> &ControlSignals {
        &self.signals
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Events emitted during the last tick.
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Queue a UI event; applied at the start of the next tick.
    pub fn push_control(&mut self, event: ControlEvent) {
        self.queue.push(event);
    }

    /// One display frame of simulation. `frame_dt` is the raw wall-clock delta.
    pub fn tick(&mut self, frame_dt: f32) {
        if !self.is_alive() {
            return;
        }
        self.events.clear();
        let dt = self.clock.advance(frame_dt);

        for event in self.queue.drain() {
            self.apply(event);
        }

        let signals = self.controls.snapshot();
        self.track_hands(&signals);
        self.signals = signals;

        let drive = Drive::from_signals(&signals, self.config.gesture_offset_range);
        if let Some(previous) = self.sim.step(dt, drive) {
            self.phase_changed(previous);
        }

        let pool = self.sim.pool();
        self.trail.update(&pool.current, &pool.velocity);
        self.pulse.tick(dt);

        let inputs = FrameInputs {
            time: self.clock.elapsed(),
            tension: signals.tension,
            explosion: self.sim.explosion_intensity(),
        };
        self.pipeline.update(inputs, &self.pulse);
    }

    /// Hand the current frame to the backend.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        if !self.is_alive() {
            return;
        }
        self.pipeline.submit(renderer, self.sim.pool(), &self.trail, &self.events);
    }

    /// Stop everything: later ticks, renders and detection callbacks are no-ops.
    pub fn teardown(&mut self, renderer: &mut dyn Renderer) {
        if self.alive.swap(false, Ordering::AcqRel) {
            log::info!("scene torn down after {} frames", self.clock.frame());
        }
        self.pipeline.release(renderer);
    }

    /// Regenerate the target for `shape` and start a transition with the current mode.
    pub fn select_shape(&mut self, shape: ShapeId) {
        let before = self.sim.phase();
        let count = self.sim.pool().len();
        let target = shapes::generate_points(shape, count, self.config.shape_scale, self.sim.rng());
        self.sim.trigger(self.mode, target);
        self.shape = shape;

        log::info!("transition to {} ({})", shape.as_str(), self.mode.as_str());
        self.emit(SceneEvent::new(
            SceneEventKind::TransitionStarted,
            mode_index(self.mode) as f32,
            shape_index(shape) as f32,
        ));
        if self.sim.phase() != before {
            self.phase_changed(before);
        }
    }

    pub fn fire_pulse(&mut self, reason: PulseReason) {
        self.pulse.fire();
        log::debug!("pulse fired ({:?})", reason);
        self.emit(SceneEvent::new(SceneEventKind::PulseFired, reason as u32 as f32, 0.0));
    }

    fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::SelectShape(shape) => self.select_shape(shape),
            ControlEvent::SetTransitionMode(mode) => self.mode = mode,
            ControlEvent::SetTint(rgb) => self.pipeline.set_tint(rgb),
            ControlEvent::FirePulse => self.fire_pulse(PulseReason::Requested),
            ControlEvent::Resize { width, height, pixel_ratio } => {
                self.pipeline.resize(width, height, pixel_ratio)
            }
        }
    }

    fn track_hands(&mut self, signals: &ControlSignals) {
        let before = self.signals.hands_detected;
        let now = signals.hands_detected;
        if now == before {
            return;
        }
        log::info!("hands: {} -> {}", before, now);
        self.emit(SceneEvent::new(SceneEventKind::HandsChanged, now as f32, before as f32));
        match (before, now) {
            (0, _) => self.fire_pulse(PulseReason::HandsAppeared),
            (_, 0) => self.fire_pulse(PulseReason::HandsLost),
            _ => {}
        }
    }

    fn phase_changed(&mut self, previous: Phase) {
        let now = self.sim.phase();
        log::debug!("phase {} -> {}", previous.as_str(), now.as_str());
        self.emit(SceneEvent::new(
            SceneEventKind::PhaseChanged,
            previous.code() as f32,
            now.code() as f32,
        ));
    }

    fn emit(&mut self, event: SceneEvent) {
        if self.events.len() < self.config.max_events {
            self.events.push(event);
        }
    }
}

fn shape_index(shape: ShapeId) -> usize {
    ShapeId::ALL.iter().position(|s| *s == shape).unwrap_or(0)
}

fn mode_index(mode: TransitionMode) -> usize {
    TransitionMode::ALL.iter().position(|m| *m == mode).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::pipeline::testing::RecordingRenderer;

    const DT: f32 = 1.0 / 60.0;

    fn scene() -> (ParticleScene, Arc<ControlCell>) {
        let cell = Arc::new(ControlCell::new());
        let config = SceneConfig::default().with_particle_count(500).with_seed(3);
        (ParticleScene::new(config, Arc::clone(&cell)), cell)
    }

    fn has(scene: &ParticleScene, kind: SceneEventKind) -> bool {
        scene.events().iter().any(|e| e.is(kind))
    }

    #[test]
    fn shape_change_with_explode_runs_full_cycle() {
        let (mut scene, _) = scene();
        scene.push_control(ControlEvent::SetTransitionMode(TransitionMode::Explode));
        scene.push_control(ControlEvent::SelectShape(ShapeId::Galaxy));
        scene.tick(DT);
        assert_eq!(scene.phase(), Phase::Exploding);
        assert_eq!(scene.shape(), ShapeId::Galaxy);
        assert!(has(&scene, SceneEventKind::TransitionStarted));
        assert!(has(&scene, SceneEventKind::PhaseChanged));

        let mut phases = vec![scene.phase()];
        for _ in 0..200 {
            scene.tick(DT);
            if scene.phase() != *phases.last().unwrap() {
                phases.push(scene.phase());
            }
        }
        assert_eq!(phases, vec![Phase::Exploding, Phase::Reforming, Phase::Idle]);
    }

    #[test]
    fn explosion_intensity_reaches_uniforms() {
        let (mut scene, _) = scene();
        scene.push_control(ControlEvent::SetTransitionMode(TransitionMode::Vortex));
        scene.push_control(ControlEvent::SelectShape(ShapeId::Heart));
        for _ in 0..30 {
            scene.tick(DT);
        }
        assert!(scene.pipeline().uniforms().explosion > 0.0);
    }

    #[test]
    fn hands_appearing_fires_a_pulse() {
        let (mut scene, cell) = scene();
        scene.tick(DT);
        assert!(!scene.pulse().is_active());

        cell.publish(&ControlSignals {
            hands_detected: 2,
            is_active: true,
            ..ControlSignals::default()
        });
        scene.tick(DT);
        assert!(scene.pulse().is_active());
        assert!(has(&scene, SceneEventKind::HandsChanged));
        assert!(has(&scene, SceneEventKind::PulseFired));

        scene.tick(DT);
        assert!(!has(&scene, SceneEventKind::HandsChanged), "events are per frame");
    }

    #[test]
    fn gesture_center_moves_the_cloud() {
        let (mut scene, cell) = scene();
        cell.publish(&ControlSignals {
            center_x: 1.0,
            hands_detected: 1,
            is_active: true,
            ..ControlSignals::default()
        });
        for _ in 0..400 {
            scene.tick(DT);
        }
        let pool = scene.simulation().pool();
        let mean_x = pool.current.iter().map(|p| p.x).sum::<f32>() / pool.len() as f32;
        assert!((mean_x - 2.0).abs() < 0.5, "cloud should follow the hands, mean x {}", mean_x);
    }

    #[test]
    fn resumed_tab_does_not_jump() {
        let (mut scene, _) = scene();
        scene.tick(30.0);
        assert!((scene.elapsed() - 0.05).abs() < 1e-6);
        scene.tick(f32::NAN);
        assert!((scene.elapsed() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn render_uploads_static_once_and_teardown_stops() {
        let (mut scene, _) = scene();
        let mut renderer = RecordingRenderer::default();
        scene.push_control(ControlEvent::Resize { width: 800, height: 600, pixel_ratio: 2.0 });
        for _ in 0..3 {
            scene.tick(DT);
            scene.render(&mut renderer);
        }
        assert_eq!(renderer.uploads, 1);
        assert_eq!(renderer.draws, 3);
        assert_eq!(renderer.last_count, 500);
        assert_eq!(renderer.resizes.len(), 1);

        let alive = scene.liveness();
        scene.teardown(&mut renderer);
        assert!(!alive.load(Ordering::Acquire));
        let elapsed = scene.elapsed();
        scene.tick(DT);
        scene.render(&mut renderer);
        assert_eq!(scene.elapsed(), elapsed);
        assert_eq!(renderer.draws, 3);
        assert_eq!(renderer.releases, 1);
    }

    #[test]
    fn tint_and_pulse_controls() {
        let (mut scene, _) = scene();
        scene.push_control(ControlEvent::SetTint([1.0, 0.0, 0.5]));
        scene.push_control(ControlEvent::FirePulse);
        scene.tick(DT);
        assert_eq!(scene.pipeline().uniforms().tint, [1.0, 0.0, 0.5, 1.0]);
        assert!(scene.pulse().is_active());
        assert!(scene.pipeline().uniforms().pulse_strength > 0.0);
    }
}
