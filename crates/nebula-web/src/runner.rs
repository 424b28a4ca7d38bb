use std::sync::Arc;

use nebula_engine::api::types::events_as_floats;
use nebula_engine::bridge::protocol::*;
use nebula_engine::sim::pool::attributes_as_floats;
use nebula_engine::{
    ControlCell, ControlEvent, FrameData, InitComponent, InitError, InitStatus, InitTracker,
    ParticleScene, PerformanceTier, Preferences, ProtocolLayout, Renderer, SceneConfig,
    SceneEvent, ShapeId, StaticAttribute, TransitionMode,
};

/// Renderer that publishes each frame into one flat f32 buffer laid out by
/// [`ProtocolLayout`]. TypeScript reads it by pointer and drives WebGPU.
pub struct SharedFrameBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
    released: bool,
}

impl SharedFrameBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let mut data = vec![0.0; layout.buffer_total_floats];
        data[..HEADER_FLOATS].copy_from_slice(&layout.initial_header());
        Self {
            layout,
            data,
            released: false,
        }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    fn header(&mut self, field: usize, value: f32) {
        self.data[field] = value;
    }

    fn write(&mut self, offset: usize, capacity: usize, values: &[f32]) -> usize {
        let n = values.len().min(capacity);
        self.data[offset..offset + n].copy_from_slice(&values[..n]);
        n
    }
}

impl Renderer for SharedFrameBuffer {
    fn backend(&self) -> &'static str {
        "shared-buffer"
    }

    fn upload_static(&mut self, attributes: &[StaticAttribute]) {
        if self.released {
            return;
        }
        let floats = attributes_as_floats(attributes);
        let (offset, cap) = (self.layout.static_data_offset, self.layout.static_data_floats);
        self.write(offset, cap, floats);
        let generation = self.data[HEADER_STATIC_GENERATION] + 1.0;
        self.header(HEADER_STATIC_GENERATION, generation);
    }

    fn draw(&mut self, frame: &FrameData) {
        if self.released {
            return;
        }
        self.header(HEADER_LOCK, 1.0);

        let l = self.layout.clone();
        self.write(l.uniform_data_offset, l.uniform_data_floats, frame.uniforms.as_floats());
        let written = self.write(l.position_data_offset, l.position_data_floats, frame.positions);
        self.write(l.trail_position_offset, l.trail_position_floats, frame.trail_positions);
        self.write(l.trail_alpha_offset, l.trail_alpha_floats, frame.trail_alphas);
        let events = self.write(l.event_data_offset, l.event_data_floats, events_as_floats(frame.events));

        self.header(HEADER_PARTICLE_COUNT, (written / POSITION_FLOATS) as f32);
        self.header(HEADER_EVENT_COUNT, (events / SceneEvent::FLOATS) as f32);
        let frame_counter = self.data[HEADER_FRAME_COUNTER] + 1.0;
        self.header(HEADER_FRAME_COUNTER, frame_counter);
        self.header(HEADER_LOCK, 0.0);
    }

    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.header(HEADER_VIEWPORT_WIDTH, width as f32);
        self.header(HEADER_VIEWPORT_HEIGHT, height as f32);
        self.header(HEADER_PIXEL_RATIO, pixel_ratio);
    }

    fn release(&mut self) {
        self.released = true;
        self.header(HEADER_RELEASED, 1.0);
        self.header(HEADER_PARTICLE_COUNT, 0.0);
        self.header(HEADER_EVENT_COUNT, 0.0);
    }
}

/// Wires the scene, the init lifecycle and the shared frame buffer together.
///
/// The bridge keeps one `SceneRunner` in `thread_local!` storage and exports
/// free functions via `#[wasm_bindgen]`.
pub struct SceneRunner {
    scene: ParticleScene,
    frame: SharedFrameBuffer,
    init: InitTracker,
    prefs: Preferences,
}

impl SceneRunner {
    pub fn new(config: SceneConfig, prefs: Preferences, controls: Arc<ControlCell>) -> Self {
        let config = config
            .with_shape(prefs.shape)
            .with_mode(prefs.transition_mode)
            .with_tint(prefs.tint());
        let layout = ProtocolLayout::new(config.particle_count.max(1), config.trail.length, config.max_events);
        Self {
            scene: ParticleScene::new(config, controls),
            frame: SharedFrameBuffer::new(layout),
            init: InitTracker::default(),
            prefs,
        }
    }

    pub fn for_tier(tier: PerformanceTier, seed: u64, prefs: Preferences, controls: Arc<ControlCell>) -> Self {
        Self::new(SceneConfig::for_tier(tier).with_seed(seed), prefs, controls)
    }

    pub fn scene(&self) -> &ParticleScene {
        &self.scene
    }

    pub fn frame(&self) -> &SharedFrameBuffer {
        &self.frame
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn status(&self) -> &InitStatus {
        self.init.status()
    }

    /// 0 = loading, 1 = ready, 2 = failed.
    pub fn status_code(&self) -> u32 {
        match self.init.status() {
            InitStatus::Loading => 0,
            InitStatus::Ready => 1,
            InitStatus::Failed(_) => 2,
        }
    }

    pub fn report_ready(&mut self, component: InitComponent) {
        self.init.report_ready(component);
        log::info!("{:?} ready", component);
    }

    pub fn report_failure(&mut self, component: InitComponent, message: &str) {
        let error = match component {
            InitComponent::Gpu => InitError::GpuUnavailable(message.to_string()),
            InitComponent::Camera => InitError::CameraDenied(message.to_string()),
            InitComponent::Model => InitError::ModelLoadFailed(message.to_string()),
        };
        log::error!("initialization failed: {}", error);
        self.init.fail(error);
    }

    /// One display frame. Nothing is simulated until the GPU is up, and
    /// nothing at all after a terminal failure.
    pub fn tick(&mut self, dt: f32) {
        if let InitStatus::Failed(e) = self.init.poll(dt) {
            log::debug!("frame skipped: {}", e);
            return;
        }
        if !self.init.can_render() {
            return;
        }
        self.scene.tick(dt);
        self.scene.render(&mut self.frame);
    }

    pub fn select_shape(&mut self, shape: ShapeId) {
        self.prefs.shape = shape;
        self.scene.push_control(ControlEvent::SelectShape(shape));
    }

    pub fn set_mode(&mut self, mode: TransitionMode) {
        self.prefs.transition_mode = mode;
        self.scene.push_control(ControlEvent::SetTransitionMode(mode));
    }

    /// Apply a `#rgb`/`#rrggbb` tint. Returns false if the color is malformed.
    pub fn set_tint(&mut self, hex: &str) -> bool {
        match nebula_engine::prefs::parse_hex_color(hex) {
            Ok(rgb) => {
                self.prefs.color = hex.trim().to_string();
                self.scene.push_control(ControlEvent::SetTint(rgb));
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn set_panel_visible(&mut self, visible: bool) {
        self.prefs.show_panel = visible;
    }

    pub fn fire_pulse(&mut self) {
        self.scene.push_control(ControlEvent::FirePulse);
    }

    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.scene.push_control(ControlEvent::Resize { width, height, pixel_ratio });
    }

    pub fn teardown(&mut self) {
        self.scene.teardown(&mut self.frame);
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.frame.layout().buffer_total_floats as u32
    }

    pub fn max_particles(&self) -> u32 {
        self.frame.layout().max_particles as u32
    }

    pub fn trail_slots(&self) -> u32 {
        self.frame.layout().trail_slots as u32
    }

    pub fn max_events(&self) -> u32 {
        self.frame.layout().max_events as u32
    }
}
