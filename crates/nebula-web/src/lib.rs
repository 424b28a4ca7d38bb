//! WASM bridge: owns the scene and the gesture interpreter for the page and
//! exposes them to TypeScript through `#[wasm_bindgen]` free functions.
//!
//! TypeScript drives everything. It reports collaborator readiness, pushes
//! landmark batches from the hand tracker, calls `scene_tick` once per
//! animation frame and reads the shared frame buffer by pointer.

pub mod runner;
pub mod storage;

pub use runner::{SceneRunner, SharedFrameBuffer};

use std::cell::RefCell;
use std::sync::Arc;

use nebula_engine::renderer::shaders;
use nebula_engine::{
    ControlCell, DetectedHand, GestureInterpreter, InitComponent, PerformanceTier, Preferences,
    ShapeId, TransitionMode,
};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SceneRunner>> = const { RefCell::new(None) };
    static DETECTOR: RefCell<Option<GestureInterpreter>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut SceneRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Scene not initialized. Call scene_init() first.");
        f(runner)
    })
}

/// Runs `f` and persists the resulting preferences.
fn with_prefs<R>(f: impl FnOnce(&mut SceneRunner) -> R) -> R {
    with_runner(|r| {
        let out = f(r);
        storage::save(&r.preferences().to_json());
        out
    })
}

#[wasm_bindgen]
pub fn scene_init(tier: u32, seed: u32) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let prefs = Preferences::load_or_default(storage::load().as_deref());
    let controls = Arc::new(ControlCell::new());
    let runner = SceneRunner::for_tier(PerformanceTier::from_code(tier), seed as u64, prefs, controls.clone());
    let detector = GestureInterpreter::new(
        runner.scene().config().gesture,
        controls,
        runner.scene().liveness(),
    );

    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    DETECTOR.with(|cell| *cell.borrow_mut() = Some(detector));
    log::info!("nebula: initialized");
}

#[wasm_bindgen]
pub fn scene_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

/// `component`: 0 = GPU, 1 = camera, 2 = landmark model.
#[wasm_bindgen]
pub fn scene_report_ready(component: u32) {
    if let Some(component) = InitComponent::from_code(component) {
        with_runner(|r| r.report_ready(component));
    }
}

#[wasm_bindgen]
pub fn scene_report_failure(component: u32, message: &str) {
    if let Some(component) = InitComponent::from_code(component) {
        with_runner(|r| r.report_failure(component, message));
    }
}

/// 0 = loading, 1 = ready, 2 = failed.
#[wasm_bindgen]
pub fn scene_status() -> u32 {
    with_runner(|r| r.status_code())
}

/// Human-readable failure, empty while loading or ready.
#[wasm_bindgen]
pub fn scene_status_message() -> String {
    with_runner(|r| match r.status() {
        nebula_engine::InitStatus::Failed(e) => e.to_string(),
        _ => String::new(),
    })
}

// ---- Gesture input ----

/// Runs `f` on the detector unless it is missing or already in use. A
/// listener calling back into the detector lands in the second case.
fn with_detector<R>(f: impl FnOnce(&mut GestureInterpreter) -> R) -> Option<R> {
    DETECTOR.with(|cell| {
        let Ok(mut borrow) = cell.try_borrow_mut() else {
            log::debug!("gesture detector busy, call dropped");
            return None;
        };
        borrow.as_mut().map(f)
    })
}

/// Feed one detection result. `points` holds 63 floats per hand,
/// `labels` the comma-separated handedness labels in the same order.
/// Returns false once the scene has been torn down, or when called from
/// inside a gesture listener.
#[wasm_bindgen]
pub fn gesture_push_hands(points: &[f32], labels: &str) -> bool {
    let labels: Vec<&str> = labels.split(',').filter(|l| !l.is_empty()).collect();
    let hands = DetectedHand::parse_batch(points, &labels);
    with_detector(|detector| detector.process(&hands).is_some()).unwrap_or(false)
}

/// Register a callback receiving the gesture state as JSON, throttled.
#[wasm_bindgen]
pub fn gesture_set_listener(callback: js_sys::Function) {
    with_detector(|detector| {
        detector.subscribe(move |state| {
            let json = serde_json::to_string(state).unwrap_or_default();
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&json));
        });
    });
}

// ---- UI controls ----

/// Unknown names fall back to the sphere.
#[wasm_bindgen]
pub fn scene_select_shape(name: &str) {
    let shape = ShapeId::from_name_or_default(name);
    with_prefs(|r| r.select_shape(shape));
}

#[wasm_bindgen]
pub fn scene_set_mode(name: &str) -> bool {
    match TransitionMode::parse(name) {
        Some(mode) => {
            with_prefs(|r| r.set_mode(mode));
            true
        }
        None => false,
    }
}

#[wasm_bindgen]
pub fn scene_set_tint(hex: &str) -> bool {
    with_prefs(|r| r.set_tint(hex))
}

#[wasm_bindgen]
pub fn scene_set_panel_visible(visible: bool) {
    with_prefs(|r| r.set_panel_visible(visible));
}

#[wasm_bindgen]
pub fn scene_preferences() -> String {
    with_runner(|r| r.preferences().to_json())
}

#[wasm_bindgen]
pub fn scene_fire_pulse() {
    with_runner(|r| r.fire_pulse());
}

#[wasm_bindgen]
pub fn scene_resize(width: u32, height: u32, pixel_ratio: f32) {
    with_runner(|r| r.resize(width, height, pixel_ratio));
}

/// Stop the scene. Pending detector callbacks become no-ops.
#[wasm_bindgen]
pub fn scene_teardown() {
    with_runner(|r| r.teardown());
    log::info!("nebula: torn down");
}

// ---- Shared buffer ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats())
}

#[wasm_bindgen]
pub fn get_max_particles() -> u32 {
    with_runner(|r| r.max_particles())
}

#[wasm_bindgen]
pub fn get_trail_slots() -> u32 {
    with_runner(|r| r.trail_slots())
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events())
}

// ---- Shaders ----

#[wasm_bindgen]
pub fn get_particle_shader() -> String {
    shaders::particle_shader()
}

#[wasm_bindgen]
pub fn get_trail_shader() -> String {
    shaders::trail_shader()
}
