use crate::shapes::ShapeId;
use crate::sim::TransitionMode;

/// Control events the scene understands.
/// Sent by the UI layer; none of them touch the simulation algorithms directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Regenerate the target and run a transition with the current mode.
    SelectShape(ShapeId),
    /// Mode used by the next shape change.
    SetTransitionMode(TransitionMode),
    /// Primary tint, linear RGB in [0, 1].
    SetTint([f32; 3]),
    /// Fire a pulse wave (capture, user action).
    FirePulse,
    /// Viewport changed; physical pixels.
    Resize { width: u32, height: u32, pixel_ratio: f32 },
}

/// A queue of control events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct ControlQueue {
    events: Vec<ControlEvent>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    /// Push a new control event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}
