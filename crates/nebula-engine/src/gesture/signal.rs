//! Single-writer / single-reader control cell shared by the gesture
//! interpreter (writer, detection callback) and the scene (reader, frame loop).
//!
//! Every field is an independent atomic scalar: last write wins, no queue, and
//! a reader may see fields from two consecutive writes. Staleness of one frame
//! is invisible, so no lock is taken.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// An `f32` stored as its bit pattern.
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Snapshot of the control signals the simulation consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSignals {
    pub tension: f32,
    pub scale: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub hands_detected: u8,
    pub is_active: bool,
}

impl Default for ControlSignals {
    fn default() -> Self {
        Self {
            tension: 0.0,
            scale: 1.0,
            center_x: 0.5,
            center_y: 0.5,
            hands_detected: 0,
            is_active: false,
        }
    }
}

#[derive(Debug)]
pub struct ControlCell {
    tension: AtomicF32,
    scale: AtomicF32,
    center_x: AtomicF32,
    center_y: AtomicF32,
    hands_detected: AtomicU8,
    is_active: AtomicBool,
    writes: AtomicU32,
}

impl ControlCell {
    pub fn new() -> Self {
        let d = ControlSignals::default();
        Self {
            tension: AtomicF32::new(d.tension),
            scale: AtomicF32::new(d.scale),
            center_x: AtomicF32::new(d.center_x),
            center_y: AtomicF32::new(d.center_y),
            hands_detected: AtomicU8::new(d.hands_detected),
            is_active: AtomicBool::new(d.is_active),
            writes: AtomicU32::new(0),
        }
    }

    /// Overwrite the cell with the latest signals.
    pub fn publish(&self, signals: &ControlSignals) {
        self.tension.store(signals.tension);
        self.scale.store(signals.scale);
        self.center_x.store(signals.center_x);
        self.center_y.store(signals.center_y);
        self.hands_detected.store(signals.hands_detected, Ordering::Relaxed);
        self.is_active.store(signals.is_active, Ordering::Relaxed);
        self.writes.fetch_add(1, Ordering::Release);
    }

    /// Read the latest signals.
    pub fn snapshot(&self) -> ControlSignals {
        ControlSignals {
            tension: self.tension.load(),
            scale: self.scale.load(),
            center_x: self.center_x.load(),
            center_y: self.center_y.load(),
            hands_detected: self.hands_detected.load(Ordering::Relaxed),
            is_active: self.is_active.load(Ordering::Relaxed),
        }
    }

    /// Number of publishes so far (wraps).
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::Acquire)
    }
}

impl Default for ControlCell {
    fn default() -> Self {
        Self::new()
    }
}
