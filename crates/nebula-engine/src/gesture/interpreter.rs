//! Per-callback gesture interpretation with exponential smoothing.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::extensions::easing::lerp;

use super::landmarks::{DetectedHand, Hand, HandLandmarks};
use super::signal::{ControlCell, ControlSignals};

/// Distance-derived scale factor range (hands together .. hands far apart).
const DISTANCE_SCALE_MIN: f32 = 0.3;
const DISTANCE_SCALE_MAX: f32 = 2.0;
/// Openness-derived scale factor range (fists .. open hands).
const OPENNESS_SCALE_MIN: f32 = 0.5;
const OPENNESS_SCALE_MAX: f32 = 1.0;

/// Values the signals settle to while no hand is visible.
const NEUTRAL_OPENNESS: f32 = 1.0;
const NEUTRAL_SCALE: f32 = 1.0;
const NEUTRAL_CENTER: f32 = 0.5;
const NEUTRAL_DISTANCE: f32 = 0.0;

/// Tunables for the interpreter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// First-order smoothing factor per callback (0.35–0.7 is typical).
    pub smoothing: f32,
    /// Smoothing factor toward neutral values while no hand is visible.
    pub idle_decay: f32,
    /// Hand-center distance that maps to 1.0.
    pub distance_span: f32,
    /// Palms smaller than this read as closed.
    pub palm_epsilon: f32,
    /// Notify observers every Nth callback (the control cell is written every time).
    pub observer_interval: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.5,
            idle_decay: 0.05,
            distance_span: 0.8,
            palm_epsilon: 1e-4,
            observer_interval: 2,
        }
    }
}

/// Interpreted gesture snapshot, produced once per detection callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureState {
    #[serde(skip)]
    pub left_hand: Option<HandLandmarks>,
    #[serde(skip)]
    pub right_hand: Option<HandLandmarks>,
    pub hands_detected: u8,
    pub distance: f32,
    pub left_openness: f32,
    pub right_openness: f32,
    pub average_openness: f32,
    pub tension: f32,
    pub scale: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub is_active: bool,
}

impl GestureState {
    pub fn signals(&self) -> ControlSignals {
        ControlSignals {
            tension: self.tension,
            scale: self.scale,
            center_x: self.center_x,
            center_y: self.center_y,
            hands_detected: self.hands_detected,
            is_active: self.is_active,
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Smoothed::default().state(None, None)
    }
}

/// Smoothing accumulators.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Smoothed {
    distance: f32,
    left_openness: f32,
    right_openness: f32,
    average_openness: f32,
    scale: f32,
    center_x: f32,
    center_y: f32,
}

impl Default for Smoothed {
    fn default() -> Self {
        Self {
            distance: NEUTRAL_DISTANCE,
            left_openness: NEUTRAL_OPENNESS,
            right_openness: NEUTRAL_OPENNESS,
            average_openness: NEUTRAL_OPENNESS,
            scale: NEUTRAL_SCALE,
            center_x: NEUTRAL_CENTER,
            center_y: NEUTRAL_CENTER,
        }
    }
}

impl Smoothed {
    fn state(&self, left: Option<HandLandmarks>, right: Option<HandLandmarks>) -> GestureState {
        let hands_detected = left.is_some() as u8 + right.is_some() as u8;
        GestureState {
            left_hand: left,
            right_hand: right,
            hands_detected,
            distance: self.distance,
            left_openness: self.left_openness,
            right_openness: self.right_openness,
            average_openness: self.average_openness,
            tension: (1.0 - self.average_openness).clamp(0.0, 1.0),
            scale: self.scale,
            center_x: self.center_x,
            center_y: self.center_y,
            is_active: hands_detected > 0,
        }
    }
}

/// `s += (target - s) * rate`
fn approach(value: &mut f32, target: f32, rate: f32) {
    *value += (target - *value) * rate;
}

pub type GestureObserver = Box<dyn FnMut(&GestureState)>;

/// Turns raw landmarks into a smoothed [`GestureState`].
///
/// Each result is written synchronously to the shared [`ControlCell`] for the
/// frame loop and handed to UI observers, which may be throttled.
pub struct GestureInterpreter {
    config: GestureConfig,
    smoothed: Smoothed,
    cell: Arc<ControlCell>,
    alive: Arc<AtomicBool>,
    observers: Vec<GestureObserver>,
    callbacks: u32,
    latest: GestureState,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig, cell: Arc<ControlCell>, alive: Arc<AtomicBool>) -> Self {
        Self {
            config,
            smoothed: Smoothed::default(),
            cell,
            alive,
            observers: Vec::new(),
            callbacks: 0,
            latest: GestureState::default(),
        }
    }

    /// Register a UI observer.
    pub fn subscribe(&mut self, observer: impl FnMut(&GestureState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn latest(&self) -> &GestureState {
        &self.latest
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Handle one detection callback. Returns `None` once the scene is torn down.
    pub fn process(&mut self, hands: &[DetectedHand]) -> Option<&GestureState> {
        if !self.alive.load(Ordering::Acquire) {
            return None;
        }

        let (left, right) = assign_hands(hands);
        let was_active = self.latest.is_active;
        match (left, right) {
            (None, None) => self.settle(),
            _ => self.track(left.as_ref(), right.as_ref()),
        }

        self.latest = self.smoothed.state(left, right);
        self.cell.publish(&self.latest.signals());
        if self.latest.is_active != was_active {
            log::debug!("gesture: {} hand(s) detected", self.latest.hands_detected);
        }

        self.callbacks = self.callbacks.wrapping_add(1);
        let interval = self.config.observer_interval.max(1);
        if self.callbacks % interval == 0 {
            for observer in &mut self.observers {
                observer(&self.latest);
            }
        }
        Some(&self.latest)
    }

    /// No hands: drift gently toward neutral instead of snapping.
    fn settle(&mut self) {
        let rate = self.config.idle_decay;
        let s = &mut self.smoothed;
        approach(&mut s.distance, NEUTRAL_DISTANCE, rate);
        approach(&mut s.left_openness, NEUTRAL_OPENNESS, rate);
        approach(&mut s.right_openness, NEUTRAL_OPENNESS, rate);
        approach(&mut s.average_openness, NEUTRAL_OPENNESS, rate);
        approach(&mut s.scale, NEUTRAL_SCALE, rate);
        approach(&mut s.center_x, NEUTRAL_CENTER, rate);
        approach(&mut s.center_y, NEUTRAL_CENTER, rate);
    }

    fn track(&mut self, left: Option<&HandLandmarks>, right: Option<&HandLandmarks>) {
        let cfg = self.config;
        let s = &mut self.smoothed;

        let left_open = left.map(|h| h.openness(cfg.palm_epsilon));
        let right_open = right.map(|h| h.openness(cfg.palm_epsilon));
        for (value, raw) in [(&mut s.left_openness, left_open), (&mut s.right_openness, right_open)] {
            match raw {
                Some(raw) => approach(value, raw, cfg.smoothing),
                None => approach(value, NEUTRAL_OPENNESS, cfg.idle_decay),
            }
        }

        let present: Vec<f32> = [left_open, right_open].into_iter().flatten().collect();
        let average = present.iter().sum::<f32>() / present.len() as f32;
        approach(&mut s.average_openness, average, cfg.smoothing);

        let centers: Vec<_> = [left, right].into_iter().flatten().map(|h| h.center()).collect();
        let center = centers.iter().copied().sum::<glam::Vec3>() / centers.len() as f32;
        // Image x is mirrored on screen.
        approach(&mut s.center_x, (1.0 - center.x).clamp(0.0, 1.0), cfg.smoothing);
        approach(&mut s.center_y, center.y.clamp(0.0, 1.0), cfg.smoothing);

        let distance_factor = match (left, right) {
            (Some(l), Some(r)) => {
                let raw = (l.center().distance(r.center()) / cfg.distance_span).clamp(0.0, 1.0);
                approach(&mut s.distance, raw, cfg.smoothing);
                lerp(DISTANCE_SCALE_MIN, DISTANCE_SCALE_MAX, s.distance)
            }
            _ => {
                approach(&mut s.distance, NEUTRAL_DISTANCE, cfg.idle_decay);
                1.0
            }
        };
        let openness_factor = lerp(OPENNESS_SCALE_MIN, OPENNESS_SCALE_MAX, average);
        approach(&mut s.scale, distance_factor * openness_factor, cfg.smoothing);
    }
}

/// Sort provider hands into anatomical slots. A duplicate label takes the free
/// slot; hands beyond two are ignored.
fn assign_hands(hands: &[DetectedHand]) -> (Option<HandLandmarks>, Option<HandLandmarks>) {
    let mut left = None;
    let mut right = None;
    for hand in hands {
        let (own, other) = match hand.label.anatomical() {
            Hand::Left => (&mut left, &mut right),
            Hand::Right => (&mut right, &mut left),
        };
        if own.is_none() {
            *own = Some(hand.landmarks);
        } else if other.is_none() {
            *other = Some(hand.landmarks);
        }
    }
    (left, right)
}
