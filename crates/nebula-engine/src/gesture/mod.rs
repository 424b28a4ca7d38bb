//! Gesture interpretation: raw hand landmarks in, smoothed control signals out.
//!
//! The interpreter runs on the detection callback; the scene reads the shared
//! [`ControlCell`] once per frame. Neither side knows about the other beyond the cell.

pub mod interpreter;
pub mod landmarks;
pub mod signal;

pub use interpreter::{GestureConfig, GestureInterpreter, GestureState};
pub use landmarks::{DetectedHand, Hand, HandLandmarks, ProviderLabel, LANDMARK_COUNT};
pub use signal::{ControlCell, ControlSignals};
