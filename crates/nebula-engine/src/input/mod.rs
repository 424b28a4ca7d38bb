pub mod queue;

pub use queue::{ControlEvent, ControlQueue};
