pub mod init;
pub mod rng;
pub mod time;

pub use init::{InitComponent, InitError, InitStatus, InitTracker, DEFAULT_INIT_TIMEOUT};
pub use rng::{RandomSource, Rng};
pub use time::FrameClock;
