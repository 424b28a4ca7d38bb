// extensions/mod.rs
//
// Small math helpers shared by the simulation and the CPU mirrors of shader code.

pub mod easing;

pub use easing::{lerp, smoothstep, Easing};
