/// Variable-step frame clock.
/// The display callback drives one simulation step per frame; the clock clamps
/// each delta so a resumed background tab cannot fling particles across the scene.
pub struct FrameClock {
    /// Largest delta handed to the simulation, in seconds.
    max_dt: f32,
    /// Simulated seconds since the clock was created.
    elapsed: f32,
    /// Frames advanced so far.
    frame: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            max_dt: max_dt.max(0.0),
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Advance by a raw frame delta. Returns the clamped delta to simulate.
    /// Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, frame_dt: f32) -> f32 {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        };
        self.elapsed += dt;
        self.frame += 1;
        dt
    }

    /// Simulated seconds (drives shader animation).
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}
