//! Ring of time-lagged position snapshots for comet tails.
//!
//! Slot 0 is the newest snapshot, slot `length - 1` the oldest. Buffers are
//! slot-major so each slot is one contiguous `count * 3` run, ready for upload.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailConfig {
    /// Number of snapshots kept.
    pub length: usize,
    /// Alpha multiplier applied on every shift.
    pub decay: f32,
    pub max_alpha: f32,
    /// Alpha per unit of per-frame speed.
    pub speed_gain: f32,
    /// Update every Nth frame.
    pub every: u32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            length: 8,
            decay: 0.65,
            max_alpha: 0.8,
            speed_gain: 4.0,
            every: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrailRing {
    config: TrailConfig,
    count: usize,
    positions: Vec<f32>,
    alphas: Vec<f32>,
    frames: u64,
}

impl TrailRing {
    /// All slots start on `initial` with zero alpha.
    pub fn new(config: TrailConfig, initial: &[Vec3]) -> Self {
        let count = initial.len();
        let length = config.length.max(1);
        let flat: &[f32] = bytemuck::cast_slice(initial);
        let mut positions = Vec::with_capacity(length * count * 3);
        for _ in 0..length {
            positions.extend_from_slice(flat);
        }
        Self {
            config: TrailConfig { length, ..config },
            count,
            positions,
            alphas: vec![0.0; length * count],
            frames: 0,
        }
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.config.length
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn particle_count(&self) -> usize {
        self.count
    }

    /// Throttled update, called once per frame. Returns true when the ring changed.
    pub fn update(&mut self, current: &[Vec3], velocity: &[Vec3]) -> bool {
        let due = self.frames % u64::from(self.config.every.max(1)) == 0;
        self.frames += 1;
        if !due {
            return false;
        }
        self.shift();
        self.record(current, velocity);
        true
    }

    /// Move every slot one older and decay all stored alpha.
    pub fn shift(&mut self) {
        let stride = self.count * 3;
        let slots = self.config.length;
        if slots > 1 {
            self.positions.copy_within(0..(slots - 1) * stride, stride);
            self.alphas.copy_within(0..(slots - 1) * self.count, self.count);
        }
        let decay = self.config.decay;
        self.alphas.iter_mut().for_each(|a| *a *= decay);
    }

    /// Overwrite slot 0 with live positions; alpha grows with speed.
    pub fn record(&mut self, current: &[Vec3], velocity: &[Vec3]) {
        let n = self.count.min(current.len()).min(velocity.len());
        let flat: &[f32] = bytemuck::cast_slice(&current[..n]);
        self.positions[..n * 3].copy_from_slice(flat);
        for (alpha, v) in self.alphas[..n].iter_mut().zip(velocity) {
            *alpha = (v.length() * self.config.speed_gain).min(self.config.max_alpha);
        }
    }

    /// Flat positions of one slot.
    pub fn slot(&self, index: usize) -> &[f32] {
        let stride = self.count * 3;
        &self.positions[index * stride..(index + 1) * stride]
    }

    pub fn slot_alpha(&self, index: usize) -> &[f32] {
        &self.alphas[index * self.count..(index + 1) * self.count]
    }

    /// Every slot, newest first.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn alphas(&self) -> &[f32] {
        &self.alphas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(count: usize, speed: f32) -> (Vec<Vec3>, Vec<Vec3>) {
        let current = (0..count).map(|i| Vec3::splat(i as f32)).collect();
        (current, vec![Vec3::new(speed, 0.0, 0.0); count])
    }

    #[test]
    fn slot_zero_mirrors_latest_positions() {
        let (mut current, velocity) = moving(4, 0.1);
        let mut ring = TrailRing::new(TrailConfig::default(), &current);
        for frame in 0..6 {
            current.iter_mut().for_each(|p| p.x += 1.0);
            let wrote = ring.update(&current, &velocity);
            assert_eq!(wrote, frame % 2 == 0, "updates every second frame");
            if wrote {
                assert_eq!(ring.slot(0), bytemuck::cast_slice::<Vec3, f32>(&current));
            }
        }
    }

    #[test]
    fn older_slots_lag_behind() {
        let config = TrailConfig { every: 1, ..TrailConfig::default() };
        let (mut current, velocity) = moving(3, 0.1);
        let mut ring = TrailRing::new(config, &current);
        for _ in 0..3 {
            current.iter_mut().for_each(|p| p.y += 1.0);
            ring.update(&current, &velocity);
        }
        assert_eq!(ring.slot(0)[1], 3.0);
        assert_eq!(ring.slot(1)[1], 2.0);
        assert_eq!(ring.slot(2)[1], 1.0);
    }

    #[test]
    fn oldest_alpha_decays_geometrically() {
        let config = TrailConfig::default();
        let (current, velocity) = moving(16, 1.0);
        let mut ring = TrailRing::new(config, &current);
        for _ in 0..config.length {
            ring.shift();
            ring.record(&current, &velocity);
        }
        let alpha0 = config.max_alpha;
        assert!(ring.slot_alpha(config.length - 1).iter().all(|&a| a > 0.0));

        for n in 1..=12 {
            ring.shift();
            let bound = alpha0 * config.decay.powi(n) * (1.0 + 1e-5);
            for &a in ring.slot_alpha(config.length - 1) {
                assert!(a <= bound, "after {} shifts alpha {} exceeds {}", n, a, bound);
            }
        }
    }

    #[test]
    fn fast_particles_leave_brighter_trails() {
        let config = TrailConfig { every: 1, ..TrailConfig::default() };
        let current = vec![Vec3::ZERO; 2];
        let velocity = vec![Vec3::new(0.05, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let mut ring = TrailRing::new(config, &current);
        ring.update(&current, &velocity);
        let alpha = ring.slot_alpha(0);
        assert!((alpha[0] - 0.2).abs() < 1e-6);
        assert_eq!(alpha[1], config.max_alpha);
    }

    #[test]
    fn buffer_sizes() {
        let ring = TrailRing::new(TrailConfig::default(), &vec![Vec3::ZERO; 10]);
        assert_eq!(ring.positions().len(), 8 * 10 * 3);
        assert_eq!(ring.alphas().len(), 8 * 10);
        assert_eq!(ring.len(), 8);
    }
}
