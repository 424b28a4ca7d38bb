//! Radial pulse wave fired on hand enter/leave and on request.

use crate::extensions::easing::smoothstep;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseConfig {
    /// Shell growth in world units per second.
    pub speed: f32,
    /// Seconds until the pulse has fully faded.
    pub duration: f32,
    /// Half-width of the displaced shell.
    pub width: f32,
    pub amplitude: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            speed: 14.0,
            duration: 1.2,
            width: 1.2,
            amplitude: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PulseWave {
    config: PulseConfig,
    elapsed: Option<f32>,
}

impl PulseWave {
    pub fn new(config: PulseConfig) -> Self {
        Self { config, elapsed: None }
    }

    /// Start (or restart) a pulse from the origin.
    pub fn fire(&mut self) {
        self.elapsed = Some(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.elapsed.is_some()
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(t) = self.elapsed {
            let t = t + dt;
            self.elapsed = (t < self.config.duration).then_some(t);
        }
    }

    pub fn radius(&self) -> f32 {
        self.elapsed.map_or(0.0, |t| t * self.config.speed)
    }

    /// Fades linearly to zero over the pulse duration.
    pub fn strength(&self) -> f32 {
        self.elapsed.map_or(0.0, |t| {
            self.config.amplitude * (1.0 - t / self.config.duration).clamp(0.0, 1.0)
        })
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }
}

/// Band weight of a particle at `distance` from the origin: 1 on the shell,
/// falling smoothly to 0 at `width` either side. Same math as the vertex shader.
pub fn pulse_band(distance: f32, radius: f32, width: f32) -> f32 {
    smoothstep(radius - width, radius, distance) * (1.0 - smoothstep(radius, radius + width, distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_grows_and_fades() {
        let mut pulse = PulseWave::new(PulseConfig::default());
        assert_eq!((pulse.radius(), pulse.strength()), (0.0, 0.0));
        pulse.fire();
        assert_eq!(pulse.strength(), 1.0);

        let mut last_radius = 0.0;
        let mut last_strength = 1.0;
        for _ in 0..30 {
            pulse.tick(1.0 / 60.0);
            assert!(pulse.radius() > last_radius);
            assert!(pulse.strength() < last_strength);
            last_radius = pulse.radius();
            last_strength = pulse.strength();
        }
        assert!((last_radius - 7.0).abs() < 1e-3);
    }

    #[test]
    fn pulse_expires() {
        let mut pulse = PulseWave::new(PulseConfig::default());
        pulse.fire();
        for _ in 0..80 {
            pulse.tick(1.0 / 60.0);
        }
        assert!(!pulse.is_active());
        assert_eq!(pulse.strength(), 0.0);
    }

    #[test]
    fn band_is_a_thin_shell() {
        assert!((pulse_band(5.0, 5.0, 1.2) - 1.0).abs() < 1e-6);
        assert_eq!(pulse_band(3.0, 5.0, 1.2), 0.0);
        assert_eq!(pulse_band(7.0, 5.0, 1.2), 0.0);
        let near = pulse_band(4.7, 5.0, 1.2);
        assert!(near > 0.5 && near < 1.0);
    }
}
