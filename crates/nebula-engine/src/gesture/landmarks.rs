use glam::Vec3;

/// Landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;
/// Floats per hand in the flat host format.
pub const HAND_FLOATS: usize = LANDMARK_COUNT * 3;

pub const WRIST: usize = 0;
pub const MIDDLE_MCP: usize = 9;

/// `(tip, base)` landmark indices for thumb, index, middle, ring and pinky.
pub const FINGERS: [(usize, usize); 5] = [(4, 2), (8, 5), (12, 9), (16, 13), (20, 17)];

/// Tip/base ratio of a curled finger; anything at or below reads as closed.
const CLOSED_RATIO: f32 = 1.0;
/// Ratio span from closed to fully extended.
const RATIO_SPAN: f32 = 1.2;

/// Handedness label as reported by the landmark provider (camera-space).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderLabel {
    Left,
    Right,
}

impl ProviderLabel {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            l if l.eq_ignore_ascii_case("left") => Some(Self::Left),
            l if l.eq_ignore_ascii_case("right") => Some(Self::Right),
            _ => None,
        }
    }

    /// The user's anatomical hand. The capture is mirrored for display, so the
    /// provider's "Left" is the user's right hand and vice versa.
    pub fn anatomical(self) -> Hand {
        match self {
            Self::Left => Hand::Right,
            Self::Right => Hand::Left,
        }
    }
}

/// Anatomical hand of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

/// 21 normalized landmarks of one hand: x, y in [0, 1] image space, z relative depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Parse 63 floats `[x0, y0, z0, x1, ...]`. Returns `None` on a short slice
    /// or non-finite values.
    pub fn from_slice(data: &[f32]) -> Option<Self> {
        if data.len() < HAND_FLOATS || data[..HAND_FLOATS].iter().any(|v| !v.is_finite()) {
            return None;
        }
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        for (i, p) in points.iter_mut().enumerate() {
            *p = Vec3::new(data[i * 3], data[i * 3 + 1], data[i * 3 + 2]);
        }
        Some(Self { points })
    }

    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Vec3 {
        self.points[WRIST]
    }

    /// Midpoint of wrist and middle-finger MCP.
    pub fn center(&self) -> Vec3 {
        (self.points[WRIST] + self.points[MIDDLE_MCP]) * 0.5
    }

    /// Wrist to middle-finger MCP distance.
    pub fn palm_size(&self) -> f32 {
        self.points[MIDDLE_MCP].distance(self.points[WRIST])
    }

    /// Openness of one finger in [0, 1] from its tip/base distance ratio.
    pub fn finger_openness(&self, tip: usize, base: usize) -> f32 {
        let wrist = self.wrist();
        let base_dist = self.points[base].distance(wrist);
        if base_dist <= f32::EPSILON {
            return 0.0;
        }
        let ratio = self.points[tip].distance(wrist) / base_dist;
        ((ratio - CLOSED_RATIO) / RATIO_SPAN).clamp(0.0, 1.0)
    }

    /// Mean openness over the five fingers. A barely visible hand (palm smaller
    /// than `palm_epsilon`) reads as closed.
    pub fn openness(&self, palm_epsilon: f32) -> f32 {
        if self.palm_size() < palm_epsilon {
            return 0.0;
        }
        let total: f32 = FINGERS
            .iter()
            .map(|&(tip, base)| self.finger_openness(tip, base))
            .sum();
        total / FINGERS.len() as f32
    }
}

/// One hand from a detection callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedHand {
    pub label: ProviderLabel,
    pub landmarks: HandLandmarks,
}

impl DetectedHand {
    /// Parse the flat host format: `points` holds `labels.len() * 63` floats.
    /// Hands with an unknown label or malformed data are skipped.
    pub fn parse_batch(points: &[f32], labels: &[&str]) -> Vec<DetectedHand> {
        labels
            .iter()
            .enumerate()
            .filter_map(|(i, label)| {
                let start = i * HAND_FLOATS;
                let landmarks = HandLandmarks::from_slice(points.get(start..)?)?;
                let label = ProviderLabel::parse(label)?;
                Some(DetectedHand { label, landmarks })
            })
            .collect()
    }
}

/// Synthetic hand poses for tests.
#[cfg(test)]
pub(crate) mod synthetic {
    use super::*;

    /// A hand at `origin` with every fingertip `extension` times as far from the
    /// wrist as its base joint. `extension = 1.0` is a closed fist.
    pub fn hand(origin: Vec3, extension: f32) -> HandLandmarks {
        let mut points = [origin; LANDMARK_COUNT];
        let palm = 0.08;
        for (finger, &(tip, base)) in FINGERS.iter().enumerate() {
            let angle = -0.6 + finger as f32 * 0.3;
            let dir = Vec3::new(angle.sin(), -angle.cos(), 0.0);
            points[base] = origin + dir * palm;
            points[base + 1] = origin + dir * palm * (1.0 + (extension - 1.0) * 0.33);
            if tip - base == 3 {
                points[base + 2] = origin + dir * palm * (1.0 + (extension - 1.0) * 0.66);
            }
            points[tip] = origin + dir * palm * extension;
        }
        points[1] = origin + Vec3::new(-0.3, -0.2, 0.0) * palm;
        HandLandmarks::new(points)
    }
}
