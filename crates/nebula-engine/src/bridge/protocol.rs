/// Shared frame-buffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Uniforms: 48 floats]
/// [Positions: max_particles × 3 floats]
/// [Static attributes: max_particles × 6 floats]
/// [Trail positions: trail_slots × max_particles × 3 floats]
/// [Trail alphas: trail_slots × max_particles floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::types::SceneEvent;
use crate::renderer::uniforms::UNIFORM_FLOATS;
use crate::sim::STATIC_ATTRIBUTE_FLOATS;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_PARTICLES: usize = 2;
pub const HEADER_PARTICLE_COUNT: usize = 3;
pub const HEADER_TRAIL_SLOTS: usize = 4;
pub const HEADER_MAX_EVENTS: usize = 5;
pub const HEADER_EVENT_COUNT: usize = 6;
/// Bumped whenever the static section is rewritten.
pub const HEADER_STATIC_GENERATION: usize = 7;
pub const HEADER_PROTOCOL_VERSION: usize = 8;
pub const HEADER_UNIFORM_FLOATS: usize = 9;
pub const HEADER_VIEWPORT_WIDTH: usize = 10;
pub const HEADER_VIEWPORT_HEIGHT: usize = 11;
pub const HEADER_PIXEL_RATIO: usize = 12;
/// 1.0 once the backend has been released.
pub const HEADER_RELEASED: usize = 13;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per live position: x, y, z (wire format, fixed).
pub const POSITION_FLOATS: usize = 3;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_particles: usize,
    pub trail_slots: usize,
    pub max_events: usize,

    pub uniform_data_floats: usize,
    pub position_data_floats: usize,
    pub static_data_floats: usize,
    pub trail_position_floats: usize,
    pub trail_alpha_floats: usize,
    pub event_data_floats: usize,

    pub uniform_data_offset: usize,
    pub position_data_offset: usize,
    pub static_data_offset: usize,
    pub trail_position_offset: usize,
    pub trail_alpha_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_particles: usize, trail_slots: usize, max_events: usize) -> Self {
        let uniform_data_floats = UNIFORM_FLOATS;
        let position_data_floats = max_particles * POSITION_FLOATS;
        let static_data_floats = max_particles * STATIC_ATTRIBUTE_FLOATS;
        let trail_position_floats = trail_slots * max_particles * POSITION_FLOATS;
        let trail_alpha_floats = trail_slots * max_particles;
        let event_data_floats = max_events * SceneEvent::FLOATS;

        let uniform_data_offset = HEADER_FLOATS;
        let position_data_offset = uniform_data_offset + uniform_data_floats;
        let static_data_offset = position_data_offset + position_data_floats;
        let trail_position_offset = static_data_offset + static_data_floats;
        let trail_alpha_offset = trail_position_offset + trail_position_floats;
        let event_data_offset = trail_alpha_offset + trail_alpha_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_particles,
            trail_slots,
            max_events,
            uniform_data_floats,
            position_data_floats,
            static_data_floats,
            trail_position_floats,
            trail_alpha_floats,
            event_data_floats,
            uniform_data_offset,
            position_data_offset,
            static_data_offset,
            trail_position_offset,
            trail_alpha_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Header with capacities filled in, counters zeroed.
    pub fn initial_header(&self) -> [f32; HEADER_FLOATS] {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_MAX_PARTICLES] = self.max_particles as f32;
        header[HEADER_TRAIL_SLOTS] = self.trail_slots as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_UNIFORM_FLOATS] = UNIFORM_FLOATS as f32;
        header[HEADER_PIXEL_RATIO] = 1.0;
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_capacities_compute_correctly() {
        let layout = ProtocolLayout::new(1000, 8, 32);

        assert_eq!(layout.uniform_data_floats, 48);
        assert_eq!(layout.position_data_floats, 3000);
        assert_eq!(layout.static_data_floats, 6000);
        assert_eq!(layout.trail_position_floats, 24_000);
        assert_eq!(layout.trail_alpha_floats, 8000);
        assert_eq!(layout.event_data_floats, 128);

        let expected_total = HEADER_FLOATS + 48 + 3000 + 6000 + 24_000 + 8000 + 128;
        assert_eq!(layout.buffer_total_floats, expected_total);
        assert_eq!(layout.buffer_total_bytes, expected_total * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 4, 10);

        assert_eq!(layout.uniform_data_offset, HEADER_FLOATS);
        assert_eq!(layout.position_data_offset, layout.uniform_data_offset + layout.uniform_data_floats);
        assert_eq!(layout.static_data_offset, layout.position_data_offset + layout.position_data_floats);
        assert_eq!(layout.trail_position_offset, layout.static_data_offset + layout.static_data_floats);
        assert_eq!(layout.trail_alpha_offset, layout.trail_position_offset + layout.trail_position_floats);
        assert_eq!(layout.event_data_offset, layout.trail_alpha_offset + layout.trail_alpha_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn header_carries_capacities() {
        let header = ProtocolLayout::new(6000, 8, 32).initial_header();
        assert_eq!(header[HEADER_MAX_PARTICLES], 6000.0);
        assert_eq!(header[HEADER_TRAIL_SLOTS], 8.0);
        assert_eq!(header[HEADER_MAX_EVENTS], 32.0);
        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_EVENT_COUNT], 0.0);
    }
}
