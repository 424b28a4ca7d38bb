use bytemuck::{Pod, Zeroable};

/// What a [`SceneEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SceneEventKind {
    /// `a` = transition mode code, `b` = shape index.
    TransitionStarted = 1,
    /// `a` = previous phase code, `b` = new phase code.
    PhaseChanged = 2,
    /// `a` = hands now, `b` = hands before.
    HandsChanged = 3,
    /// `a` = [`PulseReason`] code.
    PulseFired = 4,
}

/// Why a pulse was fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PulseReason {
    HandsAppeared = 0,
    HandsLost = 1,
    Requested = 2,
}

/// A scene event communicated from Rust to TypeScript via the shared buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SceneEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl SceneEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: SceneEventKind, a: f32, b: f32) -> Self {
        Self {
            kind: kind as u32 as f32,
            a,
            b,
            c: 0.0,
        }
    }

    pub fn is(&self, kind: SceneEventKind) -> bool {
        self.kind == kind as u32 as f32
    }
}

pub fn events_as_floats(events: &[SceneEvent]) -> &[f32] {
    bytemuck::cast_slice(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_is_four_floats() {
        assert_eq!(std::mem::size_of::<SceneEvent>(), SceneEvent::FLOATS * 4);
        let e = SceneEvent::new(SceneEventKind::PulseFired, PulseReason::Requested as u32 as f32, 0.0);
        assert!(e.is(SceneEventKind::PulseFired));
        assert_eq!(bytemuck::cast::<SceneEvent, [f32; 4]>(e), [4.0, 2.0, 0.0, 0.0]);
    }
}
