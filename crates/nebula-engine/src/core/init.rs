//! Initialization lifecycle for the external collaborators (GPU device,
//! camera stream, landmark model).
//!
//! Failures are caught at the host boundary and reported here; the tracker
//! turns them, or an overrun of the wall-clock budget, into a terminal state.

use thiserror::Error;

/// Default initialization budget in seconds.
pub const DEFAULT_INIT_TIMEOUT: f32 = 15.0;

/// Why the scene could not start.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InitError {
    /// No WebGPU adapter/device could be created.
    #[error("GPU unavailable: {0}")]
    GpuUnavailable(String),

    /// The user (or the browser) refused camera access.
    #[error("camera permission denied: {0}")]
    CameraDenied(String),

    /// The hand-landmark model failed to download or compile.
    #[error("landmark model failed to load: {0}")]
    ModelLoadFailed(String),

    /// Initialization did not finish within the budget.
    #[error("initialization timed out after {seconds:.1}s")]
    Timeout { seconds: f32 },
}

/// Which collaborator is reporting in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitComponent {
    Gpu,
    Camera,
    Model,
}

impl InitComponent {
    /// Host-side numeric code (0 = GPU, 1 = camera, 2 = model).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Gpu),
            1 => Some(Self::Camera),
            2 => Some(Self::Model),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InitStatus {
    Loading,
    Ready,
    Failed(InitError),
}

/// Tracks readiness of the external collaborators against a timeout.
#[derive(Debug, Clone)]
pub struct InitTracker {
    status: InitStatus,
    gpu_ready: bool,
    camera_ready: bool,
    model_ready: bool,
    elapsed: f32,
    timeout: f32,
}

impl InitTracker {
    pub fn new(timeout: f32) -> Self {
        Self {
            status: InitStatus::Loading,
            gpu_ready: false,
            camera_ready: false,
            model_ready: false,
            elapsed: 0.0,
            timeout,
        }
    }

    pub fn status(&self) -> &InitStatus {
        &self.status
    }

    /// The frame loop may run once the GPU is up and nothing has failed.
    /// Camera and model may still be loading; particles render without hands.
    pub fn can_render(&self) -> bool {
        self.gpu_ready && !self.is_failed()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, InitStatus::Failed(_))
    }

    /// Mark a collaborator as ready.
    pub fn report_ready(&mut self, component: InitComponent) {
        if self.is_failed() {
            return;
        }
        match component {
            InitComponent::Gpu => self.gpu_ready = true,
            InitComponent::Camera => self.camera_ready = true,
            InitComponent::Model => self.model_ready = true,
        }
        if self.gpu_ready && self.camera_ready && self.model_ready {
            log::info!("init: all components ready after {:.2}s", self.elapsed);
            self.status = InitStatus::Ready;
        }
    }

    /// Record a terminal failure. The first failure wins.
    pub fn fail(&mut self, error: InitError) {
        if self.is_failed() {
            return;
        }
        log::warn!("init: {}", error);
        self.status = InitStatus::Failed(error);
    }

    /// Advance the wall clock by `dt` seconds; converts an overrun into a timeout.
    pub fn poll(&mut self, dt: f32) -> &InitStatus {
        if self.status == InitStatus::Loading {
            if dt.is_finite() && dt > 0.0 {
                self.elapsed += dt;
            }
            if self.elapsed >= self.timeout {
                self.fail(InitError::Timeout { seconds: self.timeout });
            }
        }
        &self.status
    }
}

impl Default for InitTracker {
    fn default() -> Self {
        Self::new(DEFAULT_INIT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_when_all_components_report() {
        let mut tracker = InitTracker::default();
        tracker.report_ready(InitComponent::Gpu);
        assert!(tracker.can_render());
        assert_eq!(*tracker.status(), InitStatus::Loading);
        tracker.report_ready(InitComponent::Camera);
        tracker.report_ready(InitComponent::Model);
        assert_eq!(*tracker.status(), InitStatus::Ready);
    }

    #[test]
    fn timeout_becomes_failure() {
        let mut tracker = InitTracker::new(15.0);
        for _ in 0..14 {
            tracker.poll(1.0);
        }
        assert_eq!(*tracker.status(), InitStatus::Loading);
        tracker.poll(1.0);
        assert_eq!(
            *tracker.status(),
            InitStatus::Failed(InitError::Timeout { seconds: 15.0 })
        );
    }

    #[test]
    fn gpu_failure_blocks_rendering() {
        let mut tracker = InitTracker::default();
        tracker.fail(InitError::GpuUnavailable("no adapter".into()));
        tracker.report_ready(InitComponent::Gpu);
        assert!(!tracker.can_render());
        assert!(tracker.is_failed());
    }

    #[test]
    fn ready_state_ignores_later_timeouts() {
        let mut tracker = InitTracker::new(1.0);
        tracker.report_ready(InitComponent::Gpu);
        tracker.report_ready(InitComponent::Camera);
        tracker.report_ready(InitComponent::Model);
        tracker.poll(10.0);
        assert_eq!(*tracker.status(), InitStatus::Ready);
    }

    #[test]
    fn first_failure_wins() {
        let mut tracker = InitTracker::default();
        tracker.fail(InitError::CameraDenied("NotAllowedError".into()));
        tracker.fail(InitError::ModelLoadFailed("404".into()));
        assert!(matches!(
            tracker.status(),
            InitStatus::Failed(InitError::CameraDenied(_))
        ));
    }

    #[test]
    fn component_codes() {
        assert_eq!(InitComponent::from_code(0), Some(InitComponent::Gpu));
        assert_eq!(InitComponent::from_code(2), Some(InitComponent::Model));
        assert_eq!(InitComponent::from_code(9), None);
    }
}
