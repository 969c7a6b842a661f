use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;

use super::HeadPose;

/// Headset session state written by the host
#[derive(Debug, Clone, Copy, Default)]
pub struct XrSession {
    pub active: bool,
    pub head_position: Vec3,
}

impl XrSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> Arc<Mutex<XrSession>> {
        Arc::new(Mutex::new(self))
    }

    pub fn start(&mut self, head_position: Vec3) {
        self.active = true;
        self.head_position = head_position;
        tracing::info!(?head_position, "xr session started");
    }

    pub fn end(&mut self) {
        self.active = false;
        tracing::info!("xr session ended");
    }
}

impl HeadPose for XrSession {
    fn is_session_active(&self) -> bool {
        self.active
    }

    fn current_position(&self) -> Vec3 {
        self.head_position
    }
}
