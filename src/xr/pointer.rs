use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;

use super::Pointer;
use crate::scene::{ObjectHandle, RayHit, SharedScene};

/// Hand pointer with a host-driven ray
///
/// Intersection delegates to the scene so the pointer never owns geometry.
pub struct HandPointer {
    scene: SharedScene,
    pub origin: Vec3,
    pub direction: Vec3,
    pub pinched: bool,
    pub visible: bool,
    cursor_distance: f32,
}

impl HandPointer {
    pub fn new(scene: SharedScene) -> Self {
        Self {
            scene,
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            pinched: false,
            visible: false,
            cursor_distance: 0.0,
        }
    }

    pub fn into_shared(self) -> Arc<Mutex<HandPointer>> {
        Arc::new(Mutex::new(self))
    }

    /// Update the ray pose for this frame
    pub fn aim(&mut self, origin: Vec3, direction: Vec3) {
        self.origin = origin;
        self.direction = direction;
    }

    pub fn cursor_distance(&self) -> f32 {
        self.cursor_distance
    }

    /// World-space cursor position
    pub fn cursor_position(&self) -> Vec3 {
        self.origin + self.direction.normalize_or_zero() * self.cursor_distance
    }
}

impl Pointer for HandPointer {
    fn intersect(&self, object: ObjectHandle) -> Vec<RayHit> {
        self.scene.lock().cast_ray(object, self.origin, self.direction)
    }

    fn is_activated(&self) -> bool {
        self.pinched
    }

    fn set_cursor_distance(&mut self, distance: f32) {
        self.cursor_distance = distance;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
