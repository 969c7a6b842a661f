//! Headset capabilities consumed by the interaction systems
//!
//! A real runtime supplies tracked hands and the viewer pose; the in-memory
//! `HandPointer` and `XrSession` are driven by the host each frame.

pub mod pointer;
pub mod session;

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;

use crate::scene::{ObjectHandle, RayHit};

pub use pointer::HandPointer;
pub use session::XrSession;

/// Ray and pinch state for one tracked hand
pub trait Pointer: Send {
    /// Hits of this pointer's ray against one object, in any order
    fn intersect(&self, object: ObjectHandle) -> Vec<RayHit>;

    /// Pinch / press gesture currently held
    fn is_activated(&self) -> bool;

    /// Render the cursor this far along the ray
    fn set_cursor_distance(&mut self, distance: f32);

    /// Hand is tracked and shown
    fn is_visible(&self) -> bool;
}

/// Live viewer pose
pub trait HeadPose: Send {
    fn is_session_active(&self) -> bool;
    fn current_position(&self) -> Vec3;
}

pub type SharedPointer = Arc<Mutex<dyn Pointer>>;
pub type SharedHeadPose = Arc<Mutex<dyn HeadPose>>;
