//! Renderable-object provider
//!
//! The scene owns every renderable; entities only hold an `ObjectHandle`.
//! `Renderables` is the seam a real renderer implements, `Scene` is the
//! in-memory implementation used by the headless runner and the tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use glam::{EulerRot, Quat, Vec3};
use nalgebra as na;
use parking_lot::Mutex;
use rapier3d::parry::math::{Isometry, Point, Real, Translation, Vector};
use rapier3d::parry::query::Ray;
use rapier3d::parry::shape::SharedShape;

use crate::ecs::components::ButtonAction;

/// Smallest half extent used for ray tests, so planar parts stay pickable
const MIN_HALF_EXTENT: f32 = 1e-4;

/// Handle to an object owned by the renderable provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectHandle(pub u32);

/// Shared access to the renderable provider
///
/// Button actions capture this, so it must be `Send + Sync`.
pub type SharedScene = Arc<Mutex<dyn Renderables>>;

/// One ray/object intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
}

/// Transform for positioning objects in 3D space
///
/// Rotation is stored as XYZ Euler angles in radians so idle rotation
/// can accumulate per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn from_position_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(scale),
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A renderable mesh part with its material state
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub handle: ObjectHandle,
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub transparent: bool,
    pub opacity: f32,
    /// Local-space AABB center, before scaling
    pub center: Vec3,
    /// Local-space AABB half extents, before scaling
    pub half_extents: Vec3,
}

impl SceneObject {
    pub fn new(handle: ObjectHandle, name: String, half_extents: Vec3) -> Self {
        Self {
            handle,
            name,
            transform: Transform::default(),
            visible: true,
            transparent: false,
            opacity: 1.0,
            center: Vec3::ZERO,
            half_extents,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// World-space center of the bounding box
    pub fn world_center(&self) -> Vec3 {
        let t = &self.transform;
        t.position + t.orientation() * (self.center * t.scale)
    }

    /// Ray test against the scaled, posed bounding box
    ///
    /// Flat parts are thickened to `MIN_HALF_EXTENT`; non-finite or
    /// negative bounds and degenerate rays produce no hit.
    pub fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let half = self.half_extents * self.transform.scale.abs();
        if !half.is_finite() || half.min_element() < 0.0 {
            return None;
        }
        let half = half.max(Vec3::splat(MIN_HALF_EXTENT));
        if !origin.is_finite() || !direction.is_finite() || direction.length_squared() == 0.0 {
            return None;
        }

        let direction = direction.normalize();
        let shape = SharedShape::cuboid(half.x, half.y, half.z);
        let pose = pose_to_isometry(self.world_center(), self.transform.orientation());
        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(direction.x, direction.y, direction.z),
        );

        let distance = shape.cast_ray(&pose, &ray, Real::MAX, false)?;
        Some(RayHit {
            distance,
            point: origin + direction * distance,
        })
    }
}

/// Operations the interaction core needs from a renderer
pub trait Renderables: Send {
    /// Take ownership of a newly loaded part
    fn insert_object(
        &mut self,
        name: String,
        center: Vec3,
        half_extents: Vec3,
        transform: Transform,
    ) -> ObjectHandle;

    /// Every object handle, in a stable order
    fn handles(&self) -> Vec<ObjectHandle>;

    fn position(&self, handle: ObjectHandle) -> Option<Vec3>;
    fn set_position(&mut self, handle: ObjectHandle, position: Vec3);

    fn rotation(&self, handle: ObjectHandle) -> Option<Vec3>;
    fn set_rotation(&mut self, handle: ObjectHandle, rotation: Vec3);

    fn scale(&self, handle: ObjectHandle) -> Option<Vec3>;
    fn set_scale(&mut self, handle: ObjectHandle, scale: Vec3);

    fn is_visible(&self, handle: ObjectHandle) -> Option<bool>;
    fn set_visible(&mut self, handle: ObjectHandle, visible: bool);

    fn opacity(&self, handle: ObjectHandle) -> Option<f32>;
    /// Opacity below 1.0 also marks the material transparent
    fn set_opacity(&mut self, handle: ObjectHandle, opacity: f32);

    /// Hits of a world-space ray against one object, nearest first
    fn cast_ray(&self, handle: ObjectHandle, origin: Vec3, direction: Vec3) -> Vec<RayHit>;
}

/// In-memory scene holding every renderable part
#[derive(Debug, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectHandle, SceneObject>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object with a specific transform
    pub fn add_object(&mut self, name: String, half_extents: Vec3, transform: Transform) -> ObjectHandle {
        self.add_object_with_bounds(name, Vec3::ZERO, half_extents, transform)
    }

    /// Add an object whose geometry is not centered on its origin
    pub fn add_object_with_bounds(
        &mut self,
        name: String,
        center: Vec3,
        half_extents: Vec3,
        transform: Transform,
    ) -> ObjectHandle {
        let handle = ObjectHandle(self.next_id);
        self.next_id += 1;

        let object = SceneObject::new(handle, name, half_extents)
            .with_transform(transform)
            .with_center(center);
        self.objects.insert(handle, object);
        handle
    }

    pub fn get_object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    pub fn get_object_mut(&mut self, handle: ObjectHandle) -> Option<&mut SceneObject> {
        self.objects.get_mut(&handle)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectHandle> {
        self.objects
            .values()
            .find(|obj| obj.name == name)
            .map(|obj| obj.handle)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn into_shared(self) -> Arc<Mutex<Scene>> {
        Arc::new(Mutex::new(self))
    }
}

impl Renderables for Scene {
    fn insert_object(
        &mut self,
        name: String,
        center: Vec3,
        half_extents: Vec3,
        transform: Transform,
    ) -> ObjectHandle {
        self.add_object_with_bounds(name, center, half_extents, transform)
    }

    fn handles(&self) -> Vec<ObjectHandle> {
        self.objects.keys().copied().collect()
    }

    fn position(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.get_object(handle).map(|obj| obj.transform.position)
    }

    fn set_position(&mut self, handle: ObjectHandle, position: Vec3) {
        if let Some(obj) = self.get_object_mut(handle) {
            obj.transform.position = position;
        }
    }

    fn rotation(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.get_object(handle).map(|obj| obj.transform.rotation)
    }

    fn set_rotation(&mut self, handle: ObjectHandle, rotation: Vec3) {
        if let Some(obj) = self.get_object_mut(handle) {
            obj.transform.rotation = rotation;
        }
    }

    fn scale(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.get_object(handle).map(|obj| obj.transform.scale)
    }

    fn set_scale(&mut self, handle: ObjectHandle, scale: Vec3) {
        if let Some(obj) = self.get_object_mut(handle) {
            obj.transform.scale = scale;
        }
    }

    fn is_visible(&self, handle: ObjectHandle) -> Option<bool> {
        self.get_object(handle).map(|obj| obj.visible)
    }

    fn set_visible(&mut self, handle: ObjectHandle, visible: bool) {
        if let Some(obj) = self.get_object_mut(handle) {
            obj.visible = visible;
        }
    }

    fn opacity(&self, handle: ObjectHandle) -> Option<f32> {
        self.get_object(handle).map(|obj| obj.opacity)
    }

    fn set_opacity(&mut self, handle: ObjectHandle, opacity: f32) {
        if let Some(obj) = self.get_object_mut(handle) {
            obj.opacity = opacity;
            obj.transparent = opacity < 1.0;
        }
    }

    fn cast_ray(&self, handle: ObjectHandle, origin: Vec3, direction: Vec3) -> Vec<RayHit> {
        self.get_object(handle)
            .and_then(|obj| obj.cast_ray(origin, direction))
            .into_iter()
            .collect()
    }
}

/// Dim every renderable except `keep`, which becomes fully opaque
pub fn isolate(scene: &mut dyn Renderables, keep: ObjectHandle, dimmed_opacity: f32) -> Result<()> {
    let handles = scene.handles();
    if !handles.contains(&keep) {
        bail!("cannot isolate {keep:?}: not in scene");
    }

    for handle in handles {
        if handle == keep {
            scene.set_opacity(handle, 1.0);
        } else {
            scene.set_opacity(handle, dimmed_opacity);
        }
    }
    Ok(())
}

/// Restore every renderable to full opacity
pub fn show_all(scene: &mut dyn Renderables) {
    for handle in scene.handles() {
        scene.set_opacity(handle, 1.0);
    }
}

/// Button action isolating one object
pub fn isolate_action(scene: SharedScene, keep: ObjectHandle, dimmed_opacity: f32) -> ButtonAction {
    Box::new(move || {
        isolate(&mut *scene.lock(), keep, dimmed_opacity)?;
        tracing::info!(object = keep.0, "isolated model");
        Ok(())
    })
}

/// Button action restoring full opacity everywhere
pub fn show_all_action(scene: SharedScene) -> ButtonAction {
    Box::new(move || {
        show_all(&mut *scene.lock());
        tracing::info!("opaque mode");
        Ok(())
    })
}

/// Convert a glam pose to a parry Isometry
fn pose_to_isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation::new(position.x, position.y, position.z),
        na::UnitQuaternion::from_quaternion(na::Quaternion::new(
            rotation.w,
            rotation.x,
            rotation.y,
            rotation.z,
        )),
    )
}
