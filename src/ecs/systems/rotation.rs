//! Idle spin for decorative objects

use anyhow::Result;

use crate::ecs::components::{ObjectRef, Rotating};
use crate::ecs::scheduler::System;
use crate::ecs::EcsWorld;
use crate::scene::SharedScene;

pub struct RotationSystem {
    scene: SharedScene,
    /// Radians per second, applied to the X and Y axes
    rate: f32,
}

impl RotationSystem {
    pub fn new(scene: SharedScene, rate: f32) -> Self {
        Self { scene, rate }
    }
}

impl System for RotationSystem {
    fn name(&self) -> &'static str {
        "RotationSystem"
    }

    fn execute(&mut self, world: &mut EcsWorld, delta: f32, _elapsed: f32) -> Result<()> {
        let step = self.rate * delta;
        let mut scene = self.scene.lock();

        for entity in world.query::<(&Rotating, &ObjectRef)>() {
            let object = world.get::<ObjectRef>(entity)?.0;
            if let Some(mut rotation) = scene.rotation(object) {
                rotation.x += step;
                rotation.y += step;
                scene.set_rotation(object, rotation);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Renderables, Scene, Transform};
    use glam::Vec3;

    #[test]
    fn test_rotation_accumulates_linearly() {
        let scene = Scene::new().into_shared();
        let spinning = scene.lock().add_object("spin".to_string(), Vec3::ONE, Transform::identity());
        let still = scene.lock().add_object("still".to_string(), Vec3::ONE, Transform::identity());

        let mut world = EcsWorld::new();
        let entity = world.create_entity();
        world.attach(entity, Rotating).unwrap();
        world.attach(entity, ObjectRef(spinning)).unwrap();
        let other = world.create_entity();
        world.attach(other, ObjectRef(still)).unwrap();

        let mut system = RotationSystem::new(scene.clone(), 0.4);
        system.execute(&mut world, 0.5, 0.5).unwrap();

        let rotation = scene.lock().rotation(spinning).unwrap();
        assert_eq!(rotation.x, 0.2);
        assert_eq!(rotation.y, 0.2);
        assert_eq!(rotation.z, 0.0);

        for _ in 0..4 {
            system.execute(&mut world, 0.5, 0.0).unwrap();
        }
        let rotation = scene.lock().rotation(spinning).unwrap();
        assert!((rotation.x - 1.0).abs() < 1e-5);
        assert!((rotation.y - 1.0).abs() < 1e-5);
        assert_eq!(scene.lock().rotation(still), Some(Vec3::ZERO));
    }
}
