//! One-shot placement relative to the live head pose
//!
//! Pending entities are retried every frame until a session is active,
//! then positioned at `head + offset` and their `NeedsCalibration` tag is
//! removed for good.

use anyhow::Result;

use crate::ecs::components::{CalibrationOffset, NeedsCalibration, ObjectRef};
use crate::ecs::scheduler::System;
use crate::ecs::EcsWorld;
use crate::scene::SharedScene;
use crate::xr::SharedHeadPose;

pub struct CalibrationSystem {
    head: SharedHeadPose,
    scene: SharedScene,
}

impl CalibrationSystem {
    pub fn new(head: SharedHeadPose, scene: SharedScene) -> Self {
        Self { head, scene }
    }
}

impl System for CalibrationSystem {
    fn name(&self) -> &'static str {
        "CalibrationSystem"
    }

    fn execute(&mut self, world: &mut EcsWorld, _delta: f32, _elapsed: f32) -> Result<()> {
        let pending = world.query::<(&NeedsCalibration, &CalibrationOffset, &ObjectRef)>();
        if pending.is_empty() {
            return Ok(());
        }

        let head_position = {
            let head = self.head.lock();
            if !head.is_session_active() {
                return Ok(());
            }
            head.current_position()
        };

        for entity in pending {
            let offset = world.get::<CalibrationOffset>(entity)?.0;
            let object = world.get::<ObjectRef>(entity)?.0;
            let target = head_position + offset;

            self.scene.lock().set_position(object, target);
            world.detach::<NeedsCalibration>(entity);
            tracing::info!(?entity, ?target, "calibrated against head pose");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::systems::testing::{head_as_dyn, FakeHead};
    use crate::scene::{Renderables, Scene, Transform};
    use glam::Vec3;

    #[test]
    fn test_waits_for_session_then_fires_once() {
        let scene = Scene::new().into_shared();
        let start = Vec3::new(9.0, 9.0, 9.0);
        let object = scene.lock().add_object(
            "panel".to_string(),
            Vec3::splat(0.1),
            Transform::from_position_scale(start, 1.0),
        );
        let head = FakeHead::default().shared();

        let mut world = EcsWorld::new();
        let entity = world.create_entity();
        world.attach(entity, ObjectRef(object)).unwrap();
        world.attach(entity, CalibrationOffset(Vec3::new(0.0, -0.2, -0.5))).unwrap();
        world.attach(entity, NeedsCalibration).unwrap();

        let mut system = CalibrationSystem::new(head_as_dyn(&head), scene.clone());

        for _ in 0..5 {
            system.execute(&mut world, 0.016, 0.0).unwrap();
        }
        assert_eq!(scene.lock().position(object), Some(start));
        assert!(world.has::<NeedsCalibration>(entity));

        {
            let mut head = head.lock();
            head.active = true;
            head.position = Vec3::new(0.0, 1.6, 0.0);
        }
        system.execute(&mut world, 0.016, 0.0).unwrap();

        let placed = scene.lock().position(object).unwrap();
        assert!((placed - Vec3::new(0.0, 1.4, -0.5)).length() < 1e-6);
        assert!(!world.has::<NeedsCalibration>(entity));

        // Later head movement does not re-place the panel
        {
            let mut head = head.lock();
            head.position = Vec3::new(5.0, 5.0, 5.0);
            head.active = false;
        }
        system.execute(&mut world, 0.016, 0.0).unwrap();
        head.lock().active = true;
        system.execute(&mut world, 0.016, 0.0).unwrap();

        assert_eq!(scene.lock().position(object), Some(placed));
        assert!(world.has::<CalibrationOffset>(entity));
    }
}
