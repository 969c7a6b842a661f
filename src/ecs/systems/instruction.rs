//! Shows instruction panels while any hand is tracked

use anyhow::Result;

use crate::ecs::components::{InstructionVisibility, ObjectRef};
use crate::ecs::scheduler::System;
use crate::ecs::EcsWorld;
use crate::scene::SharedScene;
use crate::xr::SharedPointer;

pub struct InstructionSystem {
    pointers: Vec<SharedPointer>,
    scene: SharedScene,
}

impl InstructionSystem {
    pub fn new(pointers: Vec<SharedPointer>, scene: SharedScene) -> Self {
        Self { pointers, scene }
    }
}

impl System for InstructionSystem {
    fn name(&self) -> &'static str {
        "InstructionSystem"
    }

    fn execute(&mut self, world: &mut EcsWorld, _delta: f32, _elapsed: f32) -> Result<()> {
        let visible = self.pointers.iter().any(|pointer| pointer.lock().is_visible());
        let mut scene = self.scene.lock();

        for entity in world.query::<(&InstructionVisibility, &ObjectRef)>() {
            let object = world.get::<ObjectRef>(entity)?.0;
            scene.set_visible(object, visible);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::systems::testing::{as_dyn, ScriptedPointer};
    use crate::scene::{Renderables, Scene, Transform};
    use glam::Vec3;

    #[test]
    fn test_visibility_follows_any_pointer() {
        let scene = Scene::new().into_shared();
        let panel = scene.lock().add_object("hint".to_string(), Vec3::ONE, Transform::identity());
        let left = ScriptedPointer::default().shared();
        let right = ScriptedPointer::default().shared();

        let mut world = EcsWorld::new();
        let entity = world.create_entity();
        world.attach(entity, InstructionVisibility).unwrap();
        world.attach(entity, ObjectRef(panel)).unwrap();

        let mut system = InstructionSystem::new(vec![as_dyn(&left), as_dyn(&right)], scene.clone());

        system.execute(&mut world, 0.016, 0.0).unwrap();
        assert_eq!(scene.lock().is_visible(panel), Some(false));

        right.lock().visible = true;
        system.execute(&mut world, 0.016, 0.0).unwrap();
        assert_eq!(scene.lock().is_visible(panel), Some(true));

        right.lock().visible = false;
        system.execute(&mut world, 0.016, 0.0).unwrap();
        assert_eq!(scene.lock().is_visible(panel), Some(false));
    }
}
