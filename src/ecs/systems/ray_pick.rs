//! Nearest-hit picking for hand pointers
//!
//! Each pointer is resolved independently, in list order. The nearest
//! interactable under the ray receives Hovered or Pressed for this frame
//! and the pointer cursor snaps to the hit distance.

use anyhow::Result;
use hecs::Entity;

use crate::ecs::components::{Button, ButtonState, Interactable, ObjectRef};
use crate::ecs::scheduler::System;
use crate::ecs::EcsWorld;
use crate::scene::RayHit;
use crate::xr::{Pointer, SharedPointer};

pub struct RayPickSystem {
    pointers: Vec<SharedPointer>,
    /// Cursor distance when nothing is under the ray
    resting_distance: f32,
}

impl RayPickSystem {
    pub fn new(pointers: Vec<SharedPointer>, resting_distance: f32) -> Self {
        Self {
            pointers,
            resting_distance,
        }
    }

    /// Nearest interactable hit by `pointer`, strictly closest first-seen wins
    pub fn pick(world: &EcsWorld, pointer: &dyn Pointer) -> Result<Option<(Entity, f32)>> {
        let mut nearest: Option<(Entity, f32)> = None;

        for entity in world.query::<(&Interactable, &ObjectRef)>() {
            let object = world.get::<ObjectRef>(entity)?.0;
            let Some(distance) = closest_distance(&pointer.intersect(object)) else {
                continue;
            };

            let best = nearest.map_or(f32::INFINITY, |(_, d)| d);
            if distance < best {
                nearest = Some((entity, distance));
            }
        }

        Ok(nearest)
    }
}

impl System for RayPickSystem {
    fn name(&self) -> &'static str {
        "RayPickSystem"
    }

    fn execute(&mut self, world: &mut EcsWorld, _delta: f32, _elapsed: f32) -> Result<()> {
        for shared in &self.pointers {
            let mut pointer = shared.lock();

            let Some((entity, distance)) = Self::pick(world, &*pointer)? else {
                pointer.set_cursor_distance(self.resting_distance);
                continue;
            };

            pointer.set_cursor_distance(distance);

            if world.has::<Button>(entity) {
                let mut button = world.get_mut::<Button>(entity)?;
                if pointer.is_activated() {
                    button.current_state = ButtonState::Pressed;
                } else if button.current_state != ButtonState::Pressed {
                    button.current_state = ButtonState::Hovered;
                }
                tracing::trace!(?entity, distance, state = ?button.current_state, "pointer target");
            }
        }
        Ok(())
    }
}

/// Smallest finite hit distance, regardless of hit ordering
fn closest_distance(hits: &[RayHit]) -> Option<f32> {
    hits.iter()
        .map(|hit| hit.distance)
        .filter(|distance| distance.is_finite())
        .min_by(|a, b| a.total_cmp(b))
}
