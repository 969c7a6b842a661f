//! Button state machine
//!
//! Rolls `current_state` into `previous_state` every frame and resets the
//! current slot, so a press lasts exactly one frame unless ray picking
//! re-asserts it. Actions fire on the rising edge only.

use anyhow::Result;

use crate::config::ActionFailurePolicy;
use crate::ecs::components::{Button, ButtonState};
use crate::ecs::scheduler::System;
use crate::ecs::EcsWorld;

pub struct ButtonSystem {
    policy: ActionFailurePolicy,
}

impl ButtonSystem {
    pub fn new(policy: ActionFailurePolicy) -> Self {
        Self { policy }
    }
}

impl Default for ButtonSystem {
    fn default() -> Self {
        Self::new(ActionFailurePolicy::Propagate)
    }
}

impl System for ButtonSystem {
    fn name(&self) -> &'static str {
        "ButtonSystem"
    }

    fn execute(&mut self, world: &mut EcsWorld, _delta: f32, _elapsed: f32) -> Result<()> {
        for entity in world.query::<&Button>() {
            let mut button = world.get_mut::<Button>(entity)?;

            let outcome = if button.is_rising_edge() {
                tracing::debug!(?entity, "button rising edge");
                (button.action)()
            } else {
                Ok(())
            };

            button.previous_state = button.current_state;
            button.current_state = ButtonState::None;
            drop(button);

            if let Err(err) = outcome {
                match self.policy {
                    ActionFailurePolicy::Propagate => {
                        return Err(err.context(format!("button action on {entity:?}")));
                    }
                    ActionFailurePolicy::Isolate => {
                        tracing::error!(?entity, error = %format!("{err:#}"), "button action failed; skipped");
                    }
                }
            }
        }
        Ok(())
    }
}
