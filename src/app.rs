//! Session wiring: store, collaborators and the ordered system list

use anyhow::Result;

use crate::config::InteractionConfigData;
use crate::ecs::scheduler::{FrameClock, Scheduler};
use crate::ecs::systems::{
    ButtonSystem, CalibrationSystem, InstructionSystem, RayPickSystem, RotationSystem,
};
use crate::ecs::EcsWorld;
use crate::error::InitError;
use crate::scene::SharedScene;
use crate::xr::{SharedHeadPose, SharedPointer};

/// One interaction session
pub struct InteractionApp {
    world: EcsWorld,
    scheduler: Scheduler,
    clock: FrameClock,
}

impl InteractionApp {
    pub fn builder() -> InteractionAppBuilder {
        InteractionAppBuilder::default()
    }

    pub fn world(&self) -> &EcsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut EcsWorld {
        &mut self.world
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.scheduler.system_names()
    }

    /// Advance the clock by `delta` seconds and run one frame
    pub fn frame(&mut self, delta: f32) -> Result<()> {
        let elapsed = self.clock.advance(delta);
        self.tick(delta, elapsed)
    }

    /// Run one frame with caller-supplied timing
    pub fn tick(&mut self, delta: f32, elapsed: f32) -> Result<()> {
        self.scheduler.tick(&mut self.world, delta, elapsed)
    }
}

/// Collects collaborators and rejects incomplete wiring before the first frame
#[derive(Default)]
pub struct InteractionAppBuilder {
    config: InteractionConfigData,
    world: Option<EcsWorld>,
    scene: Option<SharedScene>,
    pointers: Option<Vec<SharedPointer>>,
    head: Option<SharedHeadPose>,
}

impl InteractionAppBuilder {
    pub fn config(mut self, config: InteractionConfigData) -> Self {
        self.config = config;
        self
    }

    /// Start from a pre-populated store instead of an empty one
    pub fn world(mut self, world: EcsWorld) -> Self {
        self.world = Some(world);
        self
    }

    pub fn scene(mut self, scene: SharedScene) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Tracked hands, in the order they are resolved each frame
    pub fn pointers(mut self, pointers: Vec<SharedPointer>) -> Self {
        self.pointers = Some(pointers);
        self
    }

    pub fn head_pose(mut self, head: SharedHeadPose) -> Self {
        self.head = Some(head);
        self
    }

    pub fn build(self) -> Result<InteractionApp, InitError> {
        let scene = self.scene.ok_or(InitError::MissingCapability {
            system: "InteractionApp",
            capability: "renderable scene",
        })?;
        let pointers = self.pointers.ok_or(InitError::MissingCapability {
            system: "RayPickSystem",
            capability: "pointer list",
        })?;
        let head = self.head.ok_or(InitError::MissingCapability {
            system: "CalibrationSystem",
            capability: "head pose",
        })?;

        let config = self.config;
        let scheduler = Scheduler::new()
            .with_system(ButtonSystem::new(config.action_failure_policy))
            .with_system(RayPickSystem::new(pointers.clone(), config.resting_cursor_distance))
            .with_system(CalibrationSystem::new(head, scene.clone()))
            .with_system(RotationSystem::new(scene.clone(), config.rotation_rate))
            .with_system(InstructionSystem::new(pointers, scene));

        tracing::info!(systems = ?scheduler.system_names(), "interaction scheduler ready");

        Ok(InteractionApp {
            world: self.world.unwrap_or_default(),
            scheduler,
            clock: FrameClock::new(),
        })
    }
}
