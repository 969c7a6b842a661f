//! Hand-tracked interaction core for an organelle viewer
//!
//! An ECS store holds the interactable scene parts; a fixed list of systems
//! runs every frame to resolve pointer targets, button presses, one-shot
//! head-relative calibration and decorative updates.

pub mod app;
pub mod assets;
pub mod config;
pub mod ecs;
pub mod error;
pub mod scene;
pub mod xr;

pub use app::{InteractionApp, InteractionAppBuilder};
pub use config::EngineConfig;
pub use ecs::components::{Button, ButtonState, DataKind};
pub use ecs::EcsWorld;
pub use error::{EcsError, InitError};
