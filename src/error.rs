use hecs::Entity;
use thiserror::Error;

use crate::ecs::components::DataKind;

/// Entity store failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcsError {
    /// Requested a record the entity does not carry
    #[error("entity {entity:?} has no {kind} record")]
    NotFound { entity: Entity, kind: DataKind },

    /// The entity id was never allocated by this store
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
}

/// Failures while wiring systems to their collaborators
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitError {
    #[error("{system} requires {capability} but none was provided")]
    MissingCapability {
        system: &'static str,
        capability: &'static str,
    },
}
