//! ECS store and interaction systems
//!
//! This module provides:
//! - A typed entity store over `hecs` with creation-ordered queries
//! - Component definitions for interactable scene parts
//! - The per-frame scheduler and the systems it runs

pub mod components;
pub mod init;
pub mod scheduler;
pub mod systems;

use hecs::{ComponentError, Entity, Ref, RefMut, World};

use crate::error::EcsError;
use components::{
    Button, CalibrationOffset, DataKind, DataRecord, InstructionVisibility, Interactable,
    NeedsCalibration, ObjectRef, Rotating,
};

/// The entity store shared by every system
pub struct EcsWorld {
    /// hecs World - stores all entities and their records
    world: World,
}

impl EcsWorld {
    pub fn new() -> Self {
        Self { world: World::new() }
    }

    /// Allocate a fresh entity with no data attached
    pub fn create_entity(&mut self) -> Entity {
        self.world.spawn(())
    }

    /// Attach a record, replacing any prior record of the same kind
    pub fn attach<T: DataRecord>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        self.world
            .insert_one(entity, value)
            .map_err(|_| EcsError::NoSuchEntity(entity))
    }

    /// Remove a record; absent records and unknown entities are left alone
    pub fn detach<T: DataRecord>(&mut self, entity: Entity) {
        if self.has::<T>(entity) {
            let _ = self.world.remove_one::<T>(entity);
            let kind = T::KIND;
            tracing::debug!(?entity, %kind, "detached record");
        }
    }

    pub fn has<T: DataRecord>(&self, entity: Entity) -> bool {
        self.world
            .entity(entity)
            .map(|e| e.has::<T>())
            .unwrap_or(false)
    }

    pub fn get<T: DataRecord>(&self, entity: Entity) -> Result<Ref<'_, T>, EcsError> {
        self.world
            .get::<&T>(entity)
            .map_err(|err| component_error::<T>(entity, err))
    }

    pub fn get_mut<T: DataRecord>(&self, entity: Entity) -> Result<RefMut<'_, T>, EcsError> {
        self.world
            .get::<&mut T>(entity)
            .map_err(|err| component_error::<T>(entity, err))
    }

    /// Every entity holding all records named by `Q`, in creation order
    ///
    /// Entities are never despawned, so allocation ids grow monotonically
    /// and sorting by id reproduces creation order.
    pub fn query<Q: hecs::Query>(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .world
            .query::<Q>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        entities.sort_by_key(|entity| entity.id());
        entities
    }

    /// Kinds of data currently attached to an entity
    pub fn kinds(&self, entity: Entity) -> Vec<DataKind> {
        DataKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                DataKind::Transform3DRef => self.has::<ObjectRef>(entity),
                DataKind::Interactable => self.has::<Interactable>(entity),
                DataKind::Button => self.has::<Button>(entity),
                DataKind::Rotating => self.has::<Rotating>(entity),
                DataKind::InstructionVisibility => self.has::<InstructionVisibility>(entity),
                DataKind::CalibrationOffset => self.has::<CalibrationOffset>(entity),
                DataKind::NeedsCalibration => self.has::<NeedsCalibration>(entity),
            })
            .collect()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Get the number of entities
    pub fn entity_count(&self) -> u32 {
        self.world.len()
    }
}

impl Default for EcsWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn component_error<T: DataRecord>(entity: Entity, err: ComponentError) -> EcsError {
    match err {
        ComponentError::NoSuchEntity => EcsError::NoSuchEntity(entity),
        ComponentError::MissingComponent(_) => EcsError::NotFound {
            entity,
            kind: T::KIND,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_create_entity_has_no_data() {
        let mut world = EcsWorld::new();
        let entity = world.create_entity();

        assert!(world.contains(entity));
        assert!(world.kinds(entity).is_empty());
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_attach_replaces_prior_value() {
        let mut world = EcsWorld::new();
        let entity = world.create_entity();

        world.attach(entity, CalibrationOffset(Vec3::X)).unwrap();
        world.attach(entity, CalibrationOffset(Vec3::Y)).unwrap();

        assert_eq!(world.get::<CalibrationOffset>(entity).unwrap().0, Vec3::Y);
        assert_eq!(world.kinds(entity), vec![DataKind::CalibrationOffset]);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let mut world = EcsWorld::new();
        let entity = world.create_entity();

        let err = world.get::<Button>(entity).unwrap_err();
        assert_eq!(
            err,
            EcsError::NotFound {
                entity,
                kind: DataKind::Button
            }
        );
    }

    #[test]
    fn test_detach_absent_is_noop() {
        let mut world = EcsWorld::new();
        let entity = world.create_entity();
        world.attach(entity, Rotating).unwrap();

        world.detach::<NeedsCalibration>(entity);
        world.detach::<NeedsCalibration>(entity);

        assert_eq!(world.kinds(entity), vec![DataKind::Rotating]);
    }

    #[test]
    fn test_detach_removes_record() {
        let mut world = EcsWorld::new();
        let entity = world.create_entity();
        world.attach(entity, NeedsCalibration).unwrap();
        world.attach(entity, CalibrationOffset(Vec3::ZERO)).unwrap();

        world.detach::<NeedsCalibration>(entity);

        assert!(!world.has::<NeedsCalibration>(entity));
        assert!(world.has::<CalibrationOffset>(entity));
    }

    #[test]
    fn test_query_requires_all_kinds_in_creation_order() {
        let mut world = EcsWorld::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.create_entity();

        // Put c in a different archetype first so storage order differs from creation order
        world.attach(c, Interactable).unwrap();
        world.attach(c, Rotating).unwrap();
        world.attach(c, ObjectRef(crate::scene::ObjectHandle(2))).unwrap();
        world.attach(a, Interactable).unwrap();
        world.attach(a, ObjectRef(crate::scene::ObjectHandle(0))).unwrap();
        world.attach(b, Interactable).unwrap();

        let hits = world.query::<(&Interactable, &ObjectRef)>();
        assert_eq!(hits, vec![a, c]);
    }
}
