//! Entity construction helpers for the interaction scene
//!
//! Creates model parts, menu buttons, instruction panels and calibrated UI.

use anyhow::Result;
use glam::Vec3;
use hecs::Entity;

use crate::assets::{MeshPart, ModelLoader};
use crate::config::{EngineConfig, ModelEntry, ModelManifest};
use crate::ecs::components::*;
use crate::ecs::EcsWorld;
use crate::scene::{isolate_action, show_all_action, ObjectHandle, SharedScene, Transform};

/// Half extents of flat UI panels
const PANEL_HALF_EXTENTS: Vec3 = Vec3::new(0.12, 0.04, 0.01);

/// Entities created by `init_default_scene`
#[derive(Debug, Clone, Default)]
pub struct SceneEntities {
    pub models: Vec<Entity>,
    pub show_all_button: Option<Entity>,
    pub instruction_panel: Option<Entity>,
    pub marker: Option<Entity>,
}

/// Spawn an entity for an object the scene already owns
pub fn spawn_object_entity(world: &mut EcsWorld, object: ObjectHandle) -> Result<Entity> {
    let entity = world.create_entity();
    world.attach(entity, ObjectRef(object))?;
    Ok(entity)
}

/// Register one loaded part and make it an isolate-on-press button
pub fn spawn_model_part(
    world: &mut EcsWorld,
    scene: &SharedScene,
    entry: &ModelEntry,
    part: &MeshPart,
    dimmed_opacity: f32,
) -> Result<Entity> {
    let object = scene.lock().insert_object(
        part.name.clone(),
        part.center,
        part.half_extents,
        Transform::from_position_scale(entry.position, entry.scale),
    );

    let entity = spawn_object_entity(world, object)?;
    world.attach(entity, Interactable)?;
    world.attach(
        entity,
        Button::with_action(isolate_action(scene.clone(), object, dimmed_opacity)),
    )?;
    Ok(entity)
}

/// Load every manifest entry; failed entries are logged and skipped
pub fn load_models(
    world: &mut EcsWorld,
    scene: &SharedScene,
    loader: &dyn ModelLoader,
    manifest: &ModelManifest,
    dimmed_opacity: f32,
) -> Result<Vec<Entity>> {
    let mut entities = Vec::new();

    for entry in &manifest.entries {
        let parts = match loader.load(entry) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::error!(model = %entry.name, error = %format!("{err:#}"), "model failed to load");
                continue;
            }
        };

        for part in &parts {
            entities.push(spawn_model_part(world, scene, entry, part, dimmed_opacity)?);
        }
        tracing::info!(model = %entry.name, parts = parts.len(), "model loaded");
    }

    Ok(entities)
}

/// Menu button restoring every model, placed relative to the head on session start
pub fn spawn_show_all_button(world: &mut EcsWorld, scene: &SharedScene, offset: Vec3) -> Result<Entity> {
    let object = scene.lock().insert_object(
        "show_all_button".to_string(),
        Vec3::ZERO,
        PANEL_HALF_EXTENTS,
        Transform::identity(),
    );

    let entity = spawn_object_entity(world, object)?;
    world.attach(entity, Interactable)?;
    world.attach(entity, Button::with_action(show_all_action(scene.clone())))?;
    make_calibrated(world, entity, offset)?;
    Ok(entity)
}

/// Hint text shown only while a hand is tracked
pub fn spawn_instruction_panel(world: &mut EcsWorld, scene: &SharedScene, position: Vec3) -> Result<Entity> {
    let object = scene.lock().insert_object(
        "instructions".to_string(),
        Vec3::ZERO,
        PANEL_HALF_EXTENTS,
        Transform::from_position_scale(position, 1.0),
    );

    let entity = spawn_object_entity(world, object)?;
    world.attach(entity, InstructionVisibility)?;
    Ok(entity)
}

/// Idle-spinning marker object
pub fn spawn_rotating_marker(world: &mut EcsWorld, scene: &SharedScene, position: Vec3, size: f32) -> Result<Entity> {
    let object = scene.lock().insert_object(
        "marker".to_string(),
        Vec3::ZERO,
        Vec3::splat(size * 0.5),
        Transform::from_position_scale(position, 1.0),
    );

    let entity = spawn_object_entity(world, object)?;
    world.attach(entity, Rotating)?;
    Ok(entity)
}

/// Queue an entity for one-shot placement at `head + offset`
pub fn make_calibrated(world: &mut EcsWorld, entity: Entity, offset: Vec3) -> Result<()> {
    world.attach(entity, CalibrationOffset(offset))?;
    world.attach(entity, NeedsCalibration)?;
    Ok(())
}

/// Populate a fresh session: models, menu, hint panel and marker
pub fn init_default_scene(
    world: &mut EcsWorld,
    scene: &SharedScene,
    loader: &dyn ModelLoader,
    config: &EngineConfig,
) -> Result<SceneEntities> {
    let interaction = &config.interaction;
    let models = load_models(world, scene, loader, &config.models, interaction.dimmed_opacity)?;

    let show_all_button = spawn_show_all_button(world, scene, Vec3::new(0.3, -0.25, -0.6))?;
    let instruction_panel = spawn_instruction_panel(world, scene, Vec3::new(0.0, 1.5, -1.0))?;
    let marker = spawn_rotating_marker(world, scene, Vec3::new(0.45, 1.0, -1.0), 0.05)?;

    tracing::info!(
        models = models.len(),
        entities = world.entity_count(),
        "scene initialized"
    );

    Ok(SceneEntities {
        models,
        show_all_button: Some(show_all_button),
        instruction_panel: Some(instruction_panel),
        marker: Some(marker),
    })
}
