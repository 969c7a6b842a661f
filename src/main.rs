use std::sync::Arc;

use anyhow::Result;
use glam::Vec3;
use organelle_xr::assets::ObjLoader;
use organelle_xr::ecs::components::{Button, ObjectRef};
use organelle_xr::ecs::init::init_default_scene;
use organelle_xr::scene::{Renderables, Scene, SharedScene};
use organelle_xr::xr::{HandPointer, SharedHeadPose, SharedPointer, XrSession};
use organelle_xr::{EcsWorld, EngineConfig, InteractionApp};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config/organelle_xr.json";
const FRAME_DELTA: f32 = 1.0 / 72.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = EngineConfig::load_or_default(&config_path);
    tracing::info!(config = %config_path, "=== organelle-xr starting ===");

    let scene = Scene::new().into_shared();
    let shared_scene: SharedScene = scene.clone();
    let loader = ObjLoader::new(&config.models.asset_root);

    let mut world = EcsWorld::new();
    let entities = init_default_scene(&mut world, &shared_scene, &loader, &config)?;

    let left = HandPointer::new(shared_scene.clone()).into_shared();
    let right = HandPointer::new(shared_scene.clone()).into_shared();
    let session = XrSession::new().into_shared();

    let pointers: Vec<SharedPointer> = [left.clone(), right]
        .into_iter()
        .map(|pointer| pointer as SharedPointer)
        .collect();
    let head: SharedHeadPose = session.clone();

    let mut app = InteractionApp::builder()
        .config(config.interaction.clone())
        .world(world)
        .scene(shared_scene)
        .pointers(pointers)
        .head_pose(head)
        .build()?;

    // Scripted headless session: idle, enter XR, point at a model, pinch, release
    let target = entities
        .models
        .first()
        .map(|&entity| app.world().get::<ObjectRef>(entity).map(|r| r.0))
        .transpose()?;

    for frame in 0..12u32 {
        match frame {
            3 => {
                session.lock().start(config.camera.position);
                left.lock().visible = true;
            }
            5 => {
                if let Some(object) = target {
                    let center = scene
                        .lock()
                        .get_object(object)
                        .map(|obj| obj.world_center())
                        .unwrap_or(Vec3::NEG_Z);
                    let origin = config.camera.position;
                    left.lock().aim(origin, center - origin);
                }
            }
            7 => left.lock().pinched = true,
            8 => left.lock().pinched = false,
            _ => {}
        }

        app.frame(FRAME_DELTA)?;

        let cursor = left.lock().cursor_distance();
        tracing::debug!(frame, cursor, "frame complete");
    }

    report(&app, &scene, target.is_some());
    Ok(())
}

fn report(app: &InteractionApp, scene: &Arc<parking_lot::Mutex<Scene>>, had_target: bool) {
    let world = app.world();
    let buttons = world.query::<&Button>().len();
    let scene = scene.lock();
    let dimmed = scene
        .handles()
        .into_iter()
        .filter(|&handle| scene.opacity(handle).is_some_and(|o| o < 1.0))
        .count();

    tracing::info!(
        frames = app.clock().frames(),
        elapsed = app.clock().elapsed(),
        entities = world.entity_count(),
        buttons,
        dimmed,
        had_target,
        "=== session complete ==="
    );
}
