/// Tests to verify pointer rays hit objects where the scene places them
/// This ensures the cursor lands on the posed, scaled geometry

use std::sync::Arc;

use glam::Vec3;
use organelle_xr::scene::{ObjectHandle, Renderables, Scene, Transform};
use organelle_xr::xr::{HandPointer, Pointer};
use parking_lot::Mutex;

fn posed_scene(transform: Transform, center: Vec3) -> (Arc<Mutex<Scene>>, ObjectHandle) {
    let mut scene = Scene::new();
    let handle = scene.add_object_with_bounds("part".to_string(), center, Vec3::splat(0.5), transform);
    (scene.into_shared(), handle)
}

#[test]
fn test_aiming_at_world_center_always_hits() {
    let rotations = [
        Vec3::ZERO,
        Vec3::new(0.4, 0.4, 0.0),
        Vec3::new(1.2, -0.7, 0.3),
        Vec3::new(3.0, 2.0, 1.0),
    ];
    let origin = Vec3::new(0.0, 1.2, 0.3);

    for rotation in rotations {
        let transform = Transform {
            position: Vec3::new(0.1, -1.1, -1.0),
            rotation,
            scale: Vec3::splat(0.24),
        };
        let (scene, handle) = posed_scene(transform, Vec3::new(0.2, -0.1, 0.05));
        let world_center = scene.lock().get_object(handle).unwrap().world_center();

        let mut pointer = HandPointer::new(scene.clone());
        pointer.aim(origin, world_center - origin);
        let hits = pointer.intersect(handle);

        assert_eq!(hits.len(), 1, "rotation {rotation:?} missed");
        let hit = hits[0];
        assert!(hit.distance < (world_center - origin).length());

        pointer.set_cursor_distance(hit.distance);
        assert!((pointer.cursor_position() - hit.point).length() < 1e-4);
    }
}

#[test]
fn test_quarter_turn_keeps_cube_depth() {
    let transform = Transform::from_position_scale(Vec3::new(0.0, 0.0, -2.0), 1.0);
    let (scene, handle) = posed_scene(transform, Vec3::ZERO);

    let before = scene.lock().cast_ray(handle, Vec3::ZERO, Vec3::NEG_Z)[0];
    assert!((before.distance - 1.5).abs() < 1e-4);

    scene
        .lock()
        .set_rotation(handle, Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
    let after = scene.lock().cast_ray(handle, Vec3::ZERO, Vec3::NEG_Z)[0];
    assert!((after.distance - 1.5).abs() < 1e-4);
}
