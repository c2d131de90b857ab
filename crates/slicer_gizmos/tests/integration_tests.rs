//! Integration tests for slicer_gizmos
//!
//! Drives complete hover/drag/release sessions through the public API.

use approx::assert_relative_eq;
use glam::{DQuat, DVec2, DVec3};
use slicer_gizmos::prelude::*;
use slicer_gizmos::scene::VolumeOffsets;

fn cube(id: u32, half: f64) -> SelectedVolume {
    SelectedVolume::new(
        VolumeId(id),
        BoundingBox::from_center_half_extents(DVec3::ZERO, DVec3::splat(half)),
    )
}

/// Screen pixel above a world point for the default top-down camera.
fn pixel(x: f64, y: f64) -> DVec2 {
    DVec2::new(640.0 + x, 360.0 - y)
}

#[test]
fn test_projection_reference_scenario() {
    let state = DragAxisState::begin(DragAxis::X, DVec3::new(10.0, 0.0, 0.0), DVec3::ZERO);

    let at_anchor = MouseRay::new(DVec3::new(10.0, 0.0, -5.0), DVec3::Z);
    assert_relative_eq!(compute_projection(&at_anchor, &state, 1.0, false), 0.0);

    let moved = MouseRay::new(DVec3::new(15.0, 0.0, -5.0), DVec3::Z);
    assert_relative_eq!(compute_projection(&moved, &state, 1.0, false), 5.0);

    let off_grid = MouseRay::new(DVec3::new(16.2, 3.0, -5.0), DVec3::Z);
    let snapped = compute_projection(&off_grid, &state, 0.5, true);
    assert_relative_eq!(snapped, 6.0);
}

#[test]
fn test_drag_session_with_undo_redo() {
    let camera = Camera::default();
    let prefs = GizmoPreferences::default();
    let ctx = GizmoContext::new(&camera, &prefs);
    let mut selection = Selection::with_volumes(SelectionMode::Instance, [cube(1, 5.0)]);
    let mut manager = GizmoManager::new();
    manager.open(GizmoKind::Move, &selection).unwrap();

    let ray = |x, y| camera.mouse_ray(pixel(x, y));

    // X grabber at (15, 0, 0)
    manager.on_mouse(MouseEvent::Move { ray: ray(15.0, 0.0) }, &mut selection, &ctx);
    assert_eq!(manager.state(), WidgetState::Hovering(DragAxis::X));
    assert_eq!(manager.tooltip(&selection), "X: 0.00");

    manager.on_mouse(MouseEvent::Press { ray: ray(15.0, 0.0) }, &mut selection, &ctx);
    assert_eq!(manager.state(), WidgetState::Dragging(DragAxis::X));
    assert!(selection.is_dragging());

    // Intermediate samples replace each other rather than accumulate
    for x in [17.0, 21.0, 19.5] {
        let drag = MouseEvent::Drag { ray: ray(x, 8.0), shift: false };
        assert!(manager.on_mouse(drag, &mut selection, &ctx));
    }
    assert_relative_eq!(selection.volumes()[0].instance.offset.x, 4.5, epsilon = 1e-6);
    assert_relative_eq!(selection.volumes()[0].instance.offset.y, 0.0, epsilon = 1e-9);

    manager.on_mouse(MouseEvent::Release, &mut selection, &ctx);
    assert_eq!(manager.state(), WidgetState::Idle);
    assert!(!selection.is_dragging());
    assert_eq!(manager.history().undo_count(), 1);

    manager.undo(&mut selection).unwrap();
    assert_eq!(selection.volumes()[0].instance.offset, DVec3::ZERO);
    assert!(manager.history().can_redo());

    manager.redo(&mut selection).unwrap();
    assert_relative_eq!(selection.volumes()[0].instance.offset.x, 4.5, epsilon = 1e-6);
}

#[test]
fn test_volume_mode_drag_moves_volume_in_instance_space() {
    let camera = Camera::default();
    let prefs = GizmoPreferences::default();
    let ctx = GizmoContext::new(&camera, &prefs);

    let mut part = cube(3, 5.0);
    part.instance = Transformation::from_offset(DVec3::new(0.0, 0.0, 0.0))
        .with_rotation(DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2));
    let mut selection = Selection::with_volumes(SelectionMode::Volume, [part]);
    let mut manager = GizmoManager::new();
    manager.open(GizmoKind::Move, &selection).unwrap();

    let ray = |x, y| camera.mouse_ray(pixel(x, y));
    assert!(manager.on_mouse(MouseEvent::Press { ray: ray(15.0, 0.0) }, &mut selection, &ctx));
    manager.on_mouse(MouseEvent::Drag { ray: ray(19.0, 0.0), shift: false }, &mut selection, &ctx);
    manager.on_mouse(MouseEvent::Release, &mut selection, &ctx);

    let v = &selection.volumes()[0];
    // World +X is instance -Y after a quarter turn about Z
    assert!(v.volume.offset.abs_diff_eq(DVec3::new(0.0, -4.0, 0.0), 1e-6));
    assert_eq!(v.instance.offset, DVec3::ZERO);
    assert!(v.world_box().center().abs_diff_eq(DVec3::new(4.0, 0.0, 0.0), 1e-6));
}

#[test]
fn test_perspective_drag_is_close_to_cursor() {
    let camera = Camera {
        projection: Projection::Perspective { fov_y: 0.8 },
        ..Camera::default()
    };
    let prefs = GizmoPreferences::default();
    let ctx = GizmoContext::new(&camera, &prefs);
    let mut selection = Selection::with_volumes(SelectionMode::Instance, [cube(1, 5.0)]);
    let mut manager = GizmoManager::new();
    manager.open(GizmoKind::Move, &selection).unwrap();

    let grabber = camera.project(DVec3::new(15.0, 0.0, 0.0)).unwrap();
    let target = camera.project(DVec3::new(20.0, 0.0, 0.0)).unwrap();

    assert!(manager.on_mouse(MouseEvent::Press { ray: camera.mouse_ray(grabber) }, &mut selection, &ctx));
    manager.on_mouse(
        MouseEvent::Drag { ray: camera.mouse_ray(target), shift: false },
        &mut selection,
        &ctx,
    );

    // View-plane approximation undershoots slightly under perspective
    let moved = selection.volumes()[0].instance.offset.x;
    assert!(moved > 4.5 && moved < 5.0, "moved {moved}");
}

#[test]
fn test_wipe_tower_has_no_z_handle() {
    let camera = Camera::default();
    let prefs = GizmoPreferences::default();
    let ctx = GizmoContext::new(&camera, &prefs);

    let mut tower = cube(9, 5.0);
    tower.kind = VolumeKind::WipeTower;
    let mut selection = Selection::with_volumes(SelectionMode::Instance, [tower]);
    let mut manager = GizmoManager::new();
    manager.open(GizmoKind::Move, &selection).unwrap();

    // Straight down through the Z grabber
    let ray = camera.mouse_ray(pixel(0.0, 0.0));
    assert!(!manager.on_mouse(MouseEvent::Press { ray }, &mut selection, &ctx));
    assert_eq!(manager.state(), WidgetState::Idle);

    let list = manager.render(&selection, &ctx).unwrap();
    assert_eq!(list.grabbers().count(), 2);
}

#[test]
fn test_undo_fails_after_volume_removed() {
    let before = vec![VolumeOffsets {
        id: VolumeId(42),
        instance: DVec3::ZERO,
        volume: DVec3::ZERO,
    }];
    let after = vec![VolumeOffsets {
        id: VolumeId(42),
        instance: DVec3::X,
        volume: DVec3::ZERO,
    }];
    let mut history = UndoHistory::new();
    history.push(Box::new(TranslateCommand::new("Gizmo-Move", before, after)));

    let mut selection = Selection::with_volumes(SelectionMode::Instance, [cube(1, 1.0)]);
    let err = history.undo(&mut selection).unwrap_err();
    assert!(matches!(err, GizmoError::VolumeNotFound(VolumeId(42))));
    assert_eq!(history.undo_count(), 1);
}

#[test]
fn test_scenario_replay_in_instance_frame() {
    let scenario = Scenario::from_toml(
        r#"
[preferences]
coordinates = "instance"

[selection]
mode = "instance"

[[selection.volumes]]
id = 1
object_idx = 0
instance_idx = 0
instance = { rotation = [0.0, 0.0, 0.7071067811865476, 0.7071067811865476] }
mesh_box = { min = [-5.0, -5.0, -5.0], max = [5.0, 5.0, 5.0] }

[[events]]
kind = "move"
screen = [640.0, 345.0]

[[events]]
kind = "press"
screen = [640.0, 345.0]

[[events]]
kind = "drag"
screen = [642.0, 341.0]

[[events]]
kind = "release"

[[events]]
kind = "undo"

[[events]]
kind = "redo"

[[events]]
kind = "coordinates"
coordinates = "world"
"#,
    )
    .unwrap();

    let replay = Replay::run(&scenario).unwrap();
    // Local X of the rotated instance points along world Y
    let offset = replay.selection().volumes()[0].instance.offset;
    assert!(offset.abs_diff_eq(DVec3::new(0.0, 4.0, 0.0), 1e-6), "offset {offset:?}");
    assert_eq!(replay.manager().history().undo_description(), Some("Gizmo-Move"));
    assert!(!replay.manager().history().can_redo());
    assert_eq!(replay.manager().state(), WidgetState::Idle);
    assert_eq!(replay.tooltip(), "");
}

#[test]
fn test_local_frame_matches_grabber_axes() {
    let mut part = cube(1, 2.0);
    part.instance = part.instance.with_rotation(DQuat::from_rotation_y(0.4));
    part.volume = part.volume.with_rotation(DQuat::from_rotation_x(1.1));
    let selection = Selection::with_volumes(SelectionMode::Volume, [part]);

    let frame = resolve_local_frame(&selection, false, true);
    let expected = DQuat::from_rotation_y(0.4) * DQuat::from_rotation_x(1.1);
    for axis in [DVec3::X, DVec3::Y, DVec3::Z] {
        assert!(frame.transform_vector3(axis).abs_diff_eq(expected * axis, 1e-9));
    }
}
