// Chamber pool: masses loaded onto the left opening push the right surface up

use fluid_pressure_flow::scenes::{ChamberConfig, ChamberPoolScene, MassState};
use fluid_pressure_flow::FluidSettings;

fn scene() -> ChamberPoolScene {
    ChamberPoolScene::new(&ChamberConfig::default(), FluidSettings::default()).unwrap()
}

fn drop_onto_opening(scene: &mut ChamberPoolScene, index: usize, height: f64) {
    let x = scene.geometry().left_opening.centre_x();
    scene.grab_mass(index).unwrap();
    scene.drag_mass_to(index, x, height).unwrap();
    scene.release_mass(index).unwrap();
}

#[test]
fn test_pick_mass_from_ground() {
    let scene = scene();
    let first = scene.masses()[0];
    assert_eq!(scene.mass_at(first.position.x, first.position.y), Some(0));
    assert_eq!(scene.mass_at(-5.0, 0.1), None);
}

#[test]
fn test_drag_cannot_push_into_ground() {
    let mut scene = scene();
    scene.grab_mass(1).unwrap();
    scene.drag_mass_to(1, 0.5, -3.0).unwrap();
    assert!((scene.masses()[1].bottom()).abs() < 1e-12);

    // Masses not being dragged ignore drag requests
    let before = scene.masses()[2];
    scene.drag_mass_to(2, 0.5, 3.0).unwrap();
    assert_eq!(scene.masses()[2], before);
}

#[test]
fn test_two_drops_build_a_stack() {
    let mut scene = scene();
    drop_onto_opening(&mut scene, 1, 1.0);
    drop_onto_opening(&mut scene, 2, 3.0);
    for _ in 0..180 {
        scene.step(1.0 / 60.0);
    }

    assert_eq!(scene.stack(), &[1, 2]);
    assert_eq!(scene.stack_mass(), 500.0);
    assert_eq!(scene.reconcile_stack_mass(), 500.0);
    let lower = scene.masses()[1];
    let upper = scene.masses()[2];
    assert_eq!(upper.state, MassState::Stacked);
    assert!((upper.bottom() - lower.top()).abs() < 1e-9);
    assert!((lower.bottom() - scene.left_surface_y()).abs() < 1e-9);
    // Stacked blocks move together
    assert_eq!(lower.velocity, upper.velocity);
}

#[test]
fn test_stack_mass_tracks_add_and_remove() {
    let mut scene = scene();
    for i in 0..3 {
        scene.add_to_stack(i).unwrap();
    }
    scene.remove_from_stack(1).unwrap();
    scene.remove_from_stack(1).unwrap();
    assert_eq!(scene.stack(), &[0, 2]);
    assert_eq!(scene.stack_mass(), 750.0);
    assert_eq!(scene.reconcile_stack_mass(), 750.0);
    assert!(scene.remove_from_stack(3).is_err());
}

#[test]
fn test_jitter_spike_is_ignored() {
    let mut steady = scene();
    let mut spiky = scene();
    steady.add_to_stack(0).unwrap();
    spiky.add_to_stack(0).unwrap();

    for frame in 0..20 {
        steady.step(1.0 / 60.0);
        spiky.step(if frame == 7 { 0.5 } else { 1.0 / 60.0 });
    }
    assert_eq!(steady.left_displacement(), spiky.left_displacement());
    assert_eq!(steady.masses(), spiky.masses());
}

#[test]
fn test_pressure_is_shared_across_chambers() {
    let mut scene = scene();
    let left = (3.0, -2.0);
    let right = (6.8, -2.0);
    let unloaded = scene.pressure_at(left.0, left.1);
    assert!((scene.pressure_at(right.0, right.1) - unloaded).abs() < 1e-6);

    scene.add_to_stack(0).unwrap();
    for _ in 0..300 {
        scene.step(1.0 / 60.0);
    }
    let loaded_left = scene.pressure_at(left.0, left.1);
    let loaded_right = scene.pressure_at(right.0, right.1);
    assert!(loaded_left > unloaded);
    assert!((loaded_left - loaded_right).abs() < 1e-6);

    // Above the pushed-down left surface there is only the load
    let x = scene.geometry().left_opening.centre_x();
    let above = scene.left_surface_y() + 0.05;
    assert_eq!(scene.water_height_above(x, above), 0.0);
}

#[test]
fn test_paused_scene_does_not_move() {
    let mut scene = scene();
    drop_onto_opening(&mut scene, 0, 2.0);
    scene.set_playing(false);
    let before = scene.masses()[0];
    for _ in 0..30 {
        scene.step(1.0 / 60.0);
    }
    assert_eq!(scene.masses()[0], before);
}

#[test]
fn test_reset_returns_masses_to_ground() {
    let mut scene = scene();
    let initial = scene.masses().to_vec();
    drop_onto_opening(&mut scene, 0, 1.0);
    scene.fluid.set_gravity(1.6);
    for _ in 0..120 {
        scene.step(1.0 / 60.0);
    }
    assert!(!scene.stack().is_empty());

    scene.reset();
    assert_eq!(scene.masses(), initial.as_slice());
    assert_eq!(scene.left_displacement(), 0.0);
    assert_eq!(scene.fluid.gravity_value(), 9.8);
}
