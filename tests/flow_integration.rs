// Pipe flow: particles riding the continuity-law velocity through a reshaped pipe

use fluid_pressure_flow::particles::{FlowParticle, ParticleAdvector};
use fluid_pressure_flow::pipe::{PipeConfig, PipeGeometry, PipeSide};
use fluid_pressure_flow::scenes::{FlowConfig, FlowScene};
use fluid_pressure_flow::time::{ClockConfig, SimSpeed, SimulationClock};
use fluid_pressure_flow::FluidSettings;

fn uniform_pipe() -> PipeGeometry {
    // x in [0, 10], width 1.0, 2000 L/s gives 2 m/s
    PipeGeometry::new(&PipeConfig::straight(0.0, 10.0, -3.0, 1.0, 6, 2000.0)).unwrap()
}

#[test]
fn test_particle_leaves_pipe_exactly_once() {
    let pipe = uniform_pipe();
    let advector = ParticleAdvector::new();
    let mut clock = SimulationClock::new(ClockConfig::new(5.0, 0.2)).unwrap();
    let mut particles = vec![FlowParticle::flow(pipe.min_x(), 0.5)];
    let mut removed = 0;

    // Transit time is 5 s; one extra quantum covers rounding at the outlet
    for frame_dt in [5.0, 0.2] {
        clock.run(frame_dt, |tick| {
            removed += advector.propagate(&pipe, &mut particles, tick.dt);
            assert!(particles.iter().all(|p| p.x < pipe.max_x()));
        });
    }

    assert_eq!(removed, 1);
    assert!(particles.is_empty());
    assert_eq!(clock.total_ticks(), 26);
}

#[test]
fn test_zero_dt_leaves_particles_in_place() {
    let pipe = uniform_pipe();
    let advector = ParticleAdvector::new();
    let mut particles: Vec<FlowParticle> = (0..5).map(|i| FlowParticle::flow(i as f64, 0.3)).collect();
    let before = particles.clone();
    assert_eq!(advector.propagate(&pipe, &mut particles, 0.0), 0);
    assert_eq!(particles, before);
}

#[test]
fn test_constriction_speeds_particles_up() {
    let mut scene = FlowScene::new(&FlowConfig::default(), FluidSettings::default(), 11).unwrap();
    let wide = scene.pipe().speed(0.0);
    scene.pipe_mut().set_control_point_y(PipeSide::Top, 3, -2.0).unwrap();
    scene.pipe_mut().set_control_point_y(PipeSide::Bottom, 3, -2.5).unwrap();
    assert!(scene.pipe().is_dirty());

    let narrow = scene.pipe().speed(0.0);
    assert!((narrow / wide - 4.0).abs() < 1e-9);
    assert!(!scene.pipe().is_dirty());

    // Pressure drops where the fluid speeds up
    let inlet_pressure = scene.pressure_at(-5.9, -2.25);
    let throat_pressure = scene.pressure_at(0.0, -2.25);
    assert!(throat_pressure < inlet_pressure);
}

#[test]
fn test_slow_motion_scales_travel() {
    let mut normal = FlowScene::new(&FlowConfig::default(), FluidSettings::default(), 5).unwrap();
    let mut slow = FlowScene::new(&FlowConfig::default(), FluidSettings::default(), 5).unwrap();
    slow.set_speed(SimSpeed::Slow);
    assert!(normal.inject_grid());
    assert!(slow.inject_grid());

    for _ in 0..10 {
        normal.step(0.04);
        slow.step(0.04);
    }
    let start = normal.pipe().min_x();
    let moved_normal = normal.grid_particles()[0].x - start;
    let moved_slow = slow.grid_particles()[0].x - start;
    assert!((moved_slow / moved_normal - 0.33).abs() < 1e-6);
}

#[test]
fn test_grid_injector_cooldown_in_sim_time() {
    let mut scene = FlowScene::new(&FlowConfig::default(), FluidSettings::default(), 2).unwrap();
    assert!(scene.inject_grid());
    // 4.8 s of simulated time is not enough
    for _ in 0..120 {
        scene.step(0.04);
    }
    assert!(!scene.inject_grid());
    for _ in 0..10 {
        scene.step(0.04);
    }
    assert!(scene.inject_grid());
}

#[test]
fn test_reset_restores_scene() {
    let mut scene = FlowScene::new(&FlowConfig::default(), FluidSettings::default(), 4).unwrap();
    let outline = scene.sample_outline(25);
    scene.pipe_mut().set_control_point_y(PipeSide::Bottom, 2, -1.5).unwrap();
    scene.fluid.set_density(1420.0);
    scene.inject_grid();
    for _ in 0..50 {
        scene.step(0.04);
    }
    assert!(!scene.flow_particles().is_empty());

    scene.reset();
    assert!(scene.flow_particles().is_empty());
    assert!(scene.grid_particles().is_empty());
    assert_eq!(scene.fluid.density_value(), 1000.0);
    assert_eq!(scene.sample_outline(25), outline);
}
