//! Headless simulation runner
//!
//! Usage: fluid-pressure-flow [config.toml]
//!
//! Builds every scene, drives them at a fixed frame rate for the configured
//! duration and logs a summary of each.

use anyhow::{Context, Result};
use fluid_pressure_flow::pipe::PipeSide;
use fluid_pressure_flow::scenes::FaucetMode;
use fluid_pressure_flow::{Simulation, SimulationConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => {
            log::info!("No config given, using defaults");
            SimulationConfig::default()
        }
    };

    let mut sim = Simulation::new(&config).context("failed to build scenes")?;
    set_up_scenario(&mut sim)?;

    let frame_dt = config.run.frame_dt;
    let frames = (config.run.duration / frame_dt).ceil() as u64;
    log::info!("Running {} frames of {:.4} s", frames, frame_dt);

    for frame in 0..frames {
        sim.step(frame_dt);
        if frame == frames / 2 {
            // Second half: the pipe narrows in the middle and the grid fires
            let centre = sim.flow.pipe().pair_count() / 2;
            sim.flow.pipe_mut().set_control_point_y(PipeSide::Top, centre, -2.0)?;
            sim.flow.inject_grid();
        }
    }

    log_summary(&sim);
    Ok(())
}

/// Open valves and load masses so every scene has something to do
fn set_up_scenario(sim: &mut Simulation) -> Result<()> {
    sim.tower.set_sluice_open(true);
    sim.tower.set_faucet_mode(FaucetMode::MatchLeakage);

    let opening_x = sim.chamber.geometry().left_opening.centre_x();
    sim.chamber.grab_mass(0)?;
    sim.chamber.drag_mass_to(0, opening_x, 1.0)?;
    sim.chamber.release_mass(0)?;

    sim.square_pool.set_fill_flow_rate(0.1);
    sim.mystery_pool.enter();
    sim.mystery_pool.pool_mut().set_drain_flow_rate(0.05);
    Ok(())
}

fn log_summary(sim: &Simulation) {
    let pipe = sim.flow.pipe();
    log::info!(
        "Flow: {} flow / {} grid particles, inlet {:.2} m/s, centre {:.2} m/s, flux {:.2} m/s",
        sim.flow.flow_particles().len(),
        sim.flow.grid_particles().len(),
        pipe.inlet_speed(),
        pipe.speed((pipe.min_x() + pipe.max_x()) / 2.0),
        sim.flow.flux()
    );
    log::info!(
        "Flow: pressure at pipe centre {:.0} Pa",
        sim.flow.pressure_at(0.0, -2.5)
    );

    let tank = sim.tower.tank();
    log::info!(
        "Tower: level {:.3} m of {:.3} m, {} drops in flight, efflux {:.2} m/s",
        tank.fluid_level(),
        tank.height(),
        sim.tower.faucet_drops().len() + sim.tower.tower_drops().len() + sim.tower.hose_drops().len(),
        sim.tower.efflux_speed()
    );
    log::info!(
        "Tower: pressure at tank floor {:.0} Pa",
        sim.tower.pressure_at(tank.position().x + tank.radius(), tank.position().y + 0.01)
    );

    log::info!(
        "Chamber: stack {} kg, left displacement {:.3} m, right surface {:.3} m",
        sim.chamber.stack_mass(),
        sim.chamber.left_displacement(),
        sim.chamber.right_surface_y()
    );

    log::info!(
        "Square pool: level {:.3} m, floor pressure {:.0} Pa",
        sim.square_pool.fluid_level(),
        sim.square_pool.pressure_at(4.5, -2.99)
    );
    log::info!(
        "Mystery pool: level {:.3} m, floor pressure {:.0} Pa",
        sim.mystery_pool.pool().fluid_level(),
        sim.mystery_pool.pressure_at(4.5, -2.99)
    );
}
