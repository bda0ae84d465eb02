use std::f64::consts::PI;

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::tower::{
    DROP_VOLUME, FAUCET_JITTER, FAUCET_POSITION, HOLE_SIZE, HOSE_ANGLE_DEGREES, HOSE_POSITION,
    MAX_FAUCET_FLOW_RATE, MAX_FRAME_DT, MAX_TANK_ELEVATION, MIN_TANK_ELEVATION, QUANTUM,
    SLUICE_JITTER, TANK_HEIGHT, TANK_POSITION, TANK_RADIUS,
};
use crate::drops::{AbsorptionVolume, DropKinematics, WaterDrop};
use crate::error::{invalid_config, require_positive, SimResult};
use crate::fluid::{submerged_pressure, FluidSettings, FluidState, PressureField};
use crate::scenes::Faucet;
use crate::time::{ClockConfig, SimulationClock};

/// Water tower screen settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Lower-left corner of the tank (m)
    pub tank_position: [f64; 2],
    pub tank_radius: f64,
    pub tank_height: f64,
    /// Initial fill as a fraction of capacity
    pub initial_fill: f64,
    pub faucet_position: [f64; 2],
    /// m³/s
    pub max_faucet_flow_rate: f64,
    pub hose_position: [f64; 2],
    pub hose_angle_degrees: f64,
    /// Volume of each sluice or hose drop (m³)
    pub drop_volume: f64,
    pub quantum: f64,
    pub max_frame_dt: f64,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            tank_position: TANK_POSITION,
            tank_radius: TANK_RADIUS,
            tank_height: TANK_HEIGHT,
            initial_fill: 1.0,
            faucet_position: FAUCET_POSITION,
            max_faucet_flow_rate: MAX_FAUCET_FLOW_RATE,
            hose_position: HOSE_POSITION,
            hose_angle_degrees: HOSE_ANGLE_DEGREES,
            drop_volume: DROP_VOLUME,
            quantum: QUANTUM,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl TowerConfig {
    pub fn validate(&self) -> SimResult<()> {
        require_positive("tower.tank_radius", self.tank_radius)?;
        require_positive("tower.tank_height", self.tank_height)?;
        require_positive("tower.max_faucet_flow_rate", self.max_faucet_flow_rate)?;
        require_positive("tower.drop_volume", self.drop_volume)?;
        if !(0.0..=1.0).contains(&self.initial_fill) {
            return Err(invalid_config("tower.initial_fill", "must lie in [0, 1]"));
        }
        if !(MIN_TANK_ELEVATION..=MAX_TANK_ELEVATION).contains(&self.tank_position[1]) {
            return Err(invalid_config(
                "tower.tank_position",
                format!("elevation {} outside range", self.tank_position[1]),
            ));
        }
        let points = [self.tank_position, self.faucet_position, self.hose_position];
        if points.iter().flatten().any(|v| !v.is_finite()) || !self.hose_angle_degrees.is_finite() {
            return Err(invalid_config("tower", "positions and angles must be finite"));
        }
        ClockConfig::new(self.max_frame_dt, self.quantum).validate()
    }
}

/// Cylindrical tank on legs
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    /// Lower-left corner
    position: DVec2,
    radius: f64,
    height: f64,
    fluid_volume: f64,
    initial_position: DVec2,
    initial_volume: f64,
}

impl Tank {
    pub fn new(position: DVec2, radius: f64, height: f64, fill: f64) -> Self {
        let mut tank = Self {
            position,
            radius,
            height,
            fluid_volume: 0.0,
            initial_position: position,
            initial_volume: 0.0,
        };
        tank.fluid_volume = tank.capacity() * fill.clamp(0.0, 1.0);
        tank.initial_volume = tank.fluid_volume;
        tank
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn base_area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    pub fn capacity(&self) -> f64 {
        self.base_area() * self.height
    }

    pub fn fluid_volume(&self) -> f64 {
        self.fluid_volume
    }

    /// Height of fluid above the tank floor (m)
    pub fn fluid_level(&self) -> f64 {
        self.fluid_volume / self.base_area()
    }

    /// World height of the free surface
    pub fn surface_y(&self) -> f64 {
        self.position.y + self.fluid_level()
    }

    pub fn is_full(&self) -> bool {
        self.fluid_volume >= self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.fluid_volume <= 0.0
    }

    pub fn set_fluid_volume(&mut self, volume: f64) {
        if volume.is_finite() {
            self.fluid_volume = volume.clamp(0.0, self.capacity());
        }
    }

    /// Take up to `volume` out; returns what was actually removed
    pub fn drain(&mut self, volume: f64) -> f64 {
        let removed = volume.clamp(0.0, self.fluid_volume);
        self.fluid_volume -= removed;
        removed
    }

    pub fn fill(&mut self) {
        self.fluid_volume = self.capacity();
    }

    /// Move the tank vertically within the leg range
    pub fn set_elevation(&mut self, y: f64) -> f64 {
        if y.is_finite() {
            self.position.y = y.clamp(MIN_TANK_ELEVATION, MAX_TANK_ELEVATION);
        }
        self.position.y
    }

    /// Whether `(x, y)` lies in the fluid inside the tank
    pub fn contains_fluid(&self, x: f64, y: f64) -> bool {
        x > self.position.x
            && x < self.position.x + 2.0 * self.radius
            && y > self.position.y
            && y < self.surface_y()
    }

    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.fluid_volume = self.initial_volume;
    }
}

impl AbsorptionVolume for Tank {
    fn contains(&self, position: DVec2, radius: f64) -> bool {
        position.x >= self.position.x
            && position.x <= self.position.x + 2.0 * self.radius
            && position.y < self.surface_y() + radius
    }

    fn absorb(&mut self, volume: f64) {
        self.set_fluid_volume(self.fluid_volume + volume);
    }
}

/// Hose attached to the sluice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hose {
    pub nozzle: DVec2,
    pub angle_degrees: f64,
    pub visible: bool,
}

impl Hose {
    /// Unit vector out of the nozzle
    pub fn direction(&self) -> DVec2 {
        DVec2::from_angle(self.angle_degrees.to_radians())
    }
}

/// How the faucet flow is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaucetMode {
    #[default]
    Manual,
    /// Faucet flow follows the sluice outflow so the level holds
    MatchLeakage,
}

/// Water tower screen: a tank fed by a faucet and drained through a sluice
#[derive(Debug)]
pub struct WaterTowerScene {
    pub fluid: FluidState,
    pressure_field: PressureField,
    tank: Tank,
    faucet: Faucet,
    faucet_mode: FaucetMode,
    faucet_position: DVec2,
    hose: Hose,
    initial_hose: Hose,
    sluice_open: bool,
    faucet_drops: Vec<WaterDrop>,
    tower_drops: Vec<WaterDrop>,
    hose_drops: Vec<WaterDrop>,
    drop_volume: f64,
    clock: SimulationClock,
    kinematics: DropKinematics,
    rng: StdRng,
    seed: u64,
    playing: bool,
}

impl WaterTowerScene {
    pub fn new(config: &TowerConfig, fluid: FluidSettings, seed: u64) -> SimResult<Self> {
        config.validate()?;
        let hose = Hose {
            nozzle: DVec2::from_array(config.hose_position),
            angle_degrees: config.hose_angle_degrees,
            visible: false,
        };
        let mut scene = Self {
            fluid: FluidState::new(fluid)?,
            pressure_field: PressureField::default(),
            tank: Tank::new(
                DVec2::from_array(config.tank_position),
                config.tank_radius,
                config.tank_height,
                config.initial_fill,
            ),
            faucet: Faucet::new(config.max_faucet_flow_rate),
            faucet_mode: FaucetMode::Manual,
            faucet_position: DVec2::from_array(config.faucet_position),
            hose,
            initial_hose: hose,
            sluice_open: false,
            faucet_drops: Vec::new(),
            tower_drops: Vec::new(),
            hose_drops: Vec::new(),
            drop_volume: config.drop_volume,
            clock: SimulationClock::new(ClockConfig::new(config.max_frame_dt, config.quantum))?,
            kinematics: DropKinematics::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            playing: true,
        };
        scene.sync_faucet_enabled();
        Ok(scene)
    }

    pub fn tank(&self) -> &Tank {
        &self.tank
    }

    pub fn faucet(&self) -> &Faucet {
        &self.faucet
    }

    pub fn hose(&self) -> &Hose {
        &self.hose
    }

    pub fn faucet_drops(&self) -> &[WaterDrop] {
        &self.faucet_drops
    }

    pub fn tower_drops(&self) -> &[WaterDrop] {
        &self.tower_drops
    }

    pub fn hose_drops(&self) -> &[WaterDrop] {
        &self.hose_drops
    }

    /// Simulated time since creation or reset (s)
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn is_sluice_open(&self) -> bool {
        self.sluice_open
    }

    pub fn set_sluice_open(&mut self, open: bool) {
        self.sluice_open = open;
    }

    pub fn faucet_mode(&self) -> FaucetMode {
        self.faucet_mode
    }

    pub fn set_faucet_mode(&mut self, mode: FaucetMode) {
        self.faucet_mode = mode;
    }

    /// Manual faucet setting; ignored while matching leakage
    pub fn set_faucet_flow_rate(&mut self, flow_rate: f64) -> f64 {
        if self.faucet_mode == FaucetMode::Manual {
            self.faucet.set_flow_rate(flow_rate);
        }
        self.faucet.flow_rate()
    }

    pub fn set_hose_visible(&mut self, visible: bool) {
        self.hose.visible = visible;
    }

    pub fn set_hose_angle(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.hose.angle_degrees = degrees;
        }
    }

    /// Raise or lower the tank; returns the elevation applied
    pub fn set_tank_elevation(&mut self, y: f64) -> f64 {
        self.tank.set_elevation(y)
    }

    pub fn fill_tank(&mut self) {
        self.tank.fill();
        self.sync_faucet_enabled();
    }

    /// Outflow through the sluice (m³/s); zero when closed or dry
    pub fn leakage_rate(&self) -> f64 {
        if self.sluice_open && !self.tank.is_empty() {
            self.drop_volume / self.clock.config().quantum
        } else {
            0.0
        }
    }

    /// Torricelli exit speed at the sluice
    pub fn efflux_speed(&self) -> f64 {
        (2.0 * self.fluid.gravity_value() * self.tank.fluid_level()).max(0.0).sqrt()
    }

    fn sync_faucet_enabled(&mut self) {
        let full = self.tank.is_full();
        if self.faucet.is_enabled() == full {
            self.faucet.set_enabled(!full);
        }
    }

    fn jitter(&mut self, spread: f64) -> DVec2 {
        DVec2::new(self.rng.gen::<f64>() * spread, self.rng.gen::<f64>() * spread)
    }

    /// Advance the scene by one frame
    pub fn step(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        if self.faucet_mode == FaucetMode::MatchLeakage {
            let rate = self.leakage_rate();
            self.faucet.set_flow_rate(rate);
        }

        let ticks = self.clock.advance(dt);
        let frame_dt = ticks.frame_dt();
        if frame_dt <= 0.0 {
            return;
        }
        let gravity = self.fluid.gravity_value();
        let quantum = self.clock.config().quantum;

        let mut new_faucet_drops = Vec::new();
        let mut new_tower_drops = Vec::new();
        let mut new_hose_drops = Vec::new();

        for tick in ticks {
            let faucet_flow = self.faucet.effective_flow_rate();
            if faucet_flow > 0.0 {
                let position = self.faucet_position + self.jitter(FAUCET_JITTER);
                let mut drop = WaterDrop::new(position, DVec2::ZERO, faucet_flow * quantum);
                if self.kinematics.step(&mut drop, tick.leftover, gravity, Some(&mut self.tank)).is_falling() {
                    new_faucet_drops.push(drop);
                }
            }

            if self.sluice_open && !self.tank.is_empty() {
                let speed = self.efflux_speed();
                let (position, velocity) = if self.hose.visible {
                    (self.hose.nozzle, self.hose.direction() * speed)
                } else {
                    let hole = self.tank.position()
                        + DVec2::new(2.0 * self.tank.radius(), HOLE_SIZE)
                        + self.jitter(SLUICE_JITTER)
                        - DVec2::splat(SLUICE_JITTER / 2.0);
                    (hole, DVec2::new(speed, 0.0))
                };
                let volume = self.tank.drain(self.drop_volume);
                let mut drop = WaterDrop::new(position, velocity, volume);
                if self.kinematics.step(&mut drop, tick.leftover, gravity, None).is_falling() {
                    if self.hose.visible {
                        new_hose_drops.push(drop);
                    } else {
                        new_tower_drops.push(drop);
                    }
                }
            }
        }

        self.kinematics
            .step_all(&mut self.faucet_drops, frame_dt, gravity, Some(&mut self.tank));
        self.kinematics.step_all(&mut self.tower_drops, frame_dt, gravity, None);
        self.kinematics.step_all(&mut self.hose_drops, frame_dt, gravity, None);

        self.faucet_drops.extend(new_faucet_drops);
        self.tower_drops.extend(new_tower_drops);
        self.hose_drops.extend(new_hose_drops);
        self.sync_faucet_enabled();

        log::trace!(
            "Tower step dt={:.3}: level {:.3} m, {} faucet / {} tower / {} hose drops",
            frame_dt,
            self.tank.fluid_level(),
            self.faucet_drops.len(),
            self.tower_drops.len(),
            self.hose_drops.len()
        );
    }

    /// Pressure at `(x, y)`: zero underground, air outside the tank,
    /// hydrostatic inside the tank fluid
    pub fn pressure_at(&self, x: f64, y: f64) -> f64 {
        if y < 0.0 {
            return 0.0;
        }
        if self.tank.contains_fluid(x, y) {
            let surface = self.tank.surface_y();
            return submerged_pressure(
                self.pressure_field.air_pressure(surface),
                surface - y,
                self.fluid.density_value(),
                self.fluid.gravity_value(),
                None,
            );
        }
        self.pressure_field.air_pressure(y)
    }

    /// Velocity of the drop covering `(x, y)`, zero if none does
    pub fn water_drop_velocity_at(&self, x: f64, y: f64) -> DVec2 {
        let point = DVec2::new(x, y);
        self.faucet_drops
            .iter()
            .chain(&self.tower_drops)
            .chain(&self.hose_drops)
            .find(|drop| drop.position.distance(point) <= drop.radius())
            .map_or(DVec2::ZERO, |drop| drop.velocity)
    }

    pub fn reset(&mut self) {
        self.fluid.reset();
        self.tank.reset();
        self.faucet.reset();
        self.faucet_mode = FaucetMode::Manual;
        self.hose = self.initial_hose;
        self.sluice_open = false;
        self.faucet_drops.clear();
        self.tower_drops.clear();
        self.hose_drops.clear();
        self.clock.reset();
        self.rng = StdRng::seed_from_u64(self.seed);
        self.playing = true;
        self.sync_faucet_enabled();
        log::debug!("Water tower scene reset");
    }
}
