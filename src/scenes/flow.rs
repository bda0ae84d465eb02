use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::flow::{MAX_FRAME_DT, PARTICLE_INJECTION_RATE};
use crate::error::{require_positive, SimResult};
use crate::fluid::{submerged_pressure, FluidSettings, FluidState, PressureField};
use crate::particles::{AdvanceOutcome, FlowParticle, GridInjector, ParticleAdvector, ParticleInjector};
use crate::pipe::{CrossSection, FluxMeter, PipeConfig, PipeGeometry};
use crate::time::{clamp_frame_dt, SimSpeed};

/// Flow screen settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub pipe: PipeConfig,
    /// Flow particles per second
    pub injection_rate: f64,
    /// Frame deltas above this are clamped (s)
    pub max_frame_dt: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            pipe: PipeConfig::default(),
            injection_rate: PARTICLE_INJECTION_RATE,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl FlowConfig {
    pub fn validate(&self) -> SimResult<()> {
        self.pipe.validate()?;
        require_positive("flow.injection_rate", self.injection_rate)?;
        require_positive("flow.max_frame_dt", self.max_frame_dt)
    }
}

/// Pipe flow screen: a deformable pipe, tracer particles and pressure probes
#[derive(Debug)]
pub struct FlowScene {
    pub fluid: FluidState,
    pressure_field: PressureField,
    pipe: PipeGeometry,
    flux_meter: FluxMeter,
    flow_particles: Vec<FlowParticle>,
    grid_particles: Vec<FlowParticle>,
    injector: ParticleInjector,
    grid_injector: GridInjector,
    advector: ParticleAdvector,
    max_frame_dt: f64,
    playing: bool,
    speed: SimSpeed,
    dots_visible: bool,
}

impl FlowScene {
    pub fn new(config: &FlowConfig, fluid: FluidSettings, seed: u64) -> SimResult<Self> {
        config.validate()?;
        let pipe = PipeGeometry::new(&config.pipe)?;
        let flux_meter = FluxMeter::centred_on(&pipe);
        Ok(Self {
            fluid: FluidState::new(fluid)?,
            pressure_field: PressureField::default(),
            flux_meter,
            pipe,
            flow_particles: Vec::new(),
            grid_particles: Vec::new(),
            injector: ParticleInjector::new(config.injection_rate, config.max_frame_dt, seed)?,
            grid_injector: GridInjector::default(),
            advector: ParticleAdvector::new(),
            max_frame_dt: config.max_frame_dt,
            playing: true,
            speed: SimSpeed::Normal,
            dots_visible: true,
        })
    }

    pub fn pipe(&self) -> &PipeGeometry {
        &self.pipe
    }

    /// Mutable pipe for control-point drags and flow rate changes
    pub fn pipe_mut(&mut self) -> &mut PipeGeometry {
        &mut self.pipe
    }

    pub fn flux_meter(&self) -> &FluxMeter {
        &self.flux_meter
    }

    /// Move the flux meter along the pipe
    pub fn set_flux_meter_x(&mut self, x: f64) -> f64 {
        self.flux_meter.set_x(x, &self.pipe)
    }

    /// Mean flow speed through the flux meter (m/s)
    pub fn flux(&self) -> f64 {
        self.flux_meter.flux(&self.pipe)
    }

    pub fn flow_particles(&self) -> &[FlowParticle] {
        &self.flow_particles
    }

    pub fn grid_particles(&self) -> &[FlowParticle] {
        &self.grid_particles
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn speed(&self) -> SimSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: SimSpeed) {
        self.speed = speed;
    }

    pub fn dots_visible(&self) -> bool {
        self.dots_visible
    }

    /// Hidden dots stop new flow particles; existing ones keep moving
    pub fn set_dots_visible(&mut self, visible: bool) {
        self.dots_visible = visible;
    }

    /// Fire the grid injector. Returns false while it is cooling down.
    pub fn inject_grid(&mut self) -> bool {
        match self.grid_injector.fire(&self.pipe) {
            Some(particles) => {
                self.grid_particles.extend(particles);
                true
            }
            None => false,
        }
    }

    pub fn is_grid_injector_ready(&self) -> bool {
        self.grid_injector.is_ready()
    }

    /// Advance the scene by one frame
    pub fn step(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        let dt = clamp_frame_dt(dt, self.max_frame_dt) * self.speed.factor();
        if dt <= 0.0 {
            return;
        }

        self.grid_injector.tick(dt);

        let mut new_particles = Vec::new();
        for leftover in self.injector.due(dt) {
            if !self.dots_visible {
                continue;
            }
            let mut particle = self.injector.spawn(&self.pipe);
            if self.advector.advance(&self.pipe, &mut particle, leftover) == AdvanceOutcome::Moved {
                new_particles.push(particle);
            }
        }

        self.advector.propagate(&self.pipe, &mut self.flow_particles, dt);
        self.advector.propagate(&self.pipe, &mut self.grid_particles, dt);
        self.flow_particles.extend(new_particles);

        log::trace!(
            "Flow step dt={:.4}: {} flow, {} grid particles",
            dt,
            self.flow_particles.len(),
            self.grid_particles.len()
        );
    }

    /// Pipe cross-section under `(x, y)` when the point is inside the fluid
    fn section_containing(&self, x: f64, y: f64) -> Option<CrossSection> {
        self.pipe.cross_section(x).filter(|section| section.contains(y))
    }

    /// Pressure at `(x, y)`: air above ground, Bernoulli inside the pipe,
    /// zero in solid ground
    pub fn pressure_at(&self, x: f64, y: f64) -> f64 {
        if y >= 0.0 {
            return self.pressure_field.air_pressure(y);
        }
        match self.section_containing(x, y) {
            Some(_) => submerged_pressure(
                self.pressure_field.air_pressure(0.0),
                -y,
                self.fluid.density_value(),
                self.fluid.gravity_value(),
                Some(self.pipe.speed(x)),
            ),
            None => 0.0,
        }
    }

    /// Fluid velocity at `(x, y)`, zero outside the pipe
    pub fn water_drop_velocity_at(&self, x: f64, y: f64) -> DVec2 {
        if x <= self.pipe.min_x() || x >= self.pipe.max_x() {
            return DVec2::ZERO;
        }
        match self.section_containing(x, y) {
            Some(_) => self.pipe.tweaked_velocity(x, y),
            None => DVec2::ZERO,
        }
    }

    /// Pipe outline for drawing
    pub fn sample_outline(&self, samples: usize) -> Vec<CrossSection> {
        self.pipe.sample_outline(samples)
    }

    pub fn reset(&mut self) {
        self.fluid.reset();
        self.pipe.reset();
        self.flux_meter.reset();
        self.flow_particles.clear();
        self.grid_particles.clear();
        self.injector.reset();
        self.grid_injector.reset();
        self.playing = true;
        self.speed = SimSpeed::Normal;
        self.dots_visible = true;
        log::debug!("Flow scene reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> FlowScene {
        FlowScene::new(&FlowConfig::default(), FluidSettings::default(), 1).unwrap()
    }

    #[test]
    fn test_injects_ten_per_second() {
        let mut scene = scene();
        for _ in 0..25 {
            scene.step(0.04);
        }
        assert_eq!(scene.flow_particles().len(), 10);
        assert!(scene.flow_particles().iter().all(|p| p.x >= scene.pipe().min_x()));
    }

    #[test]
    fn test_injection_rate_follows_configured_frame_clamp() {
        let config = FlowConfig {
            max_frame_dt: 0.1,
            ..FlowConfig::default()
        };
        let mut scene = FlowScene::new(&config, FluidSettings::default(), 1).unwrap();
        for _ in 0..10 {
            scene.step(0.1);
        }
        assert_eq!(scene.flow_particles().len(), 10);
    }

    #[test]
    fn test_paused_and_zero_dt_change_nothing() {
        let mut scene = scene();
        scene.step(0.5);
        let snapshot = scene.flow_particles().to_vec();
        scene.step(0.0);
        scene.step(f64::NAN);
        assert_eq!(scene.flow_particles(), snapshot.as_slice());
        scene.set_playing(false);
        scene.step(0.04);
        assert_eq!(scene.flow_particles(), snapshot.as_slice());
    }

    #[test]
    fn test_hidden_dots_stop_injection() {
        let mut scene = scene();
        scene.set_dots_visible(false);
        for _ in 0..50 {
            scene.step(0.04);
        }
        assert!(scene.flow_particles().is_empty());
    }

    #[test]
    fn test_pressure_regions() {
        let scene = scene();
        let air = scene.pressure_at(0.0, 10.0);
        assert!(air < 101_325.0 && air > 99_000.0);
        // Solid ground between the surface and the pipe top at y = -1
        assert_eq!(scene.pressure_at(0.0, -0.5), 0.0);
        let deep = scene.pressure_at(0.0, -2.9);
        let shallow = scene.pressure_at(0.0, -1.1);
        assert!(deep > shallow && shallow > 101_325.0 - 1.0);
    }

    #[test]
    fn test_velocity_zero_outside_pipe() {
        let scene = scene();
        assert_eq!(scene.water_drop_velocity_at(0.0, 0.5), DVec2::ZERO);
        assert_eq!(scene.water_drop_velocity_at(-7.0, -2.0), DVec2::ZERO);
        let inside = scene.water_drop_velocity_at(0.0, -2.0);
        assert!((inside.x - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_reset_clears_particles() {
        let mut scene = scene();
        assert!(scene.inject_grid());
        assert!(!scene.inject_grid());
        scene.step(0.5);
        scene.pipe_mut().set_flow_rate(9000.0);
        scene.reset();
        assert!(scene.flow_particles().is_empty());
        assert!(scene.grid_particles().is_empty());
        assert!(scene.is_grid_injector_ready());
        assert_eq!(scene.pipe().flow_rate(), 5000.0);
    }
}
