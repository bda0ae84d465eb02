use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::flow::{
    GRID_COLUMNS, GRID_COLUMN_SPACING, GRID_INJECTOR_COOLDOWN, GRID_ROWS, MAX_FRAME_DT,
    PARTICLE_FRACTION_MIN, PARTICLE_FRACTION_SPAN, PARTICLE_INJECTION_RATE,
};
use crate::error::{require_positive, SimResult};
use crate::particles::FlowParticle;
use crate::pipe::PipeGeometry;
use crate::time::{ClockConfig, SimulationClock};

/// Emits red flow particles at the pipe inlet at a fixed rate
#[derive(Debug, Clone)]
pub struct ParticleInjector {
    clock: SimulationClock,
    rng: StdRng,
    seed: u64,
}

impl ParticleInjector {
    /// `max_frame_dt` is the clamp the owning scene applies to frame deltas
    pub fn new(rate: f64, max_frame_dt: f64, seed: u64) -> SimResult<Self> {
        require_positive("flow.injection_rate", rate)?;
        let clock = SimulationClock::new(ClockConfig::new(max_frame_dt, 1.0 / rate))?;
        Ok(Self {
            clock,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn with_default_rate(seed: u64) -> SimResult<Self> {
        Self::new(PARTICLE_INJECTION_RATE, MAX_FRAME_DT, seed)
    }

    /// Particles per second
    pub fn rate(&self) -> f64 {
        1.0 / self.clock.config().quantum
    }

    /// Time left over after each injection that falls inside this `dt`
    pub fn due(&mut self, dt: f64) -> Vec<f64> {
        self.clock.advance(dt).map(|tick| tick.leftover).collect()
    }

    /// A fresh particle at the inlet with a fraction in [0.15, 0.85)
    pub fn spawn(&mut self, pipe: &PipeGeometry) -> FlowParticle {
        let fraction = PARTICLE_FRACTION_MIN + self.rng.gen::<f64>() * PARTICLE_FRACTION_SPAN;
        FlowParticle::flow(pipe.min_x(), fraction)
    }

    /// Clear pending time and restart the random sequence
    pub fn reset(&mut self) {
        self.clock.reset();
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

/// Fires a block of black particles and then rests for a cooldown period
#[derive(Debug, Clone)]
pub struct GridInjector {
    cooldown: f64,
    /// Simulated time since the last firing, `None` when ready
    since_fired: Option<f64>,
}

impl Default for GridInjector {
    fn default() -> Self {
        Self::new(GRID_INJECTOR_COOLDOWN)
    }
}

impl GridInjector {
    pub fn new(cooldown: f64) -> Self {
        Self {
            cooldown: cooldown.max(0.0),
            since_fired: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.since_fired.is_none()
    }

    /// Count simulated time toward the end of the cooldown
    pub fn tick(&mut self, dt: f64) {
        if let Some(elapsed) = self.since_fired.as_mut() {
            if dt > 0.0 {
                *elapsed += dt;
            }
            if *elapsed > self.cooldown {
                self.since_fired = None;
            }
        }
    }

    /// Build a grid of particles at the inlet, or `None` while cooling down
    pub fn fire(&mut self, pipe: &PipeGeometry) -> Option<Vec<FlowParticle>> {
        if !self.is_ready() {
            return None;
        }
        self.since_fired = Some(0.0);

        let mut particles = Vec::with_capacity(GRID_COLUMNS * GRID_ROWS);
        for column in 0..GRID_COLUMNS {
            let x = pipe.min_x() + column as f64 * GRID_COLUMN_SPACING;
            for row in 0..GRID_ROWS {
                let fraction = (row + 1) as f64 / (GRID_ROWS + 1) as f64;
                particles.push(FlowParticle::grid(x, fraction));
            }
        }
        log::debug!("Grid injector fired {} particles", particles.len());
        Some(particles)
    }

    pub fn reset(&mut self) {
        self.since_fired = None;
    }
}
