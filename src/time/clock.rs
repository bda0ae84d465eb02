use serde::{Deserialize, Serialize};

use crate::constants::flow::SLOW_MOTION_FACTOR;
use crate::constants::time::QUANTUM_EPSILON;
use crate::error::{invalid_config, require_positive, SimResult};

/// Upper bound on ticks one frame may produce
const MAX_TICKS_PER_FRAME: f64 = 100_000.0;

/// Frame clamp and fixed step for one subsystem
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Raw frame deltas above this are clamped (s)
    pub max_frame_dt: f64,
    /// Fixed physics step (s)
    pub quantum: f64,
}

impl ClockConfig {
    pub fn new(max_frame_dt: f64, quantum: f64) -> Self {
        Self { max_frame_dt, quantum }
    }

    pub fn validate(&self) -> SimResult<()> {
        require_positive("clock.max_frame_dt", self.max_frame_dt)?;
        require_positive("clock.quantum", self.quantum)?;
        if self.max_frame_dt / self.quantum > MAX_TICKS_PER_FRAME {
            return Err(invalid_config(
                "clock.quantum",
                format!("too small for max_frame_dt {}", self.max_frame_dt),
            ));
        }
        Ok(())
    }
}

/// Clamp a raw frame delta to `[0, max]`; NaN counts as no time at all
pub fn clamp_frame_dt(raw_dt: f64, max: f64) -> f64 {
    if raw_dt.is_nan() || raw_dt <= 0.0 {
        0.0
    } else {
        raw_dt.min(max)
    }
}

/// Simulation playback speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimSpeed {
    #[default]
    Normal,
    Slow,
}

impl SimSpeed {
    pub fn factor(self) -> f64 {
        match self {
            SimSpeed::Normal => 1.0,
            SimSpeed::Slow => SLOW_MOTION_FACTOR,
        }
    }
}

/// One fixed physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Position of this tick within the frame
    pub index: u32,
    /// Step size, always the clock quantum
    pub dt: f64,
    /// Time still in the accumulator after this tick; entities spawned
    /// during the tick are advanced by this much
    pub leftover: f64,
}

/// Ticks produced by one call to [`SimulationClock::advance`]
#[derive(Debug, Clone)]
pub struct Ticks {
    quantum: f64,
    accumulated: f64,
    frame_dt: f64,
    count: u32,
    index: u32,
}

impl Ticks {
    /// The clamped frame delta that produced these ticks
    pub fn frame_dt(&self) -> f64 {
        self.frame_dt
    }

    pub fn tick_count(&self) -> u32 {
        self.count
    }
}

impl Iterator for Ticks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.index >= self.count {
            return None;
        }
        let index = self.index;
        self.index += 1;
        let leftover = (self.accumulated - (index + 1) as f64 * self.quantum).max(0.0);
        Some(Tick {
            index,
            dt: self.quantum,
            leftover,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Ticks {}

/// Clamped fixed-step accumulator.
///
/// Each frame's raw delta is clamped, added to the accumulator, and drained
/// one quantum at a time. Physics therefore sees only quantum-sized steps no
/// matter the render rate, and a long pause produces at most
/// `max_frame_dt / quantum` steps.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    config: ClockConfig,
    accumulator: f64,
    elapsed: f64,
    total_ticks: u64,
}

impl SimulationClock {
    pub fn new(config: ClockConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            accumulator: 0.0,
            elapsed: 0.0,
            total_ticks: 0,
        })
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Feed one frame delta and get the fixed steps it pays for
    pub fn advance(&mut self, raw_dt: f64) -> Ticks {
        let frame_dt = clamp_frame_dt(raw_dt, self.config.max_frame_dt);
        let quantum = self.config.quantum;

        self.accumulator += frame_dt;
        self.elapsed += frame_dt;

        let accumulated = self.accumulator;
        let count = ((accumulated + QUANTUM_EPSILON) / quantum).floor() as u32;
        self.accumulator = (accumulated - count as f64 * quantum).max(0.0);
        self.total_ticks += count as u64;

        Ticks {
            quantum,
            accumulated,
            frame_dt,
            count,
            index: 0,
        }
    }

    /// Feed one frame delta and run `step` once per fixed step
    pub fn run<F: FnMut(Tick)>(&mut self, raw_dt: f64, mut step: F) -> u32 {
        let ticks = self.advance(raw_dt);
        let count = ticks.tick_count();
        for tick in ticks {
            step(tick);
        }
        count
    }

    /// Time waiting for the next quantum
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Total clamped time fed in since creation or reset
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.elapsed = 0.0;
        self.total_ticks = 0;
    }
}
