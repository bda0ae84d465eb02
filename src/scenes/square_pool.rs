use serde::{Deserialize, Serialize};

use crate::constants::pool::{
    DEFAULT_FLUID_LEVEL, DRAIN_FAUCET_MAX_FLOW, FILL_FAUCET_MAX_FLOW, POOL_DEPTH, POOL_LEFT_X,
    POOL_WIDTH,
};
use crate::error::{invalid_config, require_positive, SimResult};
use crate::fluid::{submerged_pressure, FluidSettings, FluidState, PressureField};
use crate::scenes::Faucet;

/// Square pool settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub left_x: f64,
    pub width: f64,
    pub depth: f64,
    /// Initial water height above the floor (m)
    pub initial_level: f64,
    /// m³/s per metre of pool depth
    pub fill_max_flow: f64,
    pub drain_max_flow: f64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            left_x: POOL_LEFT_X,
            width: POOL_WIDTH,
            depth: POOL_DEPTH,
            initial_level: DEFAULT_FLUID_LEVEL,
            fill_max_flow: FILL_FAUCET_MAX_FLOW,
            drain_max_flow: DRAIN_FAUCET_MAX_FLOW,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> SimResult<()> {
        require_positive("pool.width", self.width)?;
        require_positive("pool.depth", self.depth)?;
        require_positive("pool.fill_max_flow", self.fill_max_flow)?;
        require_positive("pool.drain_max_flow", self.drain_max_flow)?;
        if !self.left_x.is_finite() {
            return Err(invalid_config("pool.left_x", "must be finite"));
        }
        if !(0.0..=self.depth).contains(&self.initial_level) {
            return Err(invalid_config("pool.initial_level", format!("must lie in [0, {}]", self.depth)));
        }
        Ok(())
    }
}

/// Open rectangular pool sunk into the ground, with a fill faucet above and
/// a drain faucet below
#[derive(Debug)]
pub struct SquarePool {
    pub fluid: FluidState,
    pressure_field: PressureField,
    left_x: f64,
    width: f64,
    depth: f64,
    /// Water cross-section area (m², unit depth)
    volume: f64,
    initial_volume: f64,
    fill_faucet: Faucet,
    drain_faucet: Faucet,
    playing: bool,
}

impl SquarePool {
    pub fn new(config: &PoolConfig, fluid: FluidSettings) -> SimResult<Self> {
        config.validate()?;
        let volume = config.initial_level * config.width;
        let mut pool = Self {
            fluid: FluidState::new(fluid)?,
            pressure_field: PressureField::default(),
            left_x: config.left_x,
            width: config.width,
            depth: config.depth,
            volume,
            initial_volume: volume,
            fill_faucet: Faucet::new(config.fill_max_flow),
            drain_faucet: Faucet::new(config.drain_max_flow),
            playing: true,
        };
        pool.sync_faucets();
        Ok(pool)
    }

    pub fn capacity(&self) -> f64 {
        self.width * self.depth
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Water height above the floor (m)
    pub fn fluid_level(&self) -> f64 {
        self.volume / self.width
    }

    pub fn surface_y(&self) -> f64 {
        -self.depth + self.fluid_level()
    }

    pub fn is_full(&self) -> bool {
        self.volume >= self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.volume <= 0.0
    }

    pub fn fill_faucet(&self) -> &Faucet {
        &self.fill_faucet
    }

    pub fn drain_faucet(&self) -> &Faucet {
        &self.drain_faucet
    }

    pub fn set_fill_flow_rate(&mut self, flow_rate: f64) -> f64 {
        self.fill_faucet.set_flow_rate(flow_rate)
    }

    pub fn set_drain_flow_rate(&mut self, flow_rate: f64) -> f64 {
        self.drain_faucet.set_flow_rate(flow_rate)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    fn sync_faucets(&mut self) {
        let full = self.is_full();
        if self.fill_faucet.is_enabled() == full {
            self.fill_faucet.set_enabled(!full);
        }
        let empty = self.is_empty();
        if self.drain_faucet.is_enabled() == empty {
            self.drain_faucet.set_enabled(!empty);
        }
    }

    /// Advance the scene by one frame
    pub fn step(&mut self, dt: f64) {
        if !self.playing || dt.is_nan() || dt <= 0.0 {
            return;
        }
        let net = self.fill_faucet.effective_flow_rate() - self.drain_faucet.effective_flow_rate();
        let volume = self.volume + net * dt;
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, self.capacity());
        }
        self.sync_faucets();
    }

    /// Whether `(x, y)` is inside the pool walls, water or not
    pub fn is_point_inside_pool(&self, x: f64, y: f64) -> bool {
        x > self.left_x && x < self.left_x + self.width && y > -self.depth && y < 0.0
    }

    /// Pressure at `(x, y)`: air above ground and above the water, hydrostatic
    /// below the surface, zero in solid ground
    pub fn pressure_at(&self, x: f64, y: f64) -> f64 {
        if y >= 0.0 {
            return self.pressure_field.air_pressure(y);
        }
        if !self.is_point_inside_pool(x, y) {
            return 0.0;
        }
        submerged_pressure(
            self.pressure_field.air_pressure(0.0),
            self.surface_y() - y,
            self.fluid.density_value(),
            self.fluid.gravity_value(),
            None,
        )
    }

    pub fn reset(&mut self) {
        self.fluid.reset();
        self.volume = self.initial_volume;
        self.fill_faucet.reset();
        self.drain_faucet.reset();
        self.playing = true;
        self.sync_faucets();
        log::debug!("Square pool reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> SquarePool {
        SquarePool::new(&PoolConfig::default(), FluidSettings::default()).unwrap()
    }

    #[test]
    fn test_fill_and_drain() {
        let mut pool = pool();
        assert_eq!(pool.fluid_level(), 2.0);
        pool.set_fill_flow_rate(0.2);
        pool.set_drain_flow_rate(0.1);
        pool.step(2.0);
        assert!((pool.volume() - 8.2).abs() < 1e-12);
    }

    #[test]
    fn test_full_pool_disables_fill() {
        let mut pool = pool();
        pool.set_fill_flow_rate(0.25);
        for _ in 0..20 {
            pool.step(1.0);
        }
        assert!(pool.is_full());
        assert!(!pool.fill_faucet().is_enabled());
        assert_eq!(pool.volume(), pool.capacity());

        pool.set_drain_flow_rate(0.25);
        pool.step(1.0);
        assert!(pool.fill_faucet().is_enabled());
        assert_eq!(pool.fill_faucet().flow_rate(), 0.0);
    }

    #[test]
    fn test_empty_pool_disables_drain() {
        let mut pool = pool();
        pool.set_drain_flow_rate(0.25);
        for _ in 0..40 {
            pool.step(1.0);
        }
        assert!(pool.is_empty());
        assert!(!pool.drain_faucet().is_enabled());
    }

    #[test]
    fn test_pressure_below_surface() {
        let pool = pool();
        let air = PressureField::default().air_pressure(0.0);
        assert_eq!(pool.pressure_at(4.0, -0.5), air);
        let expected = air + 1000.0 * 9.8 * 1.5;
        assert!((pool.pressure_at(4.0, -2.5) - expected).abs() < 1e-6);
        assert_eq!(pool.pressure_at(1.0, -2.5), 0.0);
    }

    #[test]
    fn test_reset_restores_level() {
        let mut pool = pool();
        pool.set_drain_flow_rate(0.25);
        pool.step(3.0);
        pool.reset();
        assert_eq!(pool.fluid_level(), 2.0);
        assert_eq!(pool.drain_faucet().flow_rate(), 0.0);
    }
}
