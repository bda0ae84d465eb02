//! Simulation configuration
//!
//! Every section falls back to the compiled-in defaults from `constants`,
//! so a config file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::time::DEFAULT_FRAME_DT;
use crate::error::{require_positive, SimResult};
use crate::fluid::FluidSettings;
use crate::scenes::{ChamberConfig, FlowConfig, PoolConfig, TowerConfig};

/// Default RNG seed for drop jitter and particle placement
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Headless run length and frame rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Simulated seconds per scene
    pub duration: f64,
    /// Frame delta fed to each scene (s)
    pub frame_dt: f64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            duration: 10.0,
            frame_dt: DEFAULT_FRAME_DT,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub run: RunSettings,
    pub fluid: FluidSettings,
    pub flow: FlowConfig,
    pub tower: TowerConfig,
    pub chamber: ChamberConfig,
    pub pool: PoolConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            run: RunSettings::default(),
            fluid: FluidSettings::default(),
            flow: FlowConfig::default(),
            tower: TowerConfig::default(),
            chamber: ChamberConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> SimResult<Self> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> SimResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        fs::write(path.as_ref(), self.to_toml_string()?)?;
        Ok(())
    }

    /// Check every section
    pub fn validate(&self) -> SimResult<()> {
        require_positive("run.duration", self.run.duration)?;
        require_positive("run.frame_dt", self.run.frame_dt)?;
        self.fluid.validate()?;
        self.flow.validate()?;
        self.tower.validate()?;
        self.chamber.validate()?;
        self.pool.validate()
    }
}
