use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A falling drop of fluid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterDrop {
    pub position: DVec2,
    pub velocity: DVec2,
    /// m³
    pub volume: f64,
}

impl WaterDrop {
    pub fn new(position: DVec2, velocity: DVec2, volume: f64) -> Self {
        Self {
            position,
            velocity,
            volume: volume.max(0.0),
        }
    }

    /// Radius of a sphere holding the drop's volume
    pub fn radius(&self) -> f64 {
        (3.0 * self.volume / (4.0 * PI)).cbrt()
    }
}
