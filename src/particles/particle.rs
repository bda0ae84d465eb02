use serde::{Deserialize, Serialize};

use crate::constants::flow::{FLOW_PARTICLE_RADIUS, GRID_PARTICLE_RADIUS};
use crate::fluid::FluidColor;
use crate::pipe::PipeGeometry;

/// Tracer dot carried by the pipe flow.
///
/// Position is stored as an x plus a fraction across the pipe, so the dot
/// follows the rails when the pipe is reshaped under it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowParticle {
    pub x: f64,
    /// 0 at the bottom rail, 1 at the top rail
    pub fraction: f64,
    pub radius: f64,
    pub color: FluidColor,
    pub is_grid_particle: bool,
}

impl FlowParticle {
    /// Red flow dot
    pub fn flow(x: f64, fraction: f64) -> Self {
        Self {
            x,
            fraction,
            radius: FLOW_PARTICLE_RADIUS,
            color: FluidColor::RED,
            is_grid_particle: false,
        }
    }

    /// Black grid-injector dot
    pub fn grid(x: f64, fraction: f64) -> Self {
        Self {
            x,
            fraction,
            radius: GRID_PARTICLE_RADIUS,
            color: FluidColor::BLACK,
            is_grid_particle: true,
        }
    }

    /// Current height inside `pipe`
    pub fn y(&self, pipe: &PipeGeometry) -> f64 {
        let x = self.x.clamp(pipe.min_x(), pipe.max_x());
        pipe.cross_section(x)
            .map(|section| section.y_at_fraction(self.fraction))
            .unwrap_or(f64::NAN)
    }
}
