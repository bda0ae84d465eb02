//! Fluid properties and pressure
//!
//! Pure pressure functions plus the per-scene fluid state (density, gravity)
//! and the colour derived from density.

pub mod pressure;
pub mod fluid_state;
pub mod color;
pub mod units;

pub use pressure::{PressureField, hydrostatic_pressure, kinetic_pressure, submerged_pressure};
pub use fluid_state::{FluidSettings, FluidState};
pub use color::{FluidColor, fluid_color_for_density};
pub use units::MeasureUnits;
