//! Unit conversions for readouts
//!
//! Numeric only; formatting and localisation belong to the view layer.

use serde::{Deserialize, Serialize};

pub const ATMOSPHERE_PER_PASCAL: f64 = 9.8692e-6;
pub const PSI_PER_PASCAL: f64 = 145.04e-6;
pub const FEET_PER_METER: f64 = 3.2808399;
pub const GRAVITY_ENGLISH_PER_METRIC: f64 = 32.16 / 9.80665;
pub const FLUID_DENSITY_ENGLISH_PER_METRIC: f64 = 62.4 / 1000.0;
pub const FLOW_RATE_ENGLISH_PER_METRIC: f64 = 35.3 / 1000.0;
pub const SQUARE_FEET_PER_SQUARE_METER: f64 = 10.7639;
pub const CUBIC_FEET_PER_LITER: f64 = 0.0353146;

/// Unit system selected for readouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureUnits {
    #[default]
    Metric,
    English,
    Atmosphere,
}

impl MeasureUnits {
    /// Pressure in kPa, psi or atm
    pub fn pressure(self, pascals: f64) -> f64 {
        match self {
            MeasureUnits::Metric => pascals / 1000.0,
            MeasureUnits::English => pascals * PSI_PER_PASCAL,
            MeasureUnits::Atmosphere => pascals * ATMOSPHERE_PER_PASCAL,
        }
    }

    /// Density in kg/m³ or lb/ft³
    pub fn density(self, kg_per_cubic_meter: f64) -> f64 {
        match self {
            MeasureUnits::English => kg_per_cubic_meter * FLUID_DENSITY_ENGLISH_PER_METRIC,
            _ => kg_per_cubic_meter,
        }
    }

    /// Gravity in m/s² or ft/s²
    pub fn gravity(self, meters_per_second_squared: f64) -> f64 {
        match self {
            MeasureUnits::English => meters_per_second_squared * GRAVITY_ENGLISH_PER_METRIC,
            _ => meters_per_second_squared,
        }
    }

    /// Flow rate in L/s or ft³/s
    pub fn flow_rate(self, liters_per_second: f64) -> f64 {
        match self {
            MeasureUnits::English => liters_per_second * FLOW_RATE_ENGLISH_PER_METRIC,
            _ => liters_per_second,
        }
    }

    /// Length in m or ft
    pub fn length(self, meters: f64) -> f64 {
        match self {
            MeasureUnits::English => meters_to_feet(meters),
            _ => meters,
        }
    }
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}
