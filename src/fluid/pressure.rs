use serde::{Deserialize, Serialize};

use crate::constants::fluid::{
    EARTH_AIR_PRESSURE, EARTH_AIR_PRESSURE_AT_500_FT, REFERENCE_ALTITUDE,
};
use crate::error::{invalid_config, SimResult};

/// Air pressure calibration and the pressure function built on it.
///
/// Air pressure is a straight line through two calibration points, sea level
/// and a reference altitude, extrapolated outside that range. Below the
/// reference surface (`y < 0`) the pressure is hydrostatic on top of a
/// caller-supplied surface air pressure, with an optional Bernoulli term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureField {
    /// Air pressure at height 0 (Pa)
    pub sea_level_pressure: f64,
    /// Height of the second calibration point (m)
    pub reference_altitude: f64,
    /// Air pressure at the reference altitude (Pa)
    pub reference_pressure: f64,
}

impl Default for PressureField {
    fn default() -> Self {
        Self {
            sea_level_pressure: EARTH_AIR_PRESSURE,
            reference_altitude: REFERENCE_ALTITUDE,
            reference_pressure: EARTH_AIR_PRESSURE_AT_500_FT,
        }
    }
}

impl PressureField {
    pub fn new(sea_level_pressure: f64, reference_altitude: f64, reference_pressure: f64) -> SimResult<Self> {
        if !reference_altitude.is_finite() || reference_altitude.abs() < f64::EPSILON {
            return Err(invalid_config(
                "pressure.reference_altitude",
                "must be finite and non-zero",
            ));
        }
        if !sea_level_pressure.is_finite() || !reference_pressure.is_finite() {
            return Err(invalid_config("pressure", "calibration pressures must be finite"));
        }
        Ok(Self {
            sea_level_pressure,
            reference_altitude,
            reference_pressure,
        })
    }

    /// Standard air pressure at `height` metres above the reference surface
    pub fn air_pressure(&self, height: f64) -> f64 {
        let slope = (self.reference_pressure - self.sea_level_pressure) / self.reference_altitude;
        self.sea_level_pressure + slope * height
    }

    /// Pressure at height `y` for the given fluid.
    ///
    /// `y >= 0` answers the air pressure at `y`. `y < 0` answers
    /// `reference_air_pressure + density * gravity * depth`, less the kinetic
    /// term `0.5 * density * speed²` when `speed` is known.
    pub fn pressure(
        &self,
        y: f64,
        density: f64,
        gravity: f64,
        reference_air_pressure: f64,
        speed: Option<f64>,
    ) -> f64 {
        if y >= 0.0 {
            self.air_pressure(y)
        } else {
            submerged_pressure(reference_air_pressure, -y, density, gravity, speed)
        }
    }
}

/// Pressure `depth` metres below a free surface held at `surface_air_pressure`
pub fn submerged_pressure(
    surface_air_pressure: f64,
    depth: f64,
    density: f64,
    gravity: f64,
    speed: Option<f64>,
) -> f64 {
    let kinetic = speed.map_or(0.0, |v| kinetic_pressure(density, v));
    surface_air_pressure + hydrostatic_pressure(depth, density, gravity) - kinetic
}

/// Weight of the fluid column above a point; negative depths count as zero
pub fn hydrostatic_pressure(depth: f64, density: f64, gravity: f64) -> f64 {
    density * gravity * depth.max(0.0)
}

/// Dynamic pressure `0.5 * ρ * v²`
pub fn kinetic_pressure(density: f64, speed: f64) -> f64 {
    0.5 * density * speed * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::fluid::{GASOLINE_DENSITY, HONEY_DENSITY, MAX_GRAVITY, MIN_GRAVITY};

    #[test]
    fn test_air_pressure_calibration() {
        let field = PressureField::default();
        assert_eq!(field.air_pressure(0.0), EARTH_AIR_PRESSURE);
        assert!((field.air_pressure(150.0) - EARTH_AIR_PRESSURE_AT_500_FT).abs() < 1e-6);

        // Halfway sits halfway between the calibration points
        let mid = field.air_pressure(75.0);
        assert!((mid - (EARTH_AIR_PRESSURE + EARTH_AIR_PRESSURE_AT_500_FT) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_submerged_pressure() {
        let field = PressureField::default();
        let surface = field.air_pressure(0.0);
        let p = field.pressure(-2.0, 1000.0, 9.8, surface, None);
        assert!((p - (surface + 19_600.0)).abs() < 1e-6);

        // Bernoulli term lowers the pressure of moving fluid
        let moving = field.pressure(-2.0, 1000.0, 9.8, surface, Some(2.0));
        assert!((p - moving - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn test_pressure_monotonic_in_depth() {
        let field = PressureField::default();
        let surface = field.air_pressure(0.0);

        let mut density = GASOLINE_DENSITY;
        while density <= HONEY_DENSITY {
            let mut gravity = MIN_GRAVITY;
            while gravity <= MAX_GRAVITY {
                let mut previous = field.pressure(0.0, density, gravity, surface, None);
                for step in 1..=60 {
                    let y = -(step as f64) * 0.05;
                    let p = field.pressure(y, density, gravity, surface, None);
                    assert!(
                        p >= previous,
                        "pressure decreased at y={} density={} gravity={}",
                        y, density, gravity
                    );
                    previous = p;
                }
                gravity += 2.0;
            }
            density += 40.0;
        }
    }

    #[test]
    fn test_rejects_degenerate_calibration() {
        assert!(PressureField::new(EARTH_AIR_PRESSURE, 0.0, EARTH_AIR_PRESSURE_AT_500_FT).is_err());
        assert!(PressureField::new(f64::NAN, 150.0, EARTH_AIR_PRESSURE_AT_500_FT).is_err());
    }
}
