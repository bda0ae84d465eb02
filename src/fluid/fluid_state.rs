use serde::{Deserialize, Serialize};

use crate::constants::fluid::{
    EARTH_GRAVITY, GASOLINE_DENSITY, HONEY_DENSITY, MAX_GRAVITY, MIN_GRAVITY, WATER_DENSITY,
};
use crate::error::{invalid_config, SimResult};
use crate::fluid::{fluid_color_for_density, FluidColor};
use crate::observable::Observable;

/// Initial values and slider limits for a scene's fluid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidSettings {
    pub density: f64,
    pub gravity: f64,
    pub min_density: f64,
    pub max_density: f64,
    pub min_gravity: f64,
    pub max_gravity: f64,
}

impl Default for FluidSettings {
    fn default() -> Self {
        Self {
            density: WATER_DENSITY,
            gravity: EARTH_GRAVITY,
            min_density: GASOLINE_DENSITY,
            max_density: HONEY_DENSITY,
            min_gravity: MIN_GRAVITY,
            max_gravity: MAX_GRAVITY,
        }
    }
}

impl FluidSettings {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.min_density > 0.0 && self.min_density <= self.max_density) {
            return Err(invalid_config("fluid.min_density", "must be positive and <= max_density"));
        }
        if !(self.min_gravity > 0.0 && self.min_gravity <= self.max_gravity) {
            return Err(invalid_config("fluid.min_gravity", "must be positive and <= max_gravity"));
        }
        if !(self.min_density..=self.max_density).contains(&self.density) {
            return Err(invalid_config("fluid.density", format!("{} outside range", self.density)));
        }
        if !(self.min_gravity..=self.max_gravity).contains(&self.gravity) {
            return Err(invalid_config("fluid.gravity", format!("{} outside range", self.gravity)));
        }
        Ok(())
    }
}

/// Density, gravity and fluid colour for one scene.
///
/// User input arrives through the setters, which clamp to the configured
/// range. A density change updates the colour right after, always in that
/// order, so listeners on `color` observe the new density already in place.
#[derive(Debug)]
pub struct FluidState {
    settings: FluidSettings,
    pub density: Observable<f64>,
    pub gravity: Observable<f64>,
    pub color: Observable<FluidColor>,
}

impl FluidState {
    pub fn new(settings: FluidSettings) -> SimResult<Self> {
        settings.validate()?;
        Ok(Self {
            density: Observable::new(settings.density),
            gravity: Observable::new(settings.gravity),
            color: Observable::new(fluid_color_for_density(settings.density)),
            settings,
        })
    }

    pub fn settings(&self) -> &FluidSettings {
        &self.settings
    }

    pub fn density_value(&self) -> f64 {
        self.density.value()
    }

    pub fn gravity_value(&self) -> f64 {
        self.gravity.value()
    }

    /// Set the density within the slider range and recolour the fluid
    pub fn set_density(&mut self, density: f64) {
        if density.is_nan() {
            return;
        }
        let density = density.clamp(self.settings.min_density, self.settings.max_density);
        if self.density.set(density) {
            self.color.set(fluid_color_for_density(density));
        }
    }

    /// Set a density that may lie outside the slider range, with a fixed colour
    pub fn set_custom_density(&mut self, density: f64, color: FluidColor) {
        if density.is_finite() && density > 0.0 {
            self.density.set(density);
            self.color.set(color);
        }
    }

    /// Set gravity within the slider range
    pub fn set_gravity(&mut self, gravity: f64) {
        if gravity.is_nan() {
            return;
        }
        self.gravity
            .set(gravity.clamp(self.settings.min_gravity, self.settings.max_gravity));
    }

    /// Set a gravity that may lie outside the slider range
    pub fn set_custom_gravity(&mut self, gravity: f64) {
        if gravity.is_finite() && gravity > 0.0 {
            self.gravity.set(gravity);
        }
    }

    pub fn reset_density(&mut self) {
        self.density.reset();
        // Recolour unconditionally: a custom colour may linger at the initial density
        self.color.set(fluid_color_for_density(self.density.value()));
    }

    pub fn reset_gravity(&mut self) {
        self.gravity.reset();
    }

    pub fn reset(&mut self) {
        self.reset_density();
        self.reset_gravity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_density_clamped_and_recolored() {
        let mut fluid = FluidState::new(FluidSettings::default()).unwrap();
        fluid.set_density(5000.0);
        assert_eq!(fluid.density_value(), HONEY_DENSITY);
        assert_eq!(*fluid.color.get(), FluidColor::HONEY);

        fluid.set_density(100.0);
        assert_eq!(fluid.density_value(), GASOLINE_DENSITY);
        assert_eq!(*fluid.color.get(), FluidColor::GASOLINE);
    }

    #[test]
    fn test_color_listener_sees_updated_density() {
        let mut fluid = FluidState::new(FluidSettings::default()).unwrap();
        let colors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&colors);
        fluid.color.subscribe(move |new, _| sink.borrow_mut().push(*new));

        fluid.set_density(HONEY_DENSITY);
        fluid.set_density(HONEY_DENSITY);
        assert_eq!(*colors.borrow(), vec![FluidColor::HONEY]);
    }

    #[test]
    fn test_reset_restores_custom_values() {
        let mut fluid = FluidState::new(FluidSettings::default()).unwrap();
        fluid.set_custom_density(1700.0, FluidColor::new(113, 35, 136));
        fluid.set_custom_gravity(20.0);
        fluid.reset();
        assert_eq!(fluid.density_value(), WATER_DENSITY);
        assert_eq!(fluid.gravity_value(), EARTH_GRAVITY);
        assert_eq!(*fluid.color.get(), FluidColor::WATER);
    }

    #[test]
    fn test_invalid_settings() {
        let settings = FluidSettings {
            density: 2000.0,
            ..FluidSettings::default()
        };
        assert!(FluidState::new(settings).is_err());
    }
}
