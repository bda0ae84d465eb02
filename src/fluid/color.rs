use serde::{Deserialize, Serialize};

use crate::constants::fluid::{GASOLINE_DENSITY, HONEY_DENSITY, WATER_DENSITY};

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FluidColor {
    pub const GASOLINE: FluidColor = FluidColor::new(149, 142, 139);
    pub const WATER: FluidColor = FluidColor::new(20, 244, 255);
    pub const HONEY: FluidColor = FluidColor::new(255, 191, 0);

    /// Flow particle colour
    pub const RED: FluidColor = FluidColor::new(255, 0, 0);
    /// Grid particle colour
    pub const BLACK: FluidColor = FluidColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    /// Per-channel linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, other: FluidColor, t: f64) -> FluidColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        FluidColor::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

/// Colour of a fluid of the given density.
///
/// Gasoline grey at the light end, water cyan at 1000 kg/m³, honey amber at
/// the heavy end; densities outside the range take the end colour.
pub fn fluid_color_for_density(density: f64) -> FluidColor {
    if density < WATER_DENSITY {
        let t = (density - GASOLINE_DENSITY) / (WATER_DENSITY - GASOLINE_DENSITY);
        FluidColor::GASOLINE.lerp(FluidColor::WATER, t)
    } else {
        let t = (density - WATER_DENSITY) / (HONEY_DENSITY - WATER_DENSITY);
        FluidColor::WATER.lerp(FluidColor::HONEY, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_colors() {
        assert_eq!(fluid_color_for_density(GASOLINE_DENSITY), FluidColor::GASOLINE);
        assert_eq!(fluid_color_for_density(WATER_DENSITY), FluidColor::WATER);
        assert_eq!(fluid_color_for_density(HONEY_DENSITY), FluidColor::HONEY);
        assert_eq!(fluid_color_for_density(5000.0), FluidColor::HONEY);
    }

    #[test]
    fn test_midpoint_color() {
        let mid = fluid_color_for_density(850.0);
        assert_eq!(mid, FluidColor::new(85, 193, 197));
    }
}
