use std::cell::OnceCell;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::flow::{
    DEFAULT_BOTTOM_Y, DEFAULT_CONTROL_XS, DEFAULT_FLOW_RATE, DEFAULT_TOP_Y, LITERS_PER_CUBIC_METER,
    MAX_FLOW_RATE, MIN_CONTROL_GAP, MIN_CROSS_SECTION, MIN_FLOW_RATE, VELOCITY_SMOOTHING_HALF_WIDTH,
};
use crate::error::{check_index, invalid_config, invalid_geometry, SimResult};
use crate::pipe::{ControlPoint, CrossSection, CubicSpline, PipeEnd, PipeSide};

/// Initial pipe shape and flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    /// Shared x of each control-point pair, strictly increasing
    pub xs: Vec<f64>,
    /// Top rail heights, one per x
    pub top: Vec<f64>,
    /// Bottom rail heights, one per x
    pub bottom: Vec<f64>,
    /// Volumetric flow rate (L/s)
    pub flow_rate: f64,
    pub min_flow_rate: f64,
    pub max_flow_rate: f64,
}

impl Default for PipeConfig {
    fn default() -> Self {
        let n = DEFAULT_CONTROL_XS.len();
        Self {
            xs: DEFAULT_CONTROL_XS.to_vec(),
            top: vec![DEFAULT_TOP_Y; n],
            bottom: vec![DEFAULT_BOTTOM_Y; n],
            flow_rate: DEFAULT_FLOW_RATE,
            min_flow_rate: MIN_FLOW_RATE,
            max_flow_rate: MAX_FLOW_RATE,
        }
    }
}

impl PipeConfig {
    /// Straight pipe of constant height between `x_min` and `x_max`
    pub fn straight(x_min: f64, x_max: f64, y_bottom: f64, height: f64, pairs: usize, flow_rate: f64) -> Self {
        let pairs = pairs.max(2);
        let xs: Vec<f64> = (0..pairs)
            .map(|i| x_min + (x_max - x_min) * i as f64 / (pairs - 1) as f64)
            .collect();
        Self {
            top: vec![y_bottom + height; pairs],
            bottom: vec![y_bottom; pairs],
            xs,
            flow_rate,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        let n = self.xs.len();
        if n < 2 {
            return Err(invalid_geometry(format!("need at least 2 control point pairs, got {}", n)));
        }
        if self.top.len() != n || self.bottom.len() != n {
            return Err(invalid_geometry(format!(
                "rail lengths differ: {} xs, {} top, {} bottom",
                n,
                self.top.len(),
                self.bottom.len()
            )));
        }
        if self.xs.iter().chain(&self.top).chain(&self.bottom).any(|v| !v.is_finite()) {
            return Err(invalid_geometry("control point coordinates must be finite"));
        }
        if self.xs.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(invalid_geometry("control point x positions must strictly increase"));
        }
        if let Some(i) = (0..n).find(|&i| self.top[i] - self.bottom[i] < MIN_CROSS_SECTION) {
            return Err(invalid_geometry(format!(
                "top rail must sit at least {} above the bottom rail at pair {}",
                MIN_CROSS_SECTION, i
            )));
        }
        if !(self.min_flow_rate > 0.0 && self.min_flow_rate <= self.max_flow_rate) {
            return Err(invalid_config("pipe.min_flow_rate", "must be positive and <= max_flow_rate"));
        }
        if !(self.min_flow_rate..=self.max_flow_rate).contains(&self.flow_rate) {
            return Err(invalid_config("pipe.flow_rate", format!("{} outside range", self.flow_rate)));
        }
        Ok(())
    }
}

/// Fitted rails; present only while the geometry is clean
#[derive(Debug, Clone)]
struct RailSplines {
    top: CubicSpline,
    bottom: CubicSpline,
}

/// Deformable pipe with continuity-law flow.
///
/// Mutating a control point discards the fitted rails (Dirty); the next
/// geometric query refits them (Clean). Queries only need `&self`.
#[derive(Debug, Clone)]
pub struct PipeGeometry {
    top: Vec<ControlPoint>,
    bottom: Vec<ControlPoint>,
    initial_top: Vec<ControlPoint>,
    initial_bottom: Vec<ControlPoint>,
    flow_rate: f64,
    initial_flow_rate: f64,
    flow_range: (f64, f64),
    rails: OnceCell<RailSplines>,
}

impl PipeGeometry {
    pub fn new(config: &PipeConfig) -> SimResult<Self> {
        config.validate()?;
        let top: Vec<ControlPoint> = config
            .xs
            .iter()
            .zip(&config.top)
            .map(|(x, y)| ControlPoint::new(*x, *y))
            .collect();
        let bottom: Vec<ControlPoint> = config
            .xs
            .iter()
            .zip(&config.bottom)
            .map(|(x, y)| ControlPoint::new(*x, *y))
            .collect();

        Ok(Self {
            initial_top: top.clone(),
            initial_bottom: bottom.clone(),
            top,
            bottom,
            flow_rate: config.flow_rate,
            initial_flow_rate: config.flow_rate,
            flow_range: (config.min_flow_rate, config.max_flow_rate),
            rails: OnceCell::new(),
        })
    }

    pub fn control_points(&self, side: PipeSide) -> &[ControlPoint] {
        match side {
            PipeSide::Top => &self.top,
            PipeSide::Bottom => &self.bottom,
        }
    }

    /// Number of top/bottom pairs
    pub fn pair_count(&self) -> usize {
        self.top.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.rails.get().is_none()
    }

    /// Move one control point vertically. The pair keeps at least the minimum
    /// cross-section between its rails; returns the height actually applied.
    pub fn set_control_point_y(&mut self, side: PipeSide, index: usize, y: f64) -> SimResult<f64> {
        check_index(index, self.pair_count())?;
        if !y.is_finite() {
            return Err(invalid_geometry("control point height must be finite"));
        }
        let applied = match side {
            PipeSide::Top => {
                let y = y.max(self.bottom[index].y + MIN_CROSS_SECTION);
                self.top[index].y = y;
                y
            }
            PipeSide::Bottom => {
                let y = y.min(self.top[index].y - MIN_CROSS_SECTION);
                self.bottom[index].y = y;
                y
            }
        };
        self.mark_dirty();
        Ok(applied)
    }

    /// Slide an end pair horizontally, never past its neighbour.
    /// Returns the x actually applied.
    pub fn set_end_x(&mut self, end: PipeEnd, x: f64) -> SimResult<f64> {
        if !x.is_finite() {
            return Err(invalid_geometry("control point x must be finite"));
        }
        let last = self.pair_count() - 1;
        let (index, applied) = match end {
            PipeEnd::Inlet => (0, x.min(self.top[1].x - MIN_CONTROL_GAP)),
            PipeEnd::Outlet => (last, x.max(self.top[last - 1].x + MIN_CONTROL_GAP)),
        };
        self.top[index].x = applied;
        self.bottom[index].x = applied;
        self.mark_dirty();
        Ok(applied)
    }

    fn mark_dirty(&mut self) {
        self.rails.take();
    }

    fn rails(&self) -> &RailSplines {
        self.rails.get_or_init(|| {
            let xs: Vec<f64> = self.top.iter().map(|p| p.x).collect();
            let top_ys: Vec<f64> = self.top.iter().map(|p| p.y).collect();
            let bottom_ys: Vec<f64> = self.bottom.iter().map(|p| p.y).collect();
            log::trace!("Refitting pipe rails through {} control point pairs", xs.len());
            RailSplines {
                top: CubicSpline::fit(&xs, &top_ys),
                bottom: CubicSpline::fit(&xs, &bottom_ys),
            }
        })
    }

    /// Inlet x
    pub fn min_x(&self) -> f64 {
        self.top[0].x
    }

    /// Outlet x
    pub fn max_x(&self) -> f64 {
        self.top[self.top.len() - 1].x
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }

    /// Rails at `x`, or `None` outside the pipe
    pub fn cross_section(&self, x: f64) -> Option<CrossSection> {
        if !self.contains_x(x) {
            return None;
        }
        Some(self.cross_section_clamped(x))
    }

    fn cross_section_clamped(&self, x: f64) -> CrossSection {
        let rails = self.rails();
        CrossSection {
            x,
            y_top: rails.top.value(x),
            y_bottom: rails.bottom.value(x),
        }
    }

    /// Pipe height at `x`, never below the minimum cross-section
    pub fn width(&self, x: f64) -> f64 {
        let section = self.cross_section_clamped(x);
        let width = section.height();
        if width.is_finite() {
            width.max(MIN_CROSS_SECTION)
        } else {
            MIN_CROSS_SECTION
        }
    }

    /// Volumetric flow rate (L/s)
    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    /// Set the flow rate within its range; returns the value applied
    pub fn set_flow_rate(&mut self, flow_rate: f64) -> f64 {
        if flow_rate.is_finite() {
            self.flow_rate = flow_rate.clamp(self.flow_range.0, self.flow_range.1);
        }
        self.flow_rate
    }

    /// Flow speed at the inlet (m/s), per metre of pipe depth
    pub fn inlet_speed(&self) -> f64 {
        self.flow_rate / LITERS_PER_CUBIC_METER / self.width(self.min_x())
    }

    /// Set the flow rate that produces `speed` at the inlet
    pub fn set_inlet_speed(&mut self, speed: f64) -> f64 {
        let flow_rate = speed * self.width(self.min_x()) * LITERS_PER_CUBIC_METER;
        self.set_flow_rate(flow_rate);
        self.inlet_speed()
    }

    /// Continuity: `v(x) = v_inlet * width_inlet / width(x)`
    pub fn speed(&self, x: f64) -> f64 {
        self.inlet_speed() * self.width(self.min_x()) / self.width(x)
    }

    /// Speed smoothed with a 1-2-1 window so particles do not jerk at sharp bends
    pub fn tweaked_speed(&self, x: f64) -> f64 {
        let h = VELOCITY_SMOOTHING_HALF_WIDTH;
        let left = (x - h).max(self.min_x());
        let right = (x + h).min(self.max_x());
        (self.speed(left) + 2.0 * self.speed(x) + self.speed(right)) / 4.0
    }

    /// Unit vector along the flow at `(x, y)`, blending the rail slopes by
    /// the point's fraction across the section
    pub fn flow_direction(&self, x: f64, y: f64) -> DVec2 {
        let rails = self.rails();
        let section = self.cross_section_clamped(x);
        let fraction = section.fraction_at(y).clamp(0.0, 1.0);
        let slope = rails.bottom.slope(x) + (rails.top.slope(x) - rails.bottom.slope(x)) * fraction;
        let direction = DVec2::new(1.0, slope);
        if direction.is_finite() {
            direction.normalize()
        } else {
            DVec2::X
        }
    }

    /// Flow velocity at `(x, y)`
    pub fn velocity(&self, x: f64, y: f64) -> DVec2 {
        self.flow_direction(x, y) * self.speed(x)
    }

    /// Smoothed flow velocity at `(x, y)`
    pub fn tweaked_velocity(&self, x: f64, y: f64) -> DVec2 {
        self.flow_direction(x, y) * self.tweaked_speed(x)
    }

    /// Horizontal component of the smoothed velocity
    pub fn tweaked_vx(&self, x: f64, y: f64) -> f64 {
        self.tweaked_velocity(x, y).x
    }

    /// Evenly spaced cross-sections from inlet to outlet, for drawing
    pub fn sample_outline(&self, samples: usize) -> Vec<CrossSection> {
        let samples = samples.max(2);
        let span = self.max_x() - self.min_x();
        (0..samples)
            .map(|i| self.cross_section_clamped(self.min_x() + span * i as f64 / (samples - 1) as f64))
            .collect()
    }

    /// Restore the initial control points and flow rate
    pub fn reset(&mut self) {
        self.top.clone_from(&self.initial_top);
        self.bottom.clone_from(&self.initial_bottom);
        self.flow_rate = self.initial_flow_rate;
        self.mark_dirty();
    }
}
