use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::chamber::{
    CHAMBER_HEIGHT, DEFAULT_HEIGHT, FULL_BLOCK_MASS, JITTER_TOLERANCE, LEFT_CHAMBER_WIDTH,
    LEFT_CHAMBER_X, LEFT_OPENING_WIDTH, MASSES, MASS_OFFSET, MASS_SEPARATION, MASS_SUBSTEPS,
    MAX_HEIGHT, OPENING_CAPTURE_TOLERANCE, PASSAGE_SIZE, RELAXATION_RATE, RIGHT_CHAMBER_WIDTH,
    RIGHT_CHAMBER_X, RIGHT_OPENING_WIDTH, STACK_DAMPING,
};
use crate::error::{check_index, invalid_config, require_positive, SimResult};
use crate::fluid::{submerged_pressure, FluidSettings, FluidState, PressureField};
use crate::time::DtJitterFilter;

/// Chamber pool screen settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChamberConfig {
    /// Masses available to drop into the left opening (kg)
    pub masses: Vec<f64>,
    pub substeps: u32,
    /// Velocity damping of the stacked load (1/s)
    pub damping: f64,
    /// Decay rate of the displacement without load (1/s)
    pub relaxation_rate: f64,
    pub jitter_tolerance: f64,
}

impl Default for ChamberConfig {
    fn default() -> Self {
        Self {
            masses: MASSES.to_vec(),
            substeps: MASS_SUBSTEPS,
            damping: STACK_DAMPING,
            relaxation_rate: RELAXATION_RATE,
            jitter_tolerance: JITTER_TOLERANCE,
        }
    }
}

impl ChamberConfig {
    pub fn validate(&self) -> SimResult<()> {
        if let Some(mass) = self.masses.iter().find(|m| !(m.is_finite() && **m > 0.0)) {
            return Err(invalid_config("chamber.masses", format!("{} is not a positive mass", mass)));
        }
        if self.substeps == 0 {
            return Err(invalid_config("chamber.substeps", "must be at least 1"));
        }
        require_positive("chamber.relaxation_rate", self.relaxation_rate)?;
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(invalid_config("chamber.damping", "must be finite and non-negative"));
        }
        if !(self.jitter_tolerance.is_finite() && self.jitter_tolerance >= 0.0) {
            return Err(invalid_config("chamber.jitter_tolerance", "must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Axis-aligned region of the apparatus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolRegion {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl PoolRegion {
    /// Strict containment
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.x1 && x < self.x2 && y > self.y1 && y < self.y2
    }

    pub fn centre_x(&self) -> f64 {
        (self.x1 + self.x2) / 2.0
    }
}

/// Two chambers below ground, joined by a passage, each open to the air
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChamberGeometry {
    pub left_chamber: PoolRegion,
    pub right_chamber: PoolRegion,
    pub passage: PoolRegion,
    pub left_opening: PoolRegion,
    pub right_opening: PoolRegion,
}

impl Default for ChamberGeometry {
    fn default() -> Self {
        let floor = -MAX_HEIGHT;
        let ceiling = floor + CHAMBER_HEIGHT;
        let left_centre = LEFT_CHAMBER_X + LEFT_CHAMBER_WIDTH / 2.0;
        let right_centre = RIGHT_CHAMBER_X + RIGHT_CHAMBER_WIDTH / 2.0;
        Self {
            left_chamber: PoolRegion {
                x1: LEFT_CHAMBER_X,
                y1: floor,
                x2: LEFT_CHAMBER_X + LEFT_CHAMBER_WIDTH,
                y2: ceiling,
            },
            right_chamber: PoolRegion {
                x1: RIGHT_CHAMBER_X,
                y1: floor,
                x2: RIGHT_CHAMBER_X + RIGHT_CHAMBER_WIDTH,
                y2: ceiling,
            },
            passage: PoolRegion {
                x1: LEFT_CHAMBER_X + LEFT_CHAMBER_WIDTH,
                y1: floor + PASSAGE_SIZE / 2.0,
                x2: RIGHT_CHAMBER_X,
                y2: floor + PASSAGE_SIZE * 3.0 / 2.0,
            },
            left_opening: PoolRegion {
                x1: left_centre - LEFT_OPENING_WIDTH / 2.0,
                y1: ceiling,
                x2: left_centre + LEFT_OPENING_WIDTH / 2.0,
                y2: 0.0,
            },
            right_opening: PoolRegion {
                x1: right_centre - RIGHT_OPENING_WIDTH / 2.0,
                y1: ceiling,
                x2: right_centre + RIGHT_OPENING_WIDTH / 2.0,
                y2: 0.0,
            },
        }
    }
}

impl ChamberGeometry {
    pub fn regions(&self) -> [PoolRegion; 5] {
        [
            self.left_chamber,
            self.right_chamber,
            self.passage,
            self.left_opening,
            self.right_opening,
        ]
    }

    /// Right opening width over left opening width. The length ratio is used
    /// rather than the area ratio so the right surface visibly moves.
    pub fn length_ratio(&self) -> f64 {
        (self.right_opening.x2 - self.right_opening.x1) / (self.left_opening.x2 - self.left_opening.x1)
    }

    /// Surface height with no load
    pub fn rest_surface_y(&self) -> f64 {
        -MAX_HEIGHT + DEFAULT_HEIGHT
    }

    /// Deepest the left surface may be pushed: down to the chamber ceiling
    pub fn max_displacement(&self) -> f64 {
        self.rest_surface_y() - self.left_opening.y1
    }
}

/// What a mass is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassState {
    /// On the ground, not moving
    Resting,
    Dragged,
    Falling,
    /// Riding on the left water surface
    Stacked,
}

/// A block the user can drop into the left opening
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mass {
    pub mass: f64,
    pub width: f64,
    pub height: f64,
    /// Centre of the block
    pub position: DVec2,
    /// Downward speed (m/s)
    pub velocity: f64,
    pub state: MassState,
    initial_position: DVec2,
}

impl Mass {
    fn new(mass: f64, centre_x: f64) -> Self {
        let height = PASSAGE_SIZE * (mass / FULL_BLOCK_MASS).min(1.0);
        let position = DVec2::new(centre_x, height / 2.0);
        Self {
            mass,
            width: PASSAGE_SIZE,
            height,
            position,
            velocity: 0.0,
            state: MassState::Resting,
            initial_position: position,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.position.y - self.height / 2.0
    }

    pub fn top(&self) -> f64 {
        self.position.y + self.height / 2.0
    }

    pub fn contains(&self, point: DVec2) -> bool {
        (point.x - self.position.x).abs() <= self.width / 2.0
            && (point.y - self.position.y).abs() <= self.height / 2.0
    }

    fn reset(&mut self) {
        self.position = self.initial_position;
        self.velocity = 0.0;
        self.state = MassState::Resting;
    }
}

/// Chamber pool screen: masses loaded onto the narrow side of a U-shaped pool
#[derive(Debug)]
pub struct ChamberPoolScene {
    pub fluid: FluidState,
    pressure_field: PressureField,
    geometry: ChamberGeometry,
    masses: Vec<Mass>,
    /// Indices into `masses`, bottom of the stack first
    stack: Vec<usize>,
    stack_mass: f64,
    /// Depth of the left surface below its rest height (m)
    left_displacement: f64,
    jitter: DtJitterFilter,
    substeps: u32,
    damping: f64,
    relaxation_rate: f64,
    playing: bool,
}

impl ChamberPoolScene {
    pub fn new(config: &ChamberConfig, fluid: FluidSettings) -> SimResult<Self> {
        config.validate()?;
        let masses = config
            .masses
            .iter()
            .enumerate()
            .map(|(i, mass)| Mass::new(*mass, MASS_OFFSET + i as f64 * (PASSAGE_SIZE + MASS_SEPARATION)))
            .collect();
        Ok(Self {
            fluid: FluidState::new(fluid)?,
            pressure_field: PressureField::default(),
            geometry: ChamberGeometry::default(),
            masses,
            stack: Vec::new(),
            stack_mass: 0.0,
            left_displacement: 0.0,
            jitter: DtJitterFilter::new(config.jitter_tolerance),
            substeps: config.substeps,
            damping: config.damping,
            relaxation_rate: config.relaxation_rate,
            playing: true,
        })
    }

    pub fn geometry(&self) -> &ChamberGeometry {
        &self.geometry
    }

    pub fn masses(&self) -> &[Mass] {
        &self.masses
    }

    /// Stacked mass indices, bottom first
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    /// Total stacked mass, maintained on every add and remove (kg)
    pub fn stack_mass(&self) -> f64 {
        self.stack_mass
    }

    pub fn left_displacement(&self) -> f64 {
        self.left_displacement
    }

    pub fn left_surface_y(&self) -> f64 {
        self.geometry.rest_surface_y() - self.left_displacement
    }

    pub fn right_surface_y(&self) -> f64 {
        self.geometry.rest_surface_y() + self.left_displacement / self.geometry.length_ratio()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Topmost mass under `(x, y)`
    pub fn mass_at(&self, x: f64, y: f64) -> Option<usize> {
        let point = DVec2::new(x, y);
        self.masses
            .iter()
            .enumerate()
            .filter(|(_, mass)| mass.contains(point))
            .max_by(|(_, a), (_, b)| a.position.y.total_cmp(&b.position.y))
            .map(|(i, _)| i)
    }

    /// Put a mass on top of the stack; every stacked mass then moves at the
    /// fastest stacked mass's speed
    pub fn add_to_stack(&mut self, index: usize) -> SimResult<()> {
        check_index(index, self.masses.len())?;
        self.push_stack(index);
        Ok(())
    }

    fn push_stack(&mut self, index: usize) {
        if self.stack.contains(&index) {
            return;
        }
        let top = self.stack_top_y();
        let mass = &mut self.masses[index];
        mass.state = MassState::Stacked;
        mass.position = DVec2::new(self.geometry.left_opening.centre_x(), top + mass.height / 2.0);
        self.stack.push(index);
        self.stack_mass += mass.mass;

        let max_velocity = self
            .stack
            .iter()
            .map(|&i| self.masses[i].velocity)
            .fold(0.0, f64::max);
        for &i in &self.stack {
            self.masses[i].velocity = max_velocity;
        }
        log::debug!("Mass {} stacked, stack now {} kg", index, self.stack_mass);
    }

    /// Take a mass off the stack; masses above it settle down onto the rest
    pub fn remove_from_stack(&mut self, index: usize) -> SimResult<()> {
        check_index(index, self.masses.len())?;
        if let Some(slot) = self.stack.iter().position(|&i| i == index) {
            self.stack.remove(slot);
            self.stack_mass -= self.masses[index].mass;
            if self.stack.is_empty() {
                self.stack_mass = 0.0;
            }
            self.place_stack();
            log::debug!("Mass {} unstacked, stack now {} kg", index, self.stack_mass);
        }
        Ok(())
    }

    /// Recompute the stacked mass from the stack itself
    pub fn reconcile_stack_mass(&mut self) -> f64 {
        let total: f64 = self.stack.iter().map(|&i| self.masses[i].mass).sum();
        if (total - self.stack_mass).abs() > 1e-9 {
            log::warn!("Stack mass drifted: tracked {} kg, actual {} kg", self.stack_mass, total);
        }
        self.stack_mass = total;
        total
    }

    /// Pick a mass up, taking it off the stack if it was there
    pub fn grab_mass(&mut self, index: usize) -> SimResult<()> {
        self.remove_from_stack(index)?;
        let mass = &mut self.masses[index];
        mass.state = MassState::Dragged;
        mass.velocity = 0.0;
        Ok(())
    }

    /// Move a dragged mass; it cannot be pushed into the ground
    pub fn drag_mass_to(&mut self, index: usize, x: f64, y: f64) -> SimResult<()> {
        check_index(index, self.masses.len())?;
        let mass = &mut self.masses[index];
        if mass.state == MassState::Dragged && x.is_finite() && y.is_finite() {
            mass.position = DVec2::new(x, y.max(mass.height / 2.0));
        }
        Ok(())
    }

    /// Let go of a dragged mass so it falls
    pub fn release_mass(&mut self, index: usize) -> SimResult<()> {
        check_index(index, self.masses.len())?;
        let mass = &mut self.masses[index];
        if mass.state == MassState::Dragged {
            mass.state = MassState::Falling;
            mass.velocity = 0.0;
        }
        Ok(())
    }

    fn stack_top_y(&self) -> f64 {
        self.stack
            .last()
            .map_or(self.left_surface_y(), |&i| self.masses[i].top())
    }

    /// Whether a falling block fits down the left opening. Blocks within the
    /// capture tolerance of the centre line are taken in; anything further
    /// out rests on the ground beside it.
    fn fits_left_opening(&self, mass: &Mass) -> bool {
        let opening = &self.geometry.left_opening;
        let slack = ((opening.x2 - opening.x1) - mass.width).max(0.0) / 2.0;
        (mass.position.x - opening.centre_x()).abs() <= slack + OPENING_CAPTURE_TOLERANCE
    }

    /// Lay the stacked blocks on the left surface, bottom first
    fn place_stack(&mut self) {
        let mut bottom = self.left_surface_y();
        let centre_x = self.geometry.left_opening.centre_x();
        for &i in &self.stack {
            let mass = &mut self.masses[i];
            mass.position = DVec2::new(centre_x, bottom + mass.height / 2.0);
            bottom += mass.height;
        }
    }

    /// Advance the scene by one frame
    pub fn step(&mut self, dt: f64) {
        if !self.playing || dt.is_nan() || dt <= 0.0 {
            return;
        }
        let dt = self.jitter.filter(dt);
        let h = dt / self.substeps as f64;
        let gravity = self.fluid.gravity_value();

        for _ in 0..self.substeps {
            self.step_falling_masses(h, gravity);
            self.step_stack(h, gravity);
        }
    }

    fn step_falling_masses(&mut self, h: f64, gravity: f64) {
        for index in 0..self.masses.len() {
            if self.masses[index].state != MassState::Falling {
                continue;
            }
            let over_opening = self.fits_left_opening(&self.masses[index]);
            let landing = if over_opening { self.stack_top_y() } else { 0.0 };
            let centre_x = self.geometry.left_opening.centre_x();

            let mass = &mut self.masses[index];
            if over_opening {
                // Captured blocks fall down the shaft centre line
                mass.position.x = centre_x;
            }
            let velocity = mass.velocity + gravity * h;
            let y = mass.position.y - velocity * h;
            if !(velocity.is_finite() && y.is_finite()) {
                log::warn!("Skipping mass {} update: non-finite result", index);
                continue;
            }
            mass.velocity = velocity;
            mass.position.y = y;

            if mass.bottom() <= landing {
                if over_opening {
                    self.push_stack(index);
                } else {
                    mass.position.y = mass.height / 2.0;
                    mass.velocity = 0.0;
                    mass.state = MassState::Resting;
                }
            }
        }
    }

    fn step_stack(&mut self, h: f64, gravity: f64) {
        if self.stack.is_empty() {
            self.left_displacement *= (-self.relaxation_rate * h).exp();
            if !(self.left_displacement > 0.0) {
                self.left_displacement = 0.0;
            }
            return;
        }

        let density = self.fluid.density_value();
        let ratio = self.geometry.length_ratio();
        let area = self.geometry.left_opening.x2 - self.geometry.left_opening.x1;
        let d = self.left_displacement;
        let weight = self.stack_mass * gravity;
        let buoyant = density * gravity * area * (d + d / ratio);

        let velocity = self.masses[self.stack[0]].velocity;
        let acceleration = (weight - buoyant) / self.stack_mass - self.damping * velocity;
        let mut velocity = velocity + acceleration * h;
        let mut d = d + velocity * h;

        if !(velocity.is_finite() && d.is_finite()) {
            log::warn!("Skipping stack update: non-finite result");
            return;
        }
        let max = self.geometry.max_displacement();
        if d <= 0.0 || d >= max {
            d = d.clamp(0.0, max);
            velocity = 0.0;
        }

        self.left_displacement = d;
        for &i in &self.stack {
            self.masses[i].velocity = velocity;
        }
        self.place_stack();
    }

    /// Whether `(x, y)` lies in any part of the pool
    pub fn is_point_inside_pool(&self, x: f64, y: f64) -> bool {
        self.geometry.regions().iter().any(|region| region.contains(x, y))
    }

    /// Depth of `(x, y)` below the effective free surface. Above the loaded
    /// left surface there is no water; everywhere else the right surface sets
    /// the head.
    pub fn water_height_above(&self, x: f64, y: f64) -> f64 {
        let opening = &self.geometry.left_opening;
        if x > opening.x1 && x < opening.x2 && y > self.left_surface_y() {
            0.0
        } else {
            self.right_surface_y() - y
        }
    }

    /// Pressure at `(x, y)`: air above ground, hydrostatic in the pool,
    /// zero in solid ground
    pub fn pressure_at(&self, x: f64, y: f64) -> f64 {
        if y >= 0.0 {
            return self.pressure_field.air_pressure(y);
        }
        if !self.is_point_inside_pool(x, y) {
            return 0.0;
        }
        submerged_pressure(
            self.pressure_field.air_pressure(0.0),
            self.water_height_above(x, y),
            self.fluid.density_value(),
            self.fluid.gravity_value(),
            None,
        )
    }

    pub fn reset(&mut self) {
        self.fluid.reset();
        self.stack.clear();
        self.stack_mass = 0.0;
        self.left_displacement = 0.0;
        self.masses.iter_mut().for_each(Mass::reset);
        self.jitter.reset();
        self.playing = true;
        log::debug!("Chamber pool scene reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> ChamberPoolScene {
        ChamberPoolScene::new(&ChamberConfig::default(), FluidSettings::default()).unwrap()
    }

    #[test]
    fn test_geometry_matches_layout() {
        let geometry = ChamberGeometry::default();
        assert!((geometry.length_ratio() - 4.6).abs() < 1e-12);
        assert!((geometry.left_opening.x1 - 2.7).abs() < 1e-12);
        assert!((geometry.right_opening.x1 - 5.67).abs() < 1e-12);
        assert!((geometry.rest_surface_y() + 0.7).abs() < 1e-12);
        assert!((geometry.max_displacement() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stacking_equalizes_velocity() {
        let mut scene = scene();
        scene.masses[0].velocity = 0.4;
        scene.add_to_stack(0).unwrap();
        scene.masses[1].velocity = 1.3;
        scene.add_to_stack(1).unwrap();
        assert_eq!(scene.masses()[0].velocity, 1.3);
        assert_eq!(scene.masses()[1].velocity, 1.3);
        assert_eq!(scene.stack_mass(), 750.0);
        assert_eq!(scene.reconcile_stack_mass(), 750.0);
    }

    #[test]
    fn test_remove_updates_stack_mass() {
        let mut scene = scene();
        scene.add_to_stack(0).unwrap();
        scene.add_to_stack(2).unwrap();
        scene.grab_mass(0).unwrap();
        assert_eq!(scene.stack(), &[2]);
        assert_eq!(scene.stack_mass(), 250.0);
        assert_eq!(scene.masses()[0].state, MassState::Dragged);
        // The remaining block drops onto the surface
        assert!((scene.masses()[2].bottom() - scene.left_surface_y()).abs() < 1e-12);
        assert!(scene.add_to_stack(9).is_err());
    }

    #[test]
    fn test_load_settles_at_balance() {
        let mut scene = scene();
        scene.add_to_stack(0).unwrap();
        for _ in 0..600 {
            scene.step(1.0 / 60.0);
        }
        let ratio = scene.geometry().length_ratio();
        let expected = 500.0 / (1000.0 * LEFT_OPENING_WIDTH * (1.0 + 1.0 / ratio));
        assert!((scene.left_displacement() - expected).abs() < 1e-3);
        assert!(scene.right_surface_y() > scene.geometry().rest_surface_y());
    }

    #[test]
    fn test_heavy_load_clamped_to_opening() {
        let mut scene = scene();
        for i in 0..3 {
            scene.add_to_stack(i).unwrap();
        }
        for _ in 0..600 {
            scene.step(1.0 / 60.0);
        }
        assert!((scene.left_displacement() - scene.geometry().max_displacement()).abs() < 1e-9);
    }

    #[test]
    fn test_displacement_relaxes_without_load() {
        let mut scene = scene();
        scene.add_to_stack(1).unwrap();
        for _ in 0..120 {
            scene.step(1.0 / 60.0);
        }
        assert!(scene.left_displacement() > 0.1);
        scene.grab_mass(1).unwrap();
        for _ in 0..120 {
            scene.step(1.0 / 60.0);
        }
        assert!(scene.left_displacement() < 1e-4);
    }

    #[test]
    fn test_dropped_mass_joins_stack() {
        let mut scene = scene();
        let x = scene.geometry().left_opening.centre_x();
        scene.grab_mass(1).unwrap();
        scene.drag_mass_to(1, x, 1.0).unwrap();
        scene.release_mass(1).unwrap();
        for _ in 0..120 {
            scene.step(1.0 / 60.0);
        }
        assert_eq!(scene.masses()[1].state, MassState::Stacked);
        assert_eq!(scene.stack_mass(), 250.0);
    }

    #[test]
    fn test_mass_dropped_elsewhere_lands_on_ground() {
        let mut scene = scene();
        scene.grab_mass(2).unwrap();
        scene.drag_mass_to(2, 0.5, 2.0).unwrap();
        scene.release_mass(2).unwrap();
        for _ in 0..120 {
            scene.step(1.0 / 60.0);
        }
        let mass = scene.masses()[2];
        assert_eq!(mass.state, MassState::Resting);
        assert!((mass.bottom()).abs() < 1e-12);
    }

    #[test]
    fn test_block_on_opening_edge_stays_out() {
        let mut scene = scene();
        let opening = scene.geometry().left_opening;
        scene.grab_mass(1).unwrap();
        scene.drag_mass_to(1, opening.x1 + 0.05, 1.0).unwrap();
        scene.release_mass(1).unwrap();
        for _ in 0..120 {
            scene.step(1.0 / 60.0);
        }
        let mass = scene.masses()[1];
        assert_eq!(mass.state, MassState::Resting);
        assert!(mass.bottom().abs() < 1e-12);
        assert!(scene.stack().is_empty());
    }

    #[test]
    fn test_slightly_off_centre_block_is_centred() {
        let mut scene = scene();
        let centre = scene.geometry().left_opening.centre_x();
        scene.grab_mass(2).unwrap();
        scene.drag_mass_to(2, centre + 0.08, 1.0).unwrap();
        scene.release_mass(2).unwrap();
        scene.step(1.0 / 60.0);
        assert_eq!(scene.masses()[2].position.x, centre);
        for _ in 0..120 {
            scene.step(1.0 / 60.0);
        }
        assert_eq!(scene.stack(), &[2]);
    }

    #[test]
    fn test_zero_dt_is_idempotent() {
        let mut scene = scene();
        scene.add_to_stack(0).unwrap();
        scene.step(1.0 / 60.0);
        let masses = scene.masses().to_vec();
        let displacement = scene.left_displacement();
        scene.step(0.0);
        assert_eq!(scene.masses(), masses.as_slice());
        assert_eq!(scene.left_displacement(), displacement);
    }

    #[test]
    fn test_water_height_and_pressure() {
        let scene = scene();
        let x = scene.geometry().left_opening.centre_x();
        assert_eq!(scene.water_height_above(x, -0.5), 0.0);
        assert!((scene.water_height_above(3.0, -2.0) - 1.3).abs() < 1e-12);
        assert!(scene.is_point_inside_pool(3.0, -2.0));
        assert!(!scene.is_point_inside_pool(0.5, -2.0));
        assert_eq!(scene.pressure_at(0.5, -2.0), 0.0);
        let expected = PressureField::default().air_pressure(0.0) + 1000.0 * 9.8 * 1.3;
        assert!((scene.pressure_at(3.0, -2.0) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_reset_restores_masses() {
        let mut scene = scene();
        scene.add_to_stack(0).unwrap();
        scene.step(0.1);
        scene.reset();
        assert!(scene.stack().is_empty());
        assert_eq!(scene.stack_mass(), 0.0);
        assert_eq!(scene.left_displacement(), 0.0);
        assert!(scene.masses().iter().all(|m| m.state == MassState::Resting));
    }
}
