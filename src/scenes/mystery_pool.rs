use serde::{Deserialize, Serialize};

use crate::constants::pool::{MYSTERY_COLORS, MYSTERY_DENSITIES, MYSTERY_GRAVITIES};
use crate::error::{check_index, SimResult};
use crate::fluid::{FluidColor, FluidSettings};
use crate::scenes::{PoolConfig, SquarePool};

/// Which property the student has to work out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MysteryQuantity {
    #[default]
    Density,
    Gravity,
}

/// Square pool with an unknown fluid density or gravity
#[derive(Debug)]
pub struct MysteryPool {
    pool: SquarePool,
    quantity: MysteryQuantity,
    density_choice: usize,
    gravity_choice: usize,
    /// Density and gravity to restore on leaving
    saved: Option<(f64, f64)>,
}

impl MysteryPool {
    pub fn new(config: &PoolConfig, fluid: FluidSettings) -> SimResult<Self> {
        Ok(Self {
            pool: SquarePool::new(config, fluid)?,
            quantity: MysteryQuantity::Density,
            density_choice: 0,
            gravity_choice: 0,
            saved: None,
        })
    }

    pub fn pool(&self) -> &SquarePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut SquarePool {
        &mut self.pool
    }

    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }

    pub fn quantity(&self) -> MysteryQuantity {
        self.quantity
    }

    /// Chosen index for the current mystery quantity
    pub fn choice(&self) -> usize {
        match self.quantity {
            MysteryQuantity::Density => self.density_choice,
            MysteryQuantity::Gravity => self.gravity_choice,
        }
    }

    /// Switch to the mystery scene, remembering the current fluid
    pub fn enter(&mut self) {
        if self.saved.is_none() {
            let fluid = &self.pool.fluid;
            self.saved = Some((fluid.density_value(), fluid.gravity_value()));
            log::debug!("Entering mystery pool, mystery {:?}", self.quantity);
        }
        self.apply_choice();
    }

    /// Leave the mystery scene and put the remembered fluid back
    pub fn leave(&mut self) {
        if let Some((density, gravity)) = self.saved.take() {
            self.pool.fluid.set_density(density);
            self.pool.fluid.set_gravity(gravity);
            log::debug!("Left mystery pool, restored density {} and gravity {}", density, gravity);
        }
    }

    /// Pick what is unknown; the other quantity returns to its default
    pub fn set_quantity(&mut self, quantity: MysteryQuantity) {
        self.quantity = quantity;
        match quantity {
            MysteryQuantity::Density => self.pool.fluid.reset_gravity(),
            MysteryQuantity::Gravity => self.pool.fluid.reset_density(),
        }
        if self.is_active() {
            self.apply_choice();
        }
    }

    /// Select one of the three mystery values for the current quantity
    pub fn set_choice(&mut self, index: usize) -> SimResult<()> {
        let len = match self.quantity {
            MysteryQuantity::Density => MYSTERY_DENSITIES.len(),
            MysteryQuantity::Gravity => MYSTERY_GRAVITIES.len(),
        };
        check_index(index, len)?;
        match self.quantity {
            MysteryQuantity::Density => self.density_choice = index,
            MysteryQuantity::Gravity => self.gravity_choice = index,
        }
        if self.is_active() {
            self.apply_choice();
        }
        Ok(())
    }

    fn apply_choice(&mut self) {
        match self.quantity {
            MysteryQuantity::Density => {
                let i = self.density_choice;
                self.pool
                    .fluid
                    .set_custom_density(MYSTERY_DENSITIES[i], FluidColor::from_array(MYSTERY_COLORS[i]));
            }
            MysteryQuantity::Gravity => {
                self.pool.fluid.set_custom_gravity(MYSTERY_GRAVITIES[self.gravity_choice]);
            }
        }
    }

    pub fn step(&mut self, dt: f64) {
        self.pool.step(dt);
    }

    pub fn pressure_at(&self, x: f64, y: f64) -> f64 {
        self.pool.pressure_at(x, y)
    }

    pub fn reset(&mut self) {
        let active = self.is_active();
        self.quantity = MysteryQuantity::Density;
        self.density_choice = 0;
        self.gravity_choice = 0;
        self.pool.reset();
        if active {
            self.apply_choice();
        }
    }
}
