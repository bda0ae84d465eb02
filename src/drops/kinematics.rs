use glam::DVec2;

use crate::drops::WaterDrop;

/// A body of fluid that drops can fall into, such as a tank
pub trait AbsorptionVolume {
    /// Whether a drop of `radius` at `position` has reached the fluid
    fn contains(&self, position: DVec2, radius: f64) -> bool;

    /// Add the drop's volume (m³)
    fn absorb(&mut self, volume: f64);
}

/// What happened to a drop during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Falling,
    /// Touched the ground; remove the drop
    Grounded,
    /// Fell into the receiver, which now holds its volume; remove the drop
    Absorbed,
}

impl DropOutcome {
    /// Whether the drop is still in flight
    pub fn is_falling(self) -> bool {
        self == DropOutcome::Falling
    }
}

/// Projectile motion for free drops
#[derive(Debug, Default, Clone, Copy)]
pub struct DropKinematics;

impl DropKinematics {
    pub fn new() -> Self {
        Self
    }

    /// Semi-implicit Euler step under `gravity`, then contact checks.
    ///
    /// Non-positive `dt` only runs the contact checks. A step that would
    /// produce non-finite state is skipped.
    pub fn step(
        &self,
        drop: &mut WaterDrop,
        dt: f64,
        gravity: f64,
        receiver: Option<&mut dyn AbsorptionVolume>,
    ) -> DropOutcome {
        if dt > 0.0 {
            let velocity = drop.velocity - DVec2::new(0.0, gravity * dt);
            let position = drop.position + velocity * dt;
            if velocity.is_finite() && position.is_finite() {
                drop.velocity = velocity;
                drop.position = position;
            } else {
                log::warn!("Skipping drop update at {:?}: non-finite result", drop.position);
            }
        }

        let radius = drop.radius();
        if let Some(receiver) = receiver {
            if receiver.contains(drop.position, radius) {
                receiver.absorb(drop.volume);
                return DropOutcome::Absorbed;
            }
        }
        if drop.position.y <= radius {
            return DropOutcome::Grounded;
        }
        DropOutcome::Falling
    }

    /// Step every drop and remove those that landed or were absorbed.
    /// Returns the number removed.
    pub fn step_all(
        &self,
        drops: &mut Vec<WaterDrop>,
        dt: f64,
        gravity: f64,
        mut receiver: Option<&mut dyn AbsorptionVolume>,
    ) -> usize {
        let before = drops.len();
        drops.retain_mut(|drop| {
            let receiver = receiver.as_mut().map(|r| &mut **r as &mut dyn AbsorptionVolume);
            self.step(drop, dt, gravity, receiver).is_falling()
        });
        before - drops.len()
    }
}
