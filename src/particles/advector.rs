use crate::particles::FlowParticle;
use crate::pipe::PipeGeometry;

/// Result of advancing one particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved,
    /// Reached the outlet; the particle should be destroyed
    Exited,
}

/// Moves flow particles downstream along a pipe
#[derive(Debug, Default, Clone, Copy)]
pub struct ParticleAdvector;

impl ParticleAdvector {
    pub fn new() -> Self {
        Self
    }

    /// Advance one particle by `dt` using the smoothed velocity at its position.
    ///
    /// Particles never move backwards. A particle whose next x would reach the
    /// outlet keeps its current x and is reported as exited.
    pub fn advance(&self, pipe: &PipeGeometry, particle: &mut FlowParticle, dt: f64) -> AdvanceOutcome {
        if dt.is_nan() || dt <= 0.0 {
            return AdvanceOutcome::Moved;
        }

        let y = particle.y(pipe);
        let vx = pipe.tweaked_vx(particle.x, y).max(0.0);
        let next_x = particle.x + vx * dt;

        if next_x.is_nan() {
            log::warn!("Skipping particle update at x={}: non-finite velocity", particle.x);
            return AdvanceOutcome::Moved;
        }
        if next_x >= pipe.max_x() {
            return AdvanceOutcome::Exited;
        }

        particle.x = next_x;
        AdvanceOutcome::Moved
    }

    /// Advance every particle and drop the ones that left the pipe.
    /// Returns the number removed.
    pub fn propagate(&self, pipe: &PipeGeometry, particles: &mut Vec<FlowParticle>, dt: f64) -> usize {
        let before = particles.len();
        particles.retain_mut(|particle| self.advance(pipe, particle, dt) == AdvanceOutcome::Moved);
        let removed = before - particles.len();
        if removed > 0 {
            log::trace!("{} particles left the pipe, {} remain", removed, particles.len());
        }
        removed
    }
}
