//! Flow tracer particles
//!
//! Particles enter at the pipe inlet, ride the smoothed flow velocity and
//! are destroyed when they reach the outlet.

pub mod particle;
pub mod advector;
pub mod injector;

pub use particle::FlowParticle;
pub use advector::{AdvanceOutcome, ParticleAdvector};
pub use injector::{GridInjector, ParticleInjector};
