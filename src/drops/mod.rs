//! Water drops
//!
//! Drops fall from faucets, the tower sluice and the hose under gravity until
//! they land on the ground or fall into a receiving volume.

pub mod drop;
pub mod kinematics;

pub use drop::WaterDrop;
pub use kinematics::{AbsorptionVolume, DropKinematics, DropOutcome};
