//! Scene models
//!
//! Each scene composes the pipe, particle, drop, clock and pressure pieces
//! the way one screen of the simulation uses them. Scenes are driven by an
//! external per-frame `step(dt)` and answer point queries for the view.

pub mod faucet;
pub mod flow;
pub mod water_tower;
pub mod chamber_pool;
pub mod square_pool;
pub mod mystery_pool;

pub use faucet::Faucet;
pub use flow::{FlowConfig, FlowScene};
pub use water_tower::{FaucetMode, Hose, Tank, TowerConfig, WaterTowerScene};
pub use chamber_pool::{ChamberConfig, ChamberGeometry, ChamberPoolScene, Mass, MassState, PoolRegion};
pub use square_pool::{PoolConfig, SquarePool};
pub use mystery_pool::{MysteryPool, MysteryQuantity};
