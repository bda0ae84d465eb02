pub mod constants;
pub mod error;
pub mod observable;
pub mod config;
pub mod fluid;
pub mod pipe;
pub mod particles;
pub mod drops;
pub mod time;
pub mod scenes;

pub use config::{RunSettings, SimulationConfig};
pub use error::{SimError, SimResult};
pub use observable::{Observable, SubscriptionId};
pub use fluid::{FluidColor, FluidSettings, FluidState, MeasureUnits, PressureField};
pub use pipe::{ControlPoint, CrossSection, FluxMeter, PipeConfig, PipeEnd, PipeGeometry, PipeSide};
pub use particles::{AdvanceOutcome, FlowParticle, ParticleAdvector};
pub use drops::{AbsorptionVolume, DropKinematics, DropOutcome, WaterDrop};
pub use time::{ClockConfig, DtJitterFilter, SimSpeed, SimulationClock, Tick};
pub use scenes::{ChamberPoolScene, FlowScene, MysteryPool, SquarePool, WaterTowerScene};

/// Every scene, built from one configuration
#[derive(Debug)]
pub struct Simulation {
    pub flow: FlowScene,
    pub tower: WaterTowerScene,
    pub chamber: ChamberPoolScene,
    pub square_pool: SquarePool,
    pub mystery_pool: MysteryPool,
}

impl Simulation {
    pub fn new(config: &SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            flow: FlowScene::new(&config.flow, config.fluid, config.seed)?,
            tower: WaterTowerScene::new(&config.tower, config.fluid, config.seed.wrapping_add(1))?,
            chamber: ChamberPoolScene::new(&config.chamber, config.fluid)?,
            square_pool: SquarePool::new(&config.pool, config.fluid)?,
            mystery_pool: MysteryPool::new(&config.pool, config.fluid)?,
        })
    }

    /// Step every scene by the same frame delta
    pub fn step(&mut self, dt: f64) {
        self.flow.step(dt);
        self.tower.step(dt);
        self.chamber.step(dt);
        self.square_pool.step(dt);
        self.mystery_pool.step(dt);
    }

    pub fn reset(&mut self) {
        self.flow.reset();
        self.tower.reset();
        self.chamber.reset();
        self.square_pool.reset();
        self.mystery_pool.reset();
    }
}
