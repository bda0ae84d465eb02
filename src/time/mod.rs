pub mod clock;
pub mod jitter;

pub use clock::{ClockConfig, SimulationClock, SimSpeed, Tick, Ticks, clamp_frame_dt};
pub use jitter::DtJitterFilter;
