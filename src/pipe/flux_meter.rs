use crate::constants::flow::LITERS_PER_CUBIC_METER;
use crate::pipe::PipeGeometry;

/// Measuring ring around the pipe at a fixed x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxMeter {
    x: f64,
    initial_x: f64,
}

impl FluxMeter {
    pub fn new(x: f64) -> Self {
        Self { x, initial_x: x }
    }

    /// Meter anchored halfway along `pipe`
    pub fn centred_on(pipe: &PipeGeometry) -> Self {
        Self::new((pipe.min_x() + pipe.max_x()) / 2.0)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    /// Move the meter, keeping it inside the pipe
    pub fn set_x(&mut self, x: f64, pipe: &PipeGeometry) -> f64 {
        if x.is_finite() {
            self.x = x.clamp(pipe.min_x(), pipe.max_x());
        }
        self.x
    }

    /// Cross-section area at the meter (m², unit depth)
    pub fn area(&self, pipe: &PipeGeometry) -> f64 {
        pipe.width(self.x)
    }

    /// Flow per unit area at the meter (m/s)
    pub fn flux(&self, pipe: &PipeGeometry) -> f64 {
        pipe.flow_rate() / LITERS_PER_CUBIC_METER / self.area(pipe)
    }

    pub fn reset(&mut self) {
        self.x = self.initial_x;
    }
}
