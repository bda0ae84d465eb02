use serde::{Deserialize, Serialize};

/// User-controlled faucet; disabling it shuts the flow off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Faucet {
    flow_rate: f64,
    max_flow_rate: f64,
    enabled: bool,
}

impl Faucet {
    pub fn new(max_flow_rate: f64) -> Self {
        Self {
            flow_rate: 0.0,
            max_flow_rate: max_flow_rate.max(0.0),
            enabled: true,
        }
    }

    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    pub fn max_flow_rate(&self) -> f64 {
        self.max_flow_rate
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flow actually delivered: zero while disabled
    pub fn effective_flow_rate(&self) -> f64 {
        if self.enabled {
            self.flow_rate
        } else {
            0.0
        }
    }

    /// Set the flow within `[0, max]`. Ignored while disabled.
    pub fn set_flow_rate(&mut self, flow_rate: f64) -> f64 {
        if self.enabled && flow_rate.is_finite() {
            self.flow_rate = flow_rate.clamp(0.0, self.max_flow_rate);
        }
        self.flow_rate
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.flow_rate = 0.0;
        }
    }

    pub fn reset(&mut self) {
        self.flow_rate = 0.0;
        self.enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_shuts_off_flow() {
        let mut faucet = Faucet::new(0.25);
        assert_eq!(faucet.set_flow_rate(1.0), 0.25);
        faucet.set_enabled(false);
        assert_eq!(faucet.flow_rate(), 0.0);
        assert_eq!(faucet.set_flow_rate(0.1), 0.0);
        faucet.set_enabled(true);
        assert_eq!(faucet.set_flow_rate(0.1), 0.1);
    }
}
