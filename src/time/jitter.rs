use crate::constants::chamber::JITTER_TOLERANCE;

/// Single-frame jitter damping for frame deltas.
///
/// A delta that differs from the last accepted one by more than
/// `tolerance * last` is replaced by the last accepted delta; anything within
/// tolerance is accepted and remembered. The first positive delta seen is
/// accepted as-is.
#[derive(Debug, Clone)]
pub struct DtJitterFilter {
    last_dt: Option<f64>,
    tolerance: f64,
}

impl Default for DtJitterFilter {
    fn default() -> Self {
        Self::new(JITTER_TOLERANCE)
    }
}

impl DtJitterFilter {
    pub fn new(tolerance: f64) -> Self {
        Self {
            last_dt: None,
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn filter(&mut self, dt: f64) -> f64 {
        if !dt.is_finite() || dt <= 0.0 {
            return self.last_dt.unwrap_or(0.0);
        }
        match self.last_dt {
            Some(last) if (last - dt).abs() > last * self.tolerance => last,
            _ => {
                self.last_dt = Some(dt);
                dt
            }
        }
    }

    pub fn last_dt(&self) -> Option<f64> {
        self.last_dt
    }

    pub fn reset(&mut self) {
        self.last_dt = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spike_is_replaced() {
        let mut filter = DtJitterFilter::default();
        assert_eq!(filter.filter(0.016), 0.016);
        assert_eq!(filter.filter(0.5), 0.016);
        assert_eq!(filter.filter(0.018), 0.018);
        assert_eq!(filter.last_dt(), Some(0.018));
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let mut a = DtJitterFilter::default();
        let mut b = DtJitterFilter::default();
        a.filter(0.016);
        assert_eq!(b.filter(0.1), 0.1);
        assert_eq!(a.filter(0.1), 0.016);
    }
}
