use serde::{Deserialize, Serialize};

/// Top and bottom of the pipe at one x. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub x: f64,
    pub y_top: f64,
    pub y_bottom: f64,
}

impl CrossSection {
    pub fn height(&self) -> f64 {
        self.y_top - self.y_bottom
    }

    /// Height of the point `fraction` of the way from bottom to top
    pub fn y_at_fraction(&self, fraction: f64) -> f64 {
        self.y_bottom + fraction * self.height()
    }

    /// Fraction of the way from bottom to top for height `y`
    pub fn fraction_at(&self, y: f64) -> f64 {
        let height = self.height();
        if height.abs() < f64::EPSILON {
            0.5
        } else {
            (y - self.y_bottom) / height
        }
    }

    /// Whether `y` lies strictly between the rails
    pub fn contains(&self, y: f64) -> bool {
        y > self.y_bottom && y < self.y_top
    }
}
