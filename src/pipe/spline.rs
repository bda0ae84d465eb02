/// Natural cubic spline through points with strictly increasing x.
///
/// Queries outside `[x_min, x_max]` are clamped to the nearest end.
/// Two points give a straight line.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative at each knot
    second: Vec<f64>,
}

impl CubicSpline {
    /// Fit through `(xs[i], ys[i])`. Callers guarantee at least two points
    /// with strictly increasing x.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Self {
        debug_assert!(xs.len() >= 2 && xs.len() == ys.len());
        let n = xs.len();
        let mut second = vec![0.0; n];

        if n > 2 {
            // Tridiagonal system for the interior second derivatives (Thomas algorithm)
            let interior = n - 2;
            let mut diag = vec![0.0; interior];
            let mut upper = vec![0.0; interior];
            let mut rhs = vec![0.0; interior];

            for k in 0..interior {
                let i = k + 1;
                let h_prev = xs[i] - xs[i - 1];
                let h_next = xs[i + 1] - xs[i];
                diag[k] = 2.0 * (h_prev + h_next);
                upper[k] = h_next;
                rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h_next - (ys[i] - ys[i - 1]) / h_prev);

                if k > 0 {
                    let w = h_prev / diag[k - 1];
                    diag[k] -= w * upper[k - 1];
                    rhs[k] -= w * rhs[k - 1];
                }
            }

            second[interior] = rhs[interior - 1] / diag[interior - 1];
            for k in (0..interior - 1).rev() {
                second[k + 1] = (rhs[k] - upper[k] * second[k + 2]) / diag[k];
            }
        }

        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second,
        }
    }

    pub fn x_min(&self) -> f64 {
        self.xs[0]
    }

    pub fn x_max(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Spline value at `x`
    pub fn value(&self, x: f64) -> f64 {
        let (i, a, b, h) = self.segment(x);
        a * self.ys[i]
            + b * self.ys[i + 1]
            + ((a * a * a - a) * self.second[i] + (b * b * b - b) * self.second[i + 1]) * h * h / 6.0
    }

    /// First derivative at `x`
    pub fn slope(&self, x: f64) -> f64 {
        let (i, a, b, h) = self.segment(x);
        (self.ys[i + 1] - self.ys[i]) / h
            + (-(3.0 * a * a - 1.0) * self.second[i] + (3.0 * b * b - 1.0) * self.second[i + 1]) * h / 6.0
    }

    /// Segment index and barycentric weights for `x`
    fn segment(&self, x: f64) -> (usize, f64, f64, f64) {
        let x = if x.is_nan() { self.x_min() } else { x.clamp(self.x_min(), self.x_max()) };
        let last_segment = self.xs.len() - 2;
        let i = self
            .xs
            .partition_point(|knot| *knot <= x)
            .saturating_sub(1)
            .min(last_segment);
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        let b = (x - self.xs[i]) / h;
        (i, a, b, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_through_knots() {
        let xs = [0.0, 1.0, 2.5, 4.0];
        let ys = [1.0, 3.0, -1.0, 2.0];
        let spline = CubicSpline::fit(&xs, &ys);
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((spline.value(*x) - y).abs() < 1e-12);
        }
    }

    #[test]
    fn test_two_points_are_linear() {
        let spline = CubicSpline::fit(&[0.0, 2.0], &[1.0, 3.0]);
        assert!((spline.value(0.5) - 1.5).abs() < 1e-12);
        assert!((spline.slope(1.7) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_data_stays_flat() {
        let spline = CubicSpline::fit(&[-6.0, -2.0, 0.0, 3.0, 6.0], &[-1.0; 5]);
        for i in 0..=24 {
            let x = -6.0 + i as f64 * 0.5;
            assert!((spline.value(x) + 1.0).abs() < 1e-12);
            assert!(spline.slope(x).abs() < 1e-12);
        }
    }

    #[test]
    fn test_clamps_outside_range() {
        let spline = CubicSpline::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        assert_eq!(spline.value(-5.0), spline.value(0.0));
        assert_eq!(spline.value(9.0), spline.value(2.0));
        assert!(spline.value(f64::NAN).is_finite());
    }

    #[test]
    fn test_natural_symmetry() {
        // Symmetric data gives a zero slope at the centre
        let spline = CubicSpline::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        assert!(spline.slope(1.0).abs() < 1e-12);
        assert!((spline.value(0.5) - spline.value(1.5)).abs() < 1e-12);
    }
}
