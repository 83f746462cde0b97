//! Monotone cubic spline interpolation
//!
//! Cubic Hermite spline whose tangents are limited with the Fritsch-Carlson
//! scheme, so the curve never overshoots between knots and stays
//! non-decreasing when the knot values are non-decreasing.
//!
//! Inputs outside the knot range are clamped: below the first knot the
//! first value is returned, above the last knot the last value.


use crate::error::{GradientError, Result};

/// A monotone cubic spline through ordered control points.
#[derive(Debug, Clone, PartialEq)]
pub struct MonotoneCubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    tangents: Vec<f64>,
}

impl MonotoneCubicSpline {
    /// Build a spline from control points.
    ///
    /// Requires at least two knots, strictly increasing `xs` and
    /// non-decreasing `ys`.
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(GradientError::InvalidSpline(format!(
                "{} x values but {} y values",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(GradientError::InvalidSpline(
                "at least two control points are required".to_string(),
            ));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(GradientError::InvalidSpline(
                "control points must be finite".to_string(),
            ));
        }

        let n = xs.len();
        let mut secants = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            let h = xs[i + 1] - xs[i];
            if h <= 0.0 {
                return Err(GradientError::InvalidSpline(format!(
                    "x values must be strictly increasing (x[{}] = {}, x[{}] = {})",
                    i,
                    xs[i],
                    i + 1,
                    xs[i + 1]
                )));
            }
            let secant = (ys[i + 1] - ys[i]) / h;
            if secant < 0.0 {
                return Err(GradientError::InvalidSpline(format!(
                    "y values must be non-decreasing (y[{}] = {}, y[{}] = {})",
                    i,
                    ys[i],
                    i + 1,
                    ys[i + 1]
                )));
            }
            secants.push(secant);
        }

        // Initial tangents: one-sided at the ends, averaged secants inside
        let mut tangents = vec![0.0; n];
        tangents[0] = secants[0];
        tangents[n - 1] = secants[n - 2];
        for i in 1..n - 1 {
            tangents[i] = (secants[i - 1] + secants[i]) * 0.5;
        }

        // Fritsch-Carlson: flat segments get flat tangents, and (alpha, beta)
        // is pulled back inside the circle of radius 3
        for i in 0..n - 1 {
            if secants[i] == 0.0 {
                tangents[i] = 0.0;
                tangents[i + 1] = 0.0;
            } else {
                let alpha = tangents[i] / secants[i];
                let beta = tangents[i + 1] / secants[i];
                let radius = alpha.hypot(beta);
                if radius > 3.0 {
                    let tau = 3.0 / radius;
                    tangents[i] = tau * alpha * secants[i];
                    tangents[i + 1] = tau * beta * secants[i];
                }
            }
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            tangents,
        })
    }

    /// Build a spline from `(x, y)` pairs.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        Self::new(&xs, &ys)
    }

    /// Evaluate the spline at `x`, clamping outside the knot range.
    pub fn interpolate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x.is_nan() || x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }

        // First knot strictly greater than x; x lies in [xs[i], xs[i + 1])
        let i = self.xs.partition_point(|&knot| knot <= x) - 1;
        if x == self.xs[i] {
            return self.ys[i];
        }

        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * self.ys[i]
            + h10 * h * self.tangents[i]
            + h01 * self.ys[i + 1]
            + h11 * h * self.tangents[i + 1]
    }

    /// Knot positions.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Knot values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }
}
