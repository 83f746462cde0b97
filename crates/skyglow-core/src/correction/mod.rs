//! Curve corrections combining an input sample with a gradient sample
//!
//! - `Simple`: `input - gradient`
//! - `Linear`: `(input - gradient) / (1 - gradient)`, stretching the
//!   remaining range back to `[0, 1]`
//! - `Spline`: a monotone curve through `(0, 0)`, `(g, g * shaping_factor)`,
//!   optional stretch points, and `(1, 1)`, evaluated at the input
//!
//! Corrections work per channel on RGB samples. Results are not clamped.


use serde::{Deserialize, Serialize};

use crate::color::{convert, ColorSpace, Sample};
use crate::error::{GradientError, Result};
use crate::image::{Image, ImageView};
use crate::parallel::{for_each_row, CancelToken};
use crate::spline::MonotoneCubicSpline;

/// Default y fraction kept at the gradient level by the spline correction.
pub const DEFAULT_SHAPING_FACTOR: f64 = 0.01;

/// How the estimated gradient is removed from the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveCorrection {
    /// Plain subtraction
    #[default]
    Simple,

    /// Subtraction with the remaining range rescaled
    Linear,

    /// Monotone spline compressing the gradient toward a small fraction
    Spline {
        #[serde(default = "default_shaping_factor")]
        shaping_factor: f64,
        #[serde(default)]
        stretch_points: Vec<(f64, f64)>,
    },
}

fn default_shaping_factor() -> f64 {
    DEFAULT_SHAPING_FACTOR
}

impl CurveCorrection {
    /// Spline correction with the default shaping factor and no stretch points.
    pub fn spline() -> Self {
        CurveCorrection::Spline {
            shaping_factor: DEFAULT_SHAPING_FACTOR,
            stretch_points: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurveCorrection::Simple => "simple",
            CurveCorrection::Linear => "linear",
            CurveCorrection::Spline { .. } => "spline",
        }
    }

    /// Check parameters before a pass.
    pub fn validate(&self) -> Result<()> {
        let CurveCorrection::Spline {
            shaping_factor,
            stretch_points,
        } = self
        else {
            return Ok(());
        };

        if !shaping_factor.is_finite() || *shaping_factor < 0.0 {
            return Err(GradientError::invalid(
                "shaping_factor",
                format!("must be finite and >= 0, got {}", shaping_factor),
            ));
        }

        let mut previous = (0.0, 0.0);
        for &(x, y) in stretch_points {
            if !(x > 0.0 && x < 1.0) {
                return Err(GradientError::InvalidSpline(format!(
                    "stretch point x {} must lie inside (0, 1)",
                    x
                )));
            }
            if !(0.0..=1.0).contains(&y) {
                return Err(GradientError::InvalidSpline(format!(
                    "stretch point y {} must lie inside [0, 1]",
                    y
                )));
            }
            if x <= previous.0 || y < previous.1 {
                return Err(GradientError::InvalidSpline(format!(
                    "stretch points must have increasing x and non-decreasing y, ({}, {}) follows ({}, {})",
                    x, y, previous.0, previous.1
                )));
            }
            previous = (x, y);
        }
        Ok(())
    }

    /// Combine one channel of input and gradient.
    pub fn combine(&self, input: f32, gradient: f32) -> f32 {
        match self {
            CurveCorrection::Simple => input - gradient,
            CurveCorrection::Linear => {
                if gradient >= 1.0 {
                    0.0
                } else {
                    (input - gradient) / (1.0 - gradient)
                }
            }
            CurveCorrection::Spline {
                shaping_factor,
                stretch_points,
            } => spline_combine(input as f64, gradient as f64, *shaping_factor, stretch_points) as f32,
        }
    }

    /// Combine every channel of a sample.
    #[inline]
    pub fn combine_sample(&self, input: Sample, gradient: Sample) -> Sample {
        [
            self.combine(input[0], gradient[0]),
            self.combine(input[1], gradient[1]),
            self.combine(input[2], gradient[2]),
        ]
    }

    /// Apply the correction to whole images, writing into `output`.
    ///
    /// All three images must share dimensions. Input and gradient are read
    /// as RGB; results are stored in the output's color space.
    pub fn apply<I, G>(
        &self,
        input: &I,
        gradient: &G,
        output: &mut Image,
        parallel: bool,
        cancel: Option<&CancelToken>,
    ) -> Result<()>
    where
        I: ImageView + Sync + ?Sized,
        G: ImageView + Sync + ?Sized,
    {
        let expected = (input.width(), input.height());
        for actual in [(gradient.width(), gradient.height()), output.dimensions()] {
            if actual != expected {
                return Err(GradientError::DimensionMismatch { expected, actual });
            }
        }
        self.validate()?;

        let width = output.width();
        let row_len = output.row_len();
        let space = output.color_space();

        for_each_row(output.data_mut(), row_len, parallel, cancel, |y, row| {
            for x in 0..width {
                let (xi, yi) = (x as i32, y as i32);
                let corrected = self.combine_sample(input.get_rgb(xi, yi), gradient.get_rgb(xi, yi));
                row[x * 3..x * 3 + 3].copy_from_slice(&convert(corrected, ColorSpace::Rgb, space));
            }
        })
    }
}

fn spline_combine(input: f64, gradient: f64, shaping_factor: f64, stretch_points: &[(f64, f64)]) -> f64 {
    if gradient <= 0.0 {
        return input;
    }
    if gradient >= 1.0 {
        return 0.0;
    }

    let target = (gradient * shaping_factor).min(1.0);
    let mut xs = Vec::with_capacity(stretch_points.len() + 3);
    let mut ys = Vec::with_capacity(stretch_points.len() + 3);
    xs.extend([0.0, gradient]);
    ys.extend([0.0, target]);
    for &(x, y) in stretch_points {
        if x > gradient && x < 1.0 && y >= target {
            xs.push(x);
            ys.push(y);
        }
    }
    xs.push(1.0);
    ys.push(1.0);

    match MonotoneCubicSpline::new(&xs, &ys) {
        Ok(spline) => spline.interpolate(input),
        Err(err) => {
            log::warn!("Spline correction fell back to subtraction: {}", err);
            input - gradient
        }
    }
}
