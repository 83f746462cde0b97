//! Gradient synthesis by inverse-distance-power interpolation
//!
//! For a pixel `p` and its relevant anchors `a_i` with colors `c_i`:
//!
//! ```text
//! d_i    = |p - a_i|
//! n_i    = 1 - d_i / sum(d)
//! w_i    = n_i ^ power        (w = 1 when only one anchor is relevant)
//! color  = sum(w_i * c_i) / sum(w)
//! ```
//!
//! When every relevant anchor sits exactly on `p` (zero total distance) or
//! all weights underflow to zero, the plain mean of the relevant colors is
//! used instead, so the result is always finite.


use crate::anchors::{AnchorPoint, Point};
use crate::color::{convert, ColorSpace, Sample};
use crate::error::{GradientError, Result};
use crate::image::{Image, ImageView};
use crate::parallel::{for_each_row, CancelToken};
use crate::points::RelevanceSelector;

/// Default exponent applied to anchor closeness
pub const DEFAULT_INTERPOLATION_POWER: f64 = 3.0;

/// Reusable per-thread buffers
#[derive(Default)]
struct Scratch {
    indices: Vec<usize>,
    distances: Vec<f64>,
    weights: Vec<f64>,
}

/// Interpolates background colors from the anchors of a [`RelevanceSelector`].
#[derive(Debug, Clone, Copy)]
pub struct GradientInterpolator<'a> {
    selector: &'a RelevanceSelector,
    power: f64,
}

impl<'a> GradientInterpolator<'a> {
    /// Bind to a selector. Fails without anchors or with a non-finite power.
    pub fn new(selector: &'a RelevanceSelector, power: f64) -> Result<Self> {
        if selector.anchors().is_empty() {
            return Err(GradientError::NoAnchors);
        }
        if !power.is_finite() {
            return Err(GradientError::invalid(
                "interpolation_power",
                format!("must be finite, got {}", power),
            ));
        }
        Ok(Self { selector, power })
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    /// Normalized weight of every relevant anchor for `point`, as
    /// `(anchor index, weight)` pairs summing to 1.
    pub fn weights_for(&self, point: Point) -> Vec<(usize, f64)> {
        let mut scratch = Scratch::default();
        self.compute_weights(point, &mut scratch);
        scratch
            .indices
            .iter()
            .copied()
            .zip(scratch.weights.iter().copied())
            .collect()
    }

    /// Interpolated RGB background color at `point`.
    pub fn interpolate(&self, point: Point) -> Sample {
        let mut scratch = Scratch::default();
        self.interpolate_with(point, &mut scratch)
    }

    fn compute_weights(&self, point: Point, scratch: &mut Scratch) {
        let anchors = self.selector.anchors();
        self.selector.relevant_indices(point, &mut scratch.indices);

        let n = scratch.indices.len();
        scratch.distances.clear();
        scratch.weights.clear();

        if n == 1 {
            scratch.weights.push(1.0);
            return;
        }

        let mut total_distance = 0.0;
        for &i in &scratch.indices {
            let d = point.distance(&anchors[i].position);
            scratch.distances.push(d);
            total_distance += d;
        }

        let mut total_weight = 0.0;
        if total_distance > 0.0 {
            for &d in &scratch.distances {
                let closeness = 1.0 - d / total_distance;
                let weight = closeness.max(0.0).powf(self.power);
                scratch.weights.push(weight);
                total_weight += weight;
            }
        }

        if total_weight > 0.0 && total_weight.is_finite() {
            for w in scratch.weights.iter_mut() {
                *w /= total_weight;
            }
        } else {
            scratch.weights.clear();
            scratch.weights.resize(n, 1.0 / n as f64);
        }
    }

    fn interpolate_with(&self, point: Point, scratch: &mut Scratch) -> Sample {
        self.compute_weights(point, scratch);
        blend(self.selector.anchors(), &scratch.indices, &scratch.weights)
    }

    /// Fill `target` with the interpolated gradient.
    pub fn render(&self, target: &mut Image, parallel: bool, cancel: Option<&CancelToken>) -> Result<()> {
        let width = target.width();
        let row_len = target.row_len();
        let space = target.color_space();

        for_each_row(target.data_mut(), row_len, parallel, cancel, |y, row| {
            let mut scratch = Scratch::default();
            for x in 0..width {
                let rgb = self.interpolate_with(Point::new(x as i32, y as i32), &mut scratch);
                let sample = convert(rgb, ColorSpace::Rgb, space);
                row[x * 3..x * 3 + 3].copy_from_slice(&sample);
            }
        })
    }

    /// Render the gradient for a `width` x `height` frame as a new RGB image.
    pub fn render_image(
        &self,
        width: usize,
        height: usize,
        parallel: bool,
        cancel: Option<&CancelToken>,
    ) -> Result<Image> {
        let mut image = Image::new(width, height, ColorSpace::Rgb);
        self.render(&mut image, parallel, cancel)?;
        Ok(image)
    }
}

#[inline]
fn blend(anchors: &[AnchorPoint], indices: &[usize], weights: &[f64]) -> Sample {
    let mut color = [0.0f64; 3];
    for (&i, &w) in indices.iter().zip(weights) {
        let c = anchors[i].color;
        color[0] += c[0] as f64 * w;
        color[1] += c[1] as f64 * w;
        color[2] += c[2] as f64 * w;
    }
    [color[0] as f32, color[1] as f32, color[2] as f32]
}
