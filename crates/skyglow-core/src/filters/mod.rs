//! Low-pass filters for gradient estimation
//!
//! A heavy low-pass of the input approximates the background when no
//! anchors are available. Every filter works on a copy of the input stored
//! in the requested color space, returns a new image in that space, and
//! treats radius 0 as identity.

mod box_blur;
mod gaussian;
mod median;

#[cfg(test)]
mod tests;

pub use box_blur::box_blur;
pub use gaussian::{box_radius, box_sizes_for_gauss, gaussian_blur, GAUSSIAN_PASSES};
pub use median::{line_median_filter, median_filter, pseudo_median_filter, Axis};

use serde::{Deserialize, Serialize};

use crate::color::ColorSpace;
use crate::error::Result;
use crate::image::{Image, ImageView};
use crate::parallel::CancelToken;

/// Low-pass filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LowPassFilter {
    /// Mean over a square window
    BoxBlur { radius: usize },

    /// Three box passes approximating a Gaussian; `radius` is the sigma
    GaussianBlur { radius: usize },

    /// Per-channel 2-D median
    Median { radius: usize },

    HorizontalMedian { radius: usize },

    VerticalMedian { radius: usize },

    /// Horizontal median fed through a vertical median
    PseudoMedian { radius: usize },
}

impl Default for LowPassFilter {
    fn default() -> Self {
        LowPassFilter::GaussianBlur { radius: 100 }
    }
}

impl LowPassFilter {
    pub fn radius(&self) -> usize {
        match *self {
            LowPassFilter::BoxBlur { radius }
            | LowPassFilter::GaussianBlur { radius }
            | LowPassFilter::Median { radius }
            | LowPassFilter::HorizontalMedian { radius }
            | LowPassFilter::VerticalMedian { radius }
            | LowPassFilter::PseudoMedian { radius } => radius,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LowPassFilter::BoxBlur { .. } => "BoxBlur",
            LowPassFilter::GaussianBlur { .. } => "GaussianBlur",
            LowPassFilter::Median { .. } => "Median",
            LowPassFilter::HorizontalMedian { .. } => "HorizontalMedian",
            LowPassFilter::VerticalMedian { .. } => "VerticalMedian",
            LowPassFilter::PseudoMedian { .. } => "PseudoMedian",
        }
    }

    /// Filter `source`, working in `space`.
    pub fn apply<V: ImageView + ?Sized>(
        &self,
        source: &V,
        space: ColorSpace,
        parallel: bool,
        cancel: Option<&CancelToken>,
    ) -> Result<Image> {
        let mut working = Image::from_view(source, space);
        let radius = self.radius();
        if radius == 0 || working.width() == 0 || working.height() == 0 {
            return Ok(working);
        }

        log::debug!(
            "Applying {} to {}x{} image in {}",
            self,
            working.width(),
            working.height(),
            space
        );

        match *self {
            LowPassFilter::BoxBlur { .. } => {
                box_blur(&mut working, radius, parallel, cancel)?;
                Ok(working)
            }
            LowPassFilter::GaussianBlur { .. } => {
                gaussian_blur(&mut working, radius, parallel, cancel)?;
                Ok(working)
            }
            LowPassFilter::Median { .. } => median_filter(&working, radius, parallel, cancel),
            LowPassFilter::HorizontalMedian { .. } => {
                line_median_filter(&working, radius, Axis::Horizontal, parallel, cancel)
            }
            LowPassFilter::VerticalMedian { .. } => {
                line_median_filter(&working, radius, Axis::Vertical, parallel, cancel)
            }
            LowPassFilter::PseudoMedian { .. } => {
                pseudo_median_filter(&working, radius, parallel, cancel)
            }
        }
    }
}

impl std::fmt::Display for LowPassFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(radius={})", self.name(), self.radius())
    }
}
