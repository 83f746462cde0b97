//! Histogram analysis
//!
//! Per-channel histograms over an image or a window of it, in RGB or HSV.
//! HSV hue is divided by 360 before binning so every channel spans `[0, 1]`.

#[cfg(test)]
mod tests;

use crate::color::{ColorSpace, H};
use crate::error::{GradientError, Result};
use crate::image::ImageView;

/// First and last non-empty bins of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramEnds {
    /// First non-empty bin, normalized to 0.0-1.0
    pub low: f32,
    /// Last non-empty bin, normalized to 0.0-1.0
    pub high: f32,
    pub non_empty_bins: usize,
}

/// Per-channel sample counts
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    color_space: ColorSpace,
    bins: [Vec<u32>; 3],
    sample_count: usize,
    max_count: u32,
}

impl Histogram {
    /// Histogram of every pixel of `image`.
    pub fn sample<V: ImageView + ?Sized>(image: &V, space: ColorSpace, bin_count: usize) -> Result<Self> {
        Self::sample_region(image, 0, 0, image.width(), image.height(), space, bin_count)
    }

    /// Histogram of the in-bounds pixels of a window.
    pub fn sample_region<V: ImageView + ?Sized>(
        image: &V,
        x: i32,
        y: i32,
        width: usize,
        height: usize,
        space: ColorSpace,
        bin_count: usize,
    ) -> Result<Self> {
        if bin_count == 0 {
            return Err(GradientError::invalid("bin_count", "must be at least 1"));
        }

        let mut bins = [vec![0u32; bin_count], vec![0u32; bin_count], vec![0u32; bin_count]];
        let mut sample_count = 0;

        for iy in 0..height as i32 {
            for ix in 0..width as i32 {
                let (px, py) = (x + ix, y + iy);
                if !image.is_inside(px, py) {
                    continue;
                }
                let sample = image.get(px, py, space);
                for (c, channel) in bins.iter_mut().enumerate() {
                    let mut value = sample[c];
                    if space == ColorSpace::Hsv && c == H {
                        value /= 360.0;
                    }
                    channel[bin_index(value, bin_count)] += 1;
                }
                sample_count += 1;
            }
        }

        let max_count = bins.iter().flatten().copied().max().unwrap_or(0);

        Ok(Self {
            color_space: space,
            bins,
            sample_count,
            max_count,
        })
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn bin_count(&self) -> usize {
        self.bins[0].len()
    }

    /// Number of pixels counted.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Raw counts of one channel.
    pub fn raw_bins(&self, channel: usize) -> &[u32] {
        &self.bins[channel]
    }

    /// Counts of one channel divided by the largest count across all channels.
    pub fn normalized_bins(&self, channel: usize) -> Vec<f64> {
        if self.max_count == 0 {
            return vec![0.0; self.bin_count()];
        }
        let max = self.max_count as f64;
        self.bins[channel].iter().map(|&c| c as f64 / max).collect()
    }

    /// Range actually occupied by one channel.
    pub fn ends(&self, channel: usize) -> HistogramEnds {
        let bins = &self.bins[channel];
        let last = (bins.len() - 1).max(1) as f32;

        let low = bins.iter().position(|&c| c > 0).unwrap_or(0);
        let high = bins.iter().rposition(|&c| c > 0).unwrap_or(bins.len() - 1);

        HistogramEnds {
            low: low as f32 / last,
            high: high as f32 / last,
            non_empty_bins: bins.iter().filter(|&&c| c > 0).count(),
        }
    }
}

#[inline]
fn bin_index(value: f32, bin_count: usize) -> usize {
    let scaled = (value * bin_count as f32).floor();
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else {
        (scaled as usize).min(bin_count - 1)
    }
}
