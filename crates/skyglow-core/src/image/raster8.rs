//! 8-bit RGB raster adapter

use crate::color::Sample;
use crate::error::{GradientError, Result};

use super::{ImageView, ImageViewMut};

/// Owned 8-bit RGB raster (e.g. a decoded PNG or JPEG).
///
/// Samples are exposed as 0.0-1.0 floats; writes are rounded and clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgb8Image {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Rgb8Image {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    /// Wrap interleaved 8-bit RGB bytes.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != width * height * 3 {
            return Err(GradientError::BufferSize {
                width,
                height,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

#[inline]
fn to_u8(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

impl ImageView for Rgb8Image {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get_native(&self, x: usize, y: usize) -> Sample {
        let i = (y * self.width + x) * 3;
        [
            self.data[i] as f32 / 255.0,
            self.data[i + 1] as f32 / 255.0,
            self.data[i + 2] as f32 / 255.0,
        ]
    }
}

impl ImageViewMut for Rgb8Image {
    #[inline]
    fn set_native(&mut self, x: usize, y: usize, sample: Sample) {
        let i = (y * self.width + x) * 3;
        self.data[i] = to_u8(sample[0]);
        self.data[i + 1] = to_u8(sample[1]);
        self.data[i + 2] = to_u8(sample[2]);
    }
}
