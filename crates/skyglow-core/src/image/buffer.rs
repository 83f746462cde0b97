//! Owned 32-bit float image

use crate::color::{ColorSpace, Sample};
use crate::error::{GradientError, Result};

use super::{ImageView, ImageViewMut};

/// Owned 3-channel f32 image in row-major, interleaved layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    color_space: ColorSpace,
    data: Vec<f32>,
}

impl Image {
    /// Construct a black image.
    pub fn new(width: usize, height: usize, color_space: ColorSpace) -> Self {
        Self {
            width,
            height,
            color_space,
            data: vec![0.0; width * height * 3],
        }
    }

    /// Construct an image where every pixel holds `sample` (given in `color_space`).
    pub fn filled(width: usize, height: usize, color_space: ColorSpace, sample: Sample) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&sample);
        }
        Self {
            width,
            height,
            color_space,
            data,
        }
    }

    /// Wrap interleaved samples produced by an external decoder.
    pub fn from_data(
        width: usize,
        height: usize,
        color_space: ColorSpace,
        data: Vec<f32>,
    ) -> Result<Self> {
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
            color_space,
            data,
        })
    }

    /// Wrap interleaved linear RGB samples.
    pub fn from_rgb_data(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        Self::from_data(width, height, ColorSpace::Rgb, data)
    }

    /// Copy any view into a new buffer stored in `color_space`.
    pub fn from_view<V: ImageView + ?Sized>(view: &V, color_space: ColorSpace) -> Self {
        let mut image = Self::new(view.width(), view.height(), color_space);
        image.copy_from(view, color_space);
        image
    }

    /// A black image with the same size and color space as `self`.
    pub fn blank_like(&self) -> Self {
        Self::new(self.width, self.height, self.color_space)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Number of f32 values in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width * 3
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * 3
    }
}

impl ImageView for Image {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    #[inline]
    fn get_native(&self, x: usize, y: usize) -> Sample {
        let i = self.idx(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

impl ImageViewMut for Image {
    #[inline]
    fn set_native(&mut self, x: usize, y: usize, sample: Sample) {
        let i = self.idx(x, y);
        self.data[i..i + 3].copy_from_slice(&sample);
    }
}
