//! Pixel buffers and the get/set contract shared by every operation
//!
//! All algorithms in this crate talk to images through [`ImageView`] and
//! [`ImageViewMut`]:
//! - reads take signed coordinates and clamp to the nearest edge pixel
//!   (replicate padding), so filters never special-case borders
//! - writes outside the image are silently ignored
//! - samples are converted between the storage color space and the
//!   requested one on the fly
//!
//! Two owned buffers are provided: [`Image`] (32-bit float, the working
//! format) and [`Rgb8Image`] (8-bit RGB raster). [`Region`] and
//! [`RegionMut`] are zero-copy windows over either.

mod aggregate;
mod buffer;
mod raster8;
mod region;


pub use aggregate::{
    average_pixel, brightest_pixel, darkest_pixel, median_pixel, vector_median_pixel,
};
pub(crate) use aggregate::per_channel_median;
pub use buffer::Image;
pub use raster8::Rgb8Image;
pub use region::{Region, RegionMut};

use crate::color::{convert, ColorSpace, Sample};

/// Read access to a 3-channel image.
pub trait ImageView {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Color space the samples are stored in.
    fn color_space(&self) -> ColorSpace {
        ColorSpace::Rgb
    }

    /// Read a sample in storage color space. `x`/`y` are always in bounds.
    fn get_native(&self, x: usize, y: usize) -> Sample;

    /// Whether the coordinate addresses a real pixel.
    fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    /// Read a sample in the requested color space, clamping the coordinate
    /// to the nearest edge pixel. An empty image reads as black.
    fn get(&self, x: i32, y: i32, space: ColorSpace) -> Sample {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return [0.0; 3];
        }
        let xx = x.clamp(0, width as i32 - 1) as usize;
        let yy = y.clamp(0, height as i32 - 1) as usize;
        convert(self.get_native(xx, yy), self.color_space(), space)
    }

    /// Read an RGB sample.
    fn get_rgb(&self, x: i32, y: i32) -> Sample {
        self.get(x, y, ColorSpace::Rgb)
    }

    /// Borrow a zero-copy window of this image.
    fn region(&self, x: i32, y: i32, width: usize, height: usize) -> Region<'_, Self> {
        Region::new(self, x, y, width, height)
    }
}

/// Write access to a 3-channel image.
pub trait ImageViewMut: ImageView {
    /// Write a sample in storage color space. `x`/`y` are always in bounds.
    fn set_native(&mut self, x: usize, y: usize, sample: Sample);

    /// Write a sample given in `space`. Writes outside the image are no-ops.
    fn set(&mut self, x: i32, y: i32, space: ColorSpace, sample: Sample) {
        if self.is_inside(x, y) {
            let native = convert(sample, space, self.color_space());
            self.set_native(x as usize, y as usize, native);
        }
    }

    /// Write an RGB sample.
    fn set_rgb(&mut self, x: i32, y: i32, sample: Sample) {
        self.set(x, y, ColorSpace::Rgb, sample);
    }

    /// Fill every pixel with one color.
    fn fill(&mut self, space: ColorSpace, sample: Sample) {
        let native = convert(sample, space, self.color_space());
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.set_native(x, y, native);
            }
        }
    }

    /// Copy `source` pixel by pixel, converting through `space`.
    ///
    /// Copies the overlapping area; pixels of `self` beyond the source size
    /// receive clamped edge samples.
    fn copy_from<V: ImageView + ?Sized>(&mut self, source: &V, space: ColorSpace) {
        for y in 0..self.height() as i32 {
            for x in 0..self.width() as i32 {
                let sample = source.get(x, y, space);
                self.set(x, y, space, sample);
            }
        }
    }

    /// Borrow a mutable zero-copy window of this image.
    fn region_mut(&mut self, x: i32, y: i32, width: usize, height: usize) -> RegionMut<'_, Self> {
        RegionMut::new(self, x, y, width, height)
    }
}
