//! Zero-copy rectangular windows over an image

use crate::color::{ColorSpace, Sample};

use super::{ImageView, ImageViewMut};

/// Read-only window translating `(x, y)` to `(x0 + x, y0 + y)` on the parent.
///
/// The window may extend past the parent; such pixels read as clamped
/// parent edges but are not [`ImageView::is_inside`].
pub struct Region<'a, I: ImageView + ?Sized> {
    parent: &'a I,
    x0: i32,
    y0: i32,
    width: usize,
    height: usize,
}

impl<'a, I: ImageView + ?Sized> Region<'a, I> {
    pub fn new(parent: &'a I, x0: i32, y0: i32, width: usize, height: usize) -> Self {
        Self {
            parent,
            x0,
            y0,
            width,
            height,
        }
    }
}

impl<I: ImageView + ?Sized> ImageView for Region<'_, I> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn color_space(&self) -> ColorSpace {
        self.parent.color_space()
    }

    #[inline]
    fn get_native(&self, x: usize, y: usize) -> Sample {
        self.parent.get(
            self.x0 + x as i32,
            self.y0 + y as i32,
            self.parent.color_space(),
        )
    }

    fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && self.parent.is_inside(self.x0 + x, self.y0 + y)
    }
}

/// Mutable window; writes landing outside the parent are dropped.
pub struct RegionMut<'a, I: ImageViewMut + ?Sized> {
    parent: &'a mut I,
    x0: i32,
    y0: i32,
    width: usize,
    height: usize,
}

impl<'a, I: ImageViewMut + ?Sized> RegionMut<'a, I> {
    pub fn new(parent: &'a mut I, x0: i32, y0: i32, width: usize, height: usize) -> Self {
        Self {
            parent,
            x0,
            y0,
            width,
            height,
        }
    }
}

impl<I: ImageViewMut + ?Sized> ImageView for RegionMut<'_, I> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn color_space(&self) -> ColorSpace {
        self.parent.color_space()
    }

    #[inline]
    fn get_native(&self, x: usize, y: usize) -> Sample {
        self.parent.get(
            self.x0 + x as i32,
            self.y0 + y as i32,
            self.parent.color_space(),
        )
    }

    fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && self.parent.is_inside(self.x0 + x, self.y0 + y)
    }
}

impl<I: ImageViewMut + ?Sized> ImageViewMut for RegionMut<'_, I> {
    #[inline]
    fn set_native(&mut self, x: usize, y: usize, sample: Sample) {
        let space = self.parent.color_space();
        self.parent
            .set(self.x0 + x as i32, self.y0 + y as i32, space, sample);
    }

    fn set(&mut self, x: i32, y: i32, space: ColorSpace, sample: Sample) {
        if self.is_inside(x, y) {
            self.parent.set(self.x0 + x, self.y0 + y, space, sample);
        }
    }
}
