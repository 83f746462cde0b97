//! Anchor points: image positions treated as pure background
//!
//! An [`AnchorTable`] owns the working set of anchors. The whole set is
//! replaced at once, and every replacement gets a fresh version number so
//! derived structures (e.g. the Voronoi triangulation) know when to rebuild.


use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::color::{ColorSpace, Sample};
use crate::error::{GradientError, Result};
use crate::image::{average_pixel, median_pixel, ImageView};

/// Integer image coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Resolve coordinates counted from the opposite edge.
    ///
    /// A negative `x` means `width + x` (so `-1` is the last column), and the
    /// same for `y` with `height`.
    pub fn resolve(&self, width: usize, height: usize) -> Point {
        let x = if self.x < 0 {
            width as i32 + self.x
        } else {
            self.x
        };
        let y = if self.y < 0 {
            height as i32 + self.y
        } else {
            self.y
        };
        Point { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point { x, y }
    }
}

/// An anchor position and the background color sampled there
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub position: Point,
    pub color: Sample,
}

impl AnchorPoint {
    pub fn new(position: Point, color: Sample) -> Self {
        Self { position, color }
    }
}

/// Average RGB color of the `(2r+1) x (2r+1)` window centered on `point`.
///
/// Pixels of the window outside the image are left out of the average.
/// A window entirely outside the image samples as black.
pub fn sample_anchor_color<V: ImageView + ?Sized>(image: &V, point: Point, radius: usize) -> Sample {
    let r = radius as i32;
    let size = 2 * radius + 1;
    average_pixel(image, point.x - r, point.y - r, size, size, ColorSpace::Rgb)
}

/// Three anchors placed without user input: top center, bottom left and
/// bottom right, each colored with the median of a window one fifth of the
/// image in size centered on it.
pub fn auto_anchor_points<V: ImageView + ?Sized>(image: &V) -> Vec<AnchorPoint> {
    let (width, height) = (image.width(), image.height());
    let sample_width = (width / 5).max(1);
    let sample_height = (height / 5).max(1);

    let positions = [
        Point::new((width / 2) as i32, (sample_height / 2) as i32),
        Point::new(
            (sample_width / 2) as i32,
            height as i32 - (sample_height / 2) as i32 - 1,
        ),
        Point::new(
            width as i32 - (sample_width / 2) as i32 - 1,
            height as i32 - (sample_height / 2) as i32 - 1,
        ),
    ];

    positions
        .iter()
        .map(|&position| {
            let color = median_pixel(
                image,
                position.x - (sample_width / 2) as i32,
                position.y - (sample_height / 2) as i32,
                sample_width,
                sample_height,
                ColorSpace::Rgb,
            );
            log::debug!("Auto anchor at ({}, {}): {:?}", position.x, position.y, color);
            AnchorPoint::new(position, color)
        })
        .collect()
}

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Owned, versioned set of anchor points.
///
/// Versions are unique across all tables in the process, so a cache keyed
/// by version can never confuse two tables.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorTable {
    anchors: Vec<AnchorPoint>,
    version: u64,
}

impl Default for AnchorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorTable {
    pub fn new() -> Self {
        Self {
            anchors: Vec::new(),
            version: next_version(),
        }
    }

    /// Sample every point on `image` and replace the working set.
    pub fn set_anchors<V: ImageView + ?Sized>(&mut self, points: &[Point], image: &V, sample_radius: usize) {
        let anchors = points
            .iter()
            .map(|&point| {
                if !image.is_inside(point.x, point.y) {
                    log::warn!(
                        "Anchor ({}, {}) lies outside the {}x{} image",
                        point.x,
                        point.y,
                        image.width(),
                        image.height()
                    );
                }
                AnchorPoint::new(point, sample_anchor_color(image, point, sample_radius))
            })
            .collect();
        self.replace(anchors);
    }

    /// Replace the working set with explicitly colored points.
    pub fn set_anchor_colors(&mut self, points: &[Point], colors: &[Sample]) -> Result<()> {
        if points.len() != colors.len() {
            return Err(GradientError::AnchorColorMismatch {
                points: points.len(),
                colors: colors.len(),
            });
        }
        let anchors = points
            .iter()
            .zip(colors)
            .map(|(&point, &color)| AnchorPoint::new(point, color))
            .collect();
        self.replace(anchors);
        Ok(())
    }

    /// Replace the working set.
    pub fn replace(&mut self, anchors: Vec<AnchorPoint>) {
        self.anchors = anchors;
        self.version = next_version();
        log::debug!(
            "Anchor table now holds {} anchors (version {})",
            self.anchors.len(),
            self.version
        );
    }

    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
