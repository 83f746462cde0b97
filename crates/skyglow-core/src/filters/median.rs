//! Median filters
//!
//! The 2-D filter takes the per-channel median of the window. The 1-D
//! filters pick a whole sample: pixels along the line are ordered by
//! channel 2, then 1, then 0 (value first when working in HSV) and the
//! element at `n / 2` is kept.

use std::cmp::Ordering;

use crate::color::Sample;
use crate::error::Result;
use crate::image::{per_channel_median, Image};
use crate::parallel::{for_each_row, CancelToken};

/// Direction of a 1-D median pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[inline]
fn sample_at(data: &[f32], width: usize, x: usize, y: usize) -> Sample {
    let i = (y * width + x) * 3;
    [data[i], data[i + 1], data[i + 2]]
}

/// Ordering used by the 1-D medians.
#[inline]
fn value_order(a: &Sample, b: &Sample) -> Ordering {
    a[2].total_cmp(&b[2])
        .then(a[1].total_cmp(&b[1]))
        .then(a[0].total_cmp(&b[0]))
}

/// Per-channel median over a `(2r+1) x (2r+1)` window of in-bounds pixels.
pub fn median_filter(
    source: &Image,
    radius: usize,
    parallel: bool,
    cancel: Option<&CancelToken>,
) -> Result<Image> {
    let (width, height) = source.dimensions();
    let data = source.data();
    let mut target = source.blank_like();
    let row_len = target.row_len();

    for_each_row(target.data_mut(), row_len, parallel, cancel, |y, row| {
        let mut window: Vec<Sample> = Vec::with_capacity((2 * radius + 1).pow(2));
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius).min(height - 1);
        for x in 0..width {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius).min(width - 1);
            window.clear();
            for yy in y0..=y1 {
                for xx in x0..=x1 {
                    window.push(sample_at(data, width, xx, yy));
                }
            }
            row[x * 3..x * 3 + 3].copy_from_slice(&per_channel_median(&window));
        }
    })?;

    Ok(target)
}

/// 1-D median along rows or columns over `2r+1` in-bounds pixels.
pub fn line_median_filter(
    source: &Image,
    radius: usize,
    axis: Axis,
    parallel: bool,
    cancel: Option<&CancelToken>,
) -> Result<Image> {
    let (width, height) = source.dimensions();
    let data = source.data();
    let mut target = source.blank_like();
    let row_len = target.row_len();

    for_each_row(target.data_mut(), row_len, parallel, cancel, |y, row| {
        let mut line: Vec<Sample> = Vec::with_capacity(2 * radius + 1);
        for x in 0..width {
            line.clear();
            match axis {
                Axis::Horizontal => {
                    let x0 = x.saturating_sub(radius);
                    let x1 = (x + radius).min(width - 1);
                    line.extend((x0..=x1).map(|xx| sample_at(data, width, xx, y)));
                }
                Axis::Vertical => {
                    let y0 = y.saturating_sub(radius);
                    let y1 = (y + radius).min(height - 1);
                    line.extend((y0..=y1).map(|yy| sample_at(data, width, x, yy)));
                }
            }
            let mid = line.len() / 2;
            let (_, median, _) = line.select_nth_unstable_by(mid, value_order);
            row[x * 3..x * 3 + 3].copy_from_slice(&median[..]);
        }
    })?;

    Ok(target)
}

/// Horizontal median followed by a vertical median.
pub fn pseudo_median_filter(
    source: &Image,
    radius: usize,
    parallel: bool,
    cancel: Option<&CancelToken>,
) -> Result<Image> {
    let horizontal = line_median_filter(source, radius, Axis::Horizontal, parallel, cancel)?;
    line_median_filter(&horizontal, radius, Axis::Vertical, parallel, cancel)
}
