//! Aggregate queries over a rectangular window
//!
//! Only pixels that really lie inside the image take part; clamped edge
//! replicas never count. A window with no pixel inside the image yields
//! the neutral sample `[0.0, 0.0, 0.0]`.

use crate::color::{value_of, ColorSpace, Sample};

use super::ImageView;

/// Collect the in-bounds samples of a window, in `space`.
fn collect_window<V: ImageView + ?Sized>(
    image: &V,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    space: ColorSpace,
) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(width * height);
    for dy in 0..height as i32 {
        for dx in 0..width as i32 {
            let (xx, yy) = (x + dx, y + dy);
            if image.is_inside(xx, yy) {
                samples.push(image.get(xx, yy, space));
            }
        }
    }
    samples
}

/// Channel-wise mean over the in-bounds pixels of the window.
pub fn average_pixel<V: ImageView + ?Sized>(
    image: &V,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    space: ColorSpace,
) -> Sample {
    let mut sum = [0.0f64; 3];
    let mut count = 0usize;

    for dy in 0..height as i32 {
        for dx in 0..width as i32 {
            let (xx, yy) = (x + dx, y + dy);
            if image.is_inside(xx, yy) {
                let sample = image.get(xx, yy, space);
                sum[0] += sample[0] as f64;
                sum[1] += sample[1] as f64;
                sum[2] += sample[2] as f64;
                count += 1;
            }
        }
    }

    if count == 0 {
        return [0.0; 3];
    }

    let n = count as f64;
    [(sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32]
}

/// Per-channel median over the in-bounds pixels of the window.
///
/// Each channel is sorted on its own and the element at `n / 2` is picked,
/// so the result can combine channels from different pixels.
pub fn median_pixel<V: ImageView + ?Sized>(
    image: &V,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    space: ColorSpace,
) -> Sample {
    let samples = collect_window(image, x, y, width, height, space);
    per_channel_median(&samples)
}

pub(crate) fn per_channel_median(samples: &[Sample]) -> Sample {
    if samples.is_empty() {
        return [0.0; 3];
    }

    let mut result = [0.0; 3];
    let mut channel: Vec<f32> = Vec::with_capacity(samples.len());
    for (c, out) in result.iter_mut().enumerate() {
        channel.clear();
        channel.extend(samples.iter().map(|s| s[c]));
        let mid = channel.len() / 2;
        let (_, median, _) = channel.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        *out = *median;
    }
    result
}

/// Vector median: the in-bounds sample with the smallest summed Euclidean
/// distance to every other sample of the window.
///
/// Unlike [`median_pixel`] the result is always a color that occurs in the
/// window. Ties resolve to the first sample in row-major order.
pub fn vector_median_pixel<V: ImageView + ?Sized>(
    image: &V,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    space: ColorSpace,
) -> Sample {
    let samples = collect_window(image, x, y, width, height, space);

    let mut best: Option<(f64, Sample)> = None;
    for candidate in &samples {
        let total: f64 = samples
            .iter()
            .map(|other| {
                let d0 = (candidate[0] - other[0]) as f64;
                let d1 = (candidate[1] - other[1]) as f64;
                let d2 = (candidate[2] - other[2]) as f64;
                (d0 * d0 + d1 * d1 + d2 * d2).sqrt()
            })
            .sum();
        if best.map_or(true, |(best_total, _)| total < best_total) {
            best = Some((total, *candidate));
        }
    }

    best.map_or([0.0; 3], |(_, sample)| sample)
}

/// The in-bounds sample with the lowest HSV value.
pub fn darkest_pixel<V: ImageView + ?Sized>(
    image: &V,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    space: ColorSpace,
) -> Sample {
    extreme_by_value(image, x, y, width, height, space, |candidate, best| {
        candidate < best
    })
}

/// The in-bounds sample with the highest HSV value.
pub fn brightest_pixel<V: ImageView + ?Sized>(
    image: &V,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    space: ColorSpace,
) -> Sample {
    extreme_by_value(image, x, y, width, height, space, |candidate, best| {
        candidate > best
    })
}

fn extreme_by_value<V, F>(
    image: &V,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    space: ColorSpace,
    better: F,
) -> Sample
where
    V: ImageView + ?Sized,
    F: Fn(f32, f32) -> bool,
{
    let mut best: Option<(f32, Sample)> = None;
    for dy in 0..height as i32 {
        for dx in 0..width as i32 {
            let (xx, yy) = (x + dx, y + dy);
            if !image.is_inside(xx, yy) {
                continue;
            }
            let value = value_of(image.get_rgb(xx, yy));
            if best.map_or(true, |(best_value, _)| better(value, best_value)) {
                best = Some((value, image.get(xx, yy, space)));
            }
        }
    }
    best.map_or([0.0; 3], |(_, sample)| sample)
}
