//! Separable box blur with O(1) sliding sums

use crate::error::Result;
use crate::image::{Image, ImageView};
use crate::parallel::{for_each_row, CancelToken};

/// Mean over a `(2r+1) x (2r+1)` window, in place.
///
/// Runs a horizontal pass, then the same pass over the transposed buffer.
/// Samples beyond the border replicate the first/last pixel of the line.
pub fn box_blur(
    image: &mut Image,
    radius: usize,
    parallel: bool,
    cancel: Option<&CancelToken>,
) -> Result<()> {
    if radius == 0 || image.width() == 0 || image.height() == 0 {
        return Ok(());
    }

    let (width, height) = image.dimensions();
    blur_rows(image.data_mut(), width, radius, parallel, cancel)?;

    let mut transposed = transpose(image.data(), width, height);
    blur_rows(&mut transposed, height, radius, parallel, cancel)?;
    let restored = transpose(&transposed, height, width);
    image.data_mut().copy_from_slice(&restored);
    Ok(())
}

fn blur_rows(
    data: &mut [f32],
    width: usize,
    radius: usize,
    parallel: bool,
    cancel: Option<&CancelToken>,
) -> Result<()> {
    for_each_row(data, width * 3, parallel, cancel, |_, row| {
        let source = row.to_vec();
        blur_line(&source, row, radius);
    })
}

/// Sliding-window mean over one line of interleaved RGB samples.
pub(crate) fn blur_line(source: &[f32], target: &mut [f32], radius: usize) {
    let len = source.len() / 3;
    if len == 0 {
        return;
    }

    let r = radius as isize;
    let last = len as isize - 1;
    let at = |i: isize, c: usize| source[i.clamp(0, last) as usize * 3 + c] as f64;
    let kernel = (2 * radius + 1) as f64;

    for c in 0..3 {
        let mut sum: f64 = (-r..=r).map(|i| at(i, c)).sum();
        for x in 0..len as isize {
            target[x as usize * 3 + c] = (sum / kernel) as f32;
            sum += at(x + r + 1, c) - at(x - r, c);
        }
    }
}

/// Swap rows and columns of an interleaved RGB buffer.
pub(crate) fn transpose(data: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut out = vec![0.0; data.len()];
    for y in 0..height {
        for x in 0..width {
            let src = (y * width + x) * 3;
            let dst = (x * height + y) * 3;
            out[dst..dst + 3].copy_from_slice(&data[src..src + 3]);
        }
    }
    out
}
