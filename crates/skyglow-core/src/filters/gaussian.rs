//! Gaussian blur approximated by three successive box blurs
//!
//! The ideal box width `sqrt(12 sigma^2 / n + 1)` is rounded down to an odd
//! `wl`. The first `m` passes use `wl` and the rest `wl + 2`, with `m` chosen
//! so the summed variance matches `sigma^2`.

use crate::error::Result;
use crate::image::Image;
use crate::parallel::CancelToken;

use super::box_blur::box_blur;

/// Number of box passes used to approximate a Gaussian.
pub const GAUSSIAN_PASSES: usize = 3;

/// Odd box widths whose successive application approximates a Gaussian of
/// standard deviation `sigma`.
pub fn box_sizes_for_gauss(sigma: f64, passes: usize) -> Vec<usize> {
    let n = passes as f64;
    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = ideal.floor();
    if wl % 2.0 == 0.0 {
        wl -= 1.0;
    }
    let wu = wl + 2.0;

    let m_ideal = (12.0 * sigma * sigma - n * wl * wl - 4.0 * n * wl - 3.0 * n) / (-4.0 * wl - 4.0);
    let m = m_ideal.round();

    (0..passes)
        .map(|i| if (i as f64) < m { wl } else { wu })
        .map(|w| w.max(1.0) as usize)
        .collect()
}

/// Box radius for an odd box width.
#[inline]
pub fn box_radius(width: usize) -> usize {
    width.saturating_sub(1) / 2
}

/// Approximate Gaussian blur with standard deviation `sigma`, in place.
pub fn gaussian_blur(
    image: &mut Image,
    sigma: usize,
    parallel: bool,
    cancel: Option<&CancelToken>,
) -> Result<()> {
    if sigma == 0 {
        return Ok(());
    }

    let sizes = box_sizes_for_gauss(sigma as f64, GAUSSIAN_PASSES);
    log::debug!("Gaussian sigma={} via box widths {:?}", sigma, sizes);

    for size in sizes {
        box_blur(image, box_radius(size), parallel, cancel)?;
    }
    Ok(())
}
