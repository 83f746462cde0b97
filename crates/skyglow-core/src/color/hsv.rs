//! HSV (Hue-Saturation-Value) conversions

use super::{Sample, B, G, H, R, S, V};

/// Convert RGB to HSV
///
/// Input: RGB values in range 0.0-1.0
/// Output: `[h, s, v]` where H is 0.0-360.0, S and V are 0.0-1.0.
/// Zero saturation (gray, black) reports hue 0.
#[inline]
pub fn rgb_to_hsv(rgb: Sample) -> Sample {
    let (r, g, b) = (rgb[R], rgb[G], rgb[B]);

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max != 0.0 { delta / max } else { 0.0 };

    if s == 0.0 || delta == 0.0 {
        return [0.0, s, v];
    }

    let h = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };

    let mut h = h * 60.0;
    if h < 0.0 {
        h += 360.0;
    }
    if h >= 360.0 {
        h -= 360.0;
    }

    [h, s, v]
}

/// Convert HSV to RGB
///
/// Hue is wrapped into 0.0-360.0 first, so negative or oversized hues are
/// accepted.
#[inline]
pub fn hsv_to_rgb(hsv: Sample) -> Sample {
    let (h, s, v) = (hsv[H], hsv[S], hsv[V]);

    if s == 0.0 {
        return [v, v, v];
    }

    let mut h = ((h % 360.0) + 360.0) % 360.0;
    if h >= 360.0 {
        h = 0.0;
    }
    let hh = h / 60.0;
    let sector = hh.floor();
    let f = hh - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u32 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// HSV value (brightness) of an RGB sample
#[inline]
pub fn value_of(rgb: Sample) -> f32 {
    rgb[R].max(rgb[G]).max(rgb[B])
}
