//! Color spaces and sample conversions
//!
//! Provides the color space tag shared by every image, and conversions
//! between RGB and HSV samples.

mod conversions;
mod hsv;


pub use conversions::{convert, ColorSpace};
pub use hsv::{hsv_to_rgb, rgb_to_hsv, value_of};

/// A single 3-channel sample.
///
/// Channel meaning depends on the color space it was read in:
/// RGB is `[r, g, b]` in 0.0-1.0, HSV is `[h, s, v]` with hue in degrees.
pub type Sample = [f32; 3];

/// Channel indices for RGB samples
pub const R: usize = 0;
pub const G: usize = 1;
pub const B: usize = 2;

/// Channel indices for HSV samples
pub const H: usize = 0;
pub const S: usize = 1;
pub const V: usize = 2;
