//! Color space tag and sample conversion dispatch

use serde::{Deserialize, Serialize};

use super::hsv::{hsv_to_rgb, rgb_to_hsv};
use super::Sample;

/// Color space a sample is stored or requested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Red, green, blue in 0.0-1.0
    #[default]
    Rgb,

    /// Hue in degrees 0.0-360.0, saturation and value in 0.0-1.0
    Hsv,
}

impl ColorSpace {
    /// Get the color space name as a string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rgb => "RGB",
            Self::Hsv => "HSV",
        }
    }
}

impl std::str::FromStr for ColorSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rgb" => Ok(Self::Rgb),
            "hsv" | "hsb" => Ok(Self::Hsv),
            _ => Err(format!("Unknown color space: {}", s)),
        }
    }
}

impl std::fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a sample from one color space to another.
///
/// Identity when both spaces match.
#[inline]
pub fn convert(sample: Sample, from: ColorSpace, to: ColorSpace) -> Sample {
    match (from, to) {
        (ColorSpace::Rgb, ColorSpace::Hsv) => rgb_to_hsv(sample),
        (ColorSpace::Hsv, ColorSpace::Rgb) => hsv_to_rgb(sample),
        _ => sample,
    }
}
