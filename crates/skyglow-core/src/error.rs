//! Error types for gradient estimation and removal.

use thiserror::Error;

/// Errors raised while configuring or running a gradient removal pass.
///
/// Every variant is reported before any pixel is written, except
/// [`GradientError::Cancelled`] which can interrupt a running pass.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GradientError {
    #[error("Interpolation requires at least one anchor point")]
    NoAnchors,

    #[error("Invalid sample radius: {0} (must be >= 0)")]
    InvalidSampleRadius(i64),

    #[error("Invalid spline: {0}")]
    InvalidSpline(String),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Anchor count {points} does not match color count {colors}")]
    AnchorColorMismatch { points: usize, colors: usize },

    #[error("Buffer of {actual} samples does not fit a {width}x{height} RGB image")]
    BufferSize {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("Image dimensions differ: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Processing cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GradientError>;

impl GradientError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        GradientError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
