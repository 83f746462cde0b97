//! Skyglow Core Library
//!
//! Estimation and removal of smooth background gradients (sky glow,
//! vignetting) in astrophotography images.
//!
//! The usual flow:
//! 1. pick anchor points that show pure background
//! 2. let a [`GradientRemover`] sample them and interpolate a gradient
//!    across the frame (or low-pass filter the image instead)
//! 3. subtract that gradient with a [`CurveCorrection`]

pub mod analysis;
pub mod anchors;
pub mod color;
pub mod config;
pub mod correction;
pub mod error;
pub mod filters;
pub mod gradient;
pub mod image;
pub mod parallel;
pub mod pipeline;
pub mod points;
pub mod spline;

// Re-export commonly used types
pub use anchors::{AnchorPoint, AnchorTable, Point};
pub use color::{ColorSpace, Sample};
pub use config::{load_removal_config, RemovalConfig};
pub use correction::CurveCorrection;
pub use error::{GradientError, Result};
pub use filters::LowPassFilter;
pub use gradient::GradientInterpolator;
pub use image::{Image, ImageView, ImageViewMut, Rgb8Image};
pub use parallel::CancelToken;
pub use pipeline::{GradientEstimator, GradientRemover, RemovalOutput, RemovalSettings};
pub use points::{PointStrategy, RelevanceSelector};
pub use spline::MonotoneCubicSpline;
