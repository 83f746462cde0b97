//! Tunables of a removal pass

use serde::{Deserialize, Serialize};

use crate::color::ColorSpace;
use crate::correction::CurveCorrection;
use crate::error::{GradientError, Result};
use crate::filters::LowPassFilter;
use crate::gradient::DEFAULT_INTERPOLATION_POWER;
use crate::points::PointStrategy;

/// Default anchor sample radius in pixels
pub const DEFAULT_SAMPLE_RADIUS: i64 = 5;

/// How the background gradient is estimated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GradientEstimator {
    /// Blend anchor colors by inverse distance
    Interpolation {
        power: f64,
        strategy: PointStrategy,
    },

    /// Heavy low-pass filter of the input itself
    LowPass {
        filter: LowPassFilter,
        color_space: ColorSpace,
    },
}

impl Default for GradientEstimator {
    fn default() -> Self {
        GradientEstimator::Interpolation {
            power: DEFAULT_INTERPOLATION_POWER,
            strategy: PointStrategy::All,
        }
    }
}

impl GradientEstimator {
    /// Relevance strategy used for anchor selection, `All` for low-pass
    /// estimation where anchors are not consulted.
    pub fn strategy(&self) -> PointStrategy {
        match self {
            GradientEstimator::Interpolation { strategy, .. } => *strategy,
            GradientEstimator::LowPass { .. } => PointStrategy::All,
        }
    }

    pub fn uses_anchors(&self) -> bool {
        matches!(self, GradientEstimator::Interpolation { .. })
    }
}

/// Settings of a [`GradientRemover`](super::GradientRemover).
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalSettings {
    pub estimator: GradientEstimator,
    pub correction: CurveCorrection,
    /// Scale applied to the estimated gradient before correction
    pub removal_factor: f64,
    /// Half-size of the window averaged around each anchor
    pub sample_radius: i64,
    pub parallel: bool,
}

impl Default for RemovalSettings {
    fn default() -> Self {
        Self {
            estimator: GradientEstimator::default(),
            correction: CurveCorrection::default(),
            removal_factor: 1.0,
            sample_radius: DEFAULT_SAMPLE_RADIUS,
            parallel: true,
        }
    }
}

impl RemovalSettings {
    /// Reject settings a pass cannot run with.
    ///
    /// Anchor presence is checked separately when the pass starts.
    pub fn validate(&self) -> Result<()> {
        if self.sample_radius < 0 {
            return Err(GradientError::InvalidSampleRadius(self.sample_radius));
        }
        if !self.removal_factor.is_finite() || self.removal_factor < 0.0 {
            return Err(GradientError::invalid(
                "removal_factor",
                format!("must be finite and >= 0, got {}", self.removal_factor),
            ));
        }
        if let GradientEstimator::Interpolation { power, strategy } = &self.estimator {
            if !power.is_finite() {
                return Err(GradientError::invalid(
                    "interpolation_power",
                    format!("must be finite, got {}", power),
                ));
            }
            strategy.validate()?;
        }
        self.correction.validate()
    }

    /// Sample radius as a window half-size.
    pub(crate) fn sample_radius(&self) -> Result<usize> {
        usize::try_from(self.sample_radius)
            .map_err(|_| GradientError::InvalidSampleRadius(self.sample_radius))
    }
}
