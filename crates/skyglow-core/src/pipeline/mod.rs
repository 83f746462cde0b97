//! Gradient removal pipeline
//!
//! A pass runs in four steps:
//! 1. validate settings (and anchors when interpolating)
//! 2. estimate the gradient, either from anchors or by low-pass filtering
//!    the input
//! 3. scale the gradient by the removal factor
//! 4. combine input and gradient with the curve correction
//!
//! Both the scaled gradient and the corrected output are returned.

mod settings;

#[cfg(test)]
mod tests;

pub use settings::{GradientEstimator, RemovalSettings, DEFAULT_SAMPLE_RADIUS};

use std::time::Instant;

use crate::anchors::{auto_anchor_points, AnchorPoint, AnchorTable, Point};
use crate::color::{ColorSpace, Sample};
use crate::error::{GradientError, Result};
use crate::gradient::GradientInterpolator;
use crate::image::{Image, ImageView};
use crate::parallel::{for_each_value, CancelToken};
use crate::points::RelevanceSelector;

/// Result of a removal pass, both stored in RGB
#[derive(Debug, Clone)]
pub struct RemovalOutput {
    /// Estimated gradient after scaling by the removal factor
    pub gradient: Image,
    /// Corrected image
    pub output: Image,
}

/// Estimates and removes the background gradient of images.
#[derive(Debug, Clone)]
pub struct GradientRemover {
    settings: RemovalSettings,
    selector: RelevanceSelector,
    cancel: Option<CancelToken>,
}

impl Default for GradientRemover {
    fn default() -> Self {
        Self {
            settings: RemovalSettings::default(),
            selector: RelevanceSelector::default(),
            cancel: None,
        }
    }
}

impl GradientRemover {
    pub fn new(settings: RemovalSettings) -> Result<Self> {
        settings.validate()?;
        let selector = RelevanceSelector::new(settings.estimator.strategy());
        Ok(Self {
            settings,
            selector,
            cancel: None,
        })
    }

    /// Check `cancel` between rows of every pass.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn settings(&self) -> &RemovalSettings {
        &self.settings
    }

    /// Replace the settings, keeping the current anchors.
    pub fn set_settings(&mut self, settings: RemovalSettings) -> Result<()> {
        settings.validate()?;
        self.selector.set_strategy(settings.estimator.strategy());
        self.settings = settings;
        Ok(())
    }

    pub fn selector(&self) -> &RelevanceSelector {
        &self.selector
    }

    pub fn anchors(&self) -> &[AnchorPoint] {
        self.selector.anchors()
    }

    /// Sample anchor colors from `image` and install them.
    ///
    /// Negative coordinates are measured from the right/bottom edge.
    pub fn set_anchors<V: ImageView + ?Sized>(&mut self, points: &[Point], image: &V) -> Result<()> {
        let radius = self.settings.sample_radius()?;
        let resolved: Vec<Point> = points
            .iter()
            .map(|p| p.resolve(image.width(), image.height()))
            .collect();

        let mut table = AnchorTable::new();
        table.set_anchors(&resolved, image, radius);
        self.selector.set_anchors(table);
        Ok(())
    }

    /// Install anchors with explicit colors.
    pub fn set_anchor_colors(&mut self, points: &[Point], colors: &[Sample]) -> Result<()> {
        let mut table = AnchorTable::new();
        table.set_anchor_colors(points, colors)?;
        self.selector.set_anchors(table);
        Ok(())
    }

    /// Install the three automatically placed anchors for `image`.
    pub fn set_auto_anchors<V: ImageView + ?Sized>(&mut self, image: &V) {
        let mut table = AnchorTable::new();
        table.replace(auto_anchor_points(image));
        self.selector.set_anchors(table);
    }

    /// Estimate the unscaled gradient of `input` as an RGB image.
    pub fn estimate_gradient<V: ImageView + Sync + ?Sized>(&self, input: &V) -> Result<Image> {
        let parallel = self.settings.parallel;
        let cancel = self.cancel.as_ref();

        match self.settings.estimator {
            GradientEstimator::Interpolation { power, .. } => {
                let interpolator = GradientInterpolator::new(&self.selector, power)?;
                interpolator.render_image(input.width(), input.height(), parallel, cancel)
            }
            GradientEstimator::LowPass {
                filter,
                color_space,
            } => {
                let filtered = filter.apply(input, color_space, parallel, cancel)?;
                if filtered.color_space() == ColorSpace::Rgb {
                    Ok(filtered)
                } else {
                    Ok(Image::from_view(&filtered, ColorSpace::Rgb))
                }
            }
        }
    }

    /// Run a full removal pass on `input`.
    pub fn remove_gradient<V: ImageView + Sync + ?Sized>(&self, input: &V) -> Result<RemovalOutput> {
        self.settings.validate()?;
        if self.settings.estimator.uses_anchors() && self.selector.anchors().is_empty() {
            return Err(GradientError::NoAnchors);
        }

        let (width, height) = (input.width(), input.height());
        log::info!(
            "Removing gradient from {}x{} image ({} anchors, {} correction)",
            width,
            height,
            self.selector.anchors().len(),
            self.settings.correction.name()
        );

        let start = Instant::now();
        let mut gradient = self.estimate_gradient(input)?;
        log::debug!("Gradient estimated in {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);

        let factor = self.settings.removal_factor as f32;
        if factor != 1.0 {
            for_each_value(gradient.data_mut(), self.settings.parallel, |v| *v *= factor);
        }

        let start = Instant::now();
        let mut output = Image::new(width, height, ColorSpace::Rgb);
        self.settings.correction.apply(
            input,
            &gradient,
            &mut output,
            self.settings.parallel,
            self.cancel.as_ref(),
        )?;
        log::debug!("Correction applied in {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);

        Ok(RemovalOutput { gradient, output })
    }
}
