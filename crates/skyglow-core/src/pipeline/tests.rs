//! End-to-end tests for the removal pipeline

use super::*;
use crate::correction::CurveCorrection;
use crate::filters::LowPassFilter;
use crate::image::ImageViewMut;
use crate::points::PointStrategy;

fn settings(estimator: GradientEstimator, correction: CurveCorrection) -> RemovalSettings {
    RemovalSettings {
        estimator,
        correction,
        removal_factor: 1.0,
        sample_radius: 0,
        parallel: false,
    }
}

fn interpolation(strategy: PointStrategy) -> GradientEstimator {
    GradientEstimator::Interpolation {
        power: 3.0,
        strategy,
    }
}

fn all_close(image: &Image, expected: [f32; 3], tol: f32) -> bool {
    image
        .data()
        .chunks_exact(3)
        .all(|px| (0..3).all(|c| (px[c] - expected[c]).abs() < tol))
}

// ========================================================================
// Validation
// ========================================================================

#[test]
fn test_interpolation_without_anchors_fails() {
    let remover = GradientRemover::new(settings(
        interpolation(PointStrategy::All),
        CurveCorrection::Simple,
    ))
    .unwrap();
    let input = Image::filled(4, 4, ColorSpace::Rgb, [0.5; 3]);

    assert_eq!(remover.remove_gradient(&input).unwrap_err(), GradientError::NoAnchors);
}

#[test]
fn test_negative_sample_radius_rejected() {
    let mut bad = RemovalSettings::default();
    bad.sample_radius = -1;
    assert_eq!(
        GradientRemover::new(bad.clone()).unwrap_err(),
        GradientError::InvalidSampleRadius(-1)
    );

    let mut remover = GradientRemover::default();
    assert!(remover.set_settings(bad).is_err());
    assert_eq!(remover.settings(), &RemovalSettings::default());
}

#[test]
fn test_invalid_removal_factor_rejected() {
    let mut bad = RemovalSettings::default();
    bad.removal_factor = f64::NAN;
    assert!(matches!(
        bad.validate(),
        Err(GradientError::InvalidParameter { name: "removal_factor", .. })
    ));
}

#[test]
fn test_invalid_spline_rejected_before_pass() {
    let remover = GradientRemover::new(settings(
        interpolation(PointStrategy::All),
        CurveCorrection::Spline {
            shaping_factor: 0.01,
            stretch_points: vec![(0.7, 0.5), (0.3, 0.6)],
        },
    ));
    assert!(matches!(remover, Err(GradientError::InvalidSpline(_))));
}

#[test]
fn test_nearest_zero_rejected() {
    let remover = GradientRemover::new(settings(
        interpolation(PointStrategy::Nearest { count: 0 }),
        CurveCorrection::Simple,
    ));
    assert!(remover.is_err());
}

// ========================================================================
// End to end
// ========================================================================

#[test]
fn test_uniform_image_single_anchor() {
    let input = Image::filled(4, 4, ColorSpace::Rgb, [0.5; 3]);
    let mut remover = GradientRemover::new(settings(
        interpolation(PointStrategy::All),
        CurveCorrection::Simple,
    ))
    .unwrap();
    remover.set_anchors(&[Point::new(2, 2)], &input).unwrap();

    let result = remover.remove_gradient(&input).unwrap();
    assert!(all_close(&result.gradient, [0.5; 3], 1e-6));
    assert!(all_close(&result.output, [0.0; 3], 1e-6));
}

#[test]
fn test_removal_factor_scales_gradient() {
    let input = Image::filled(6, 6, ColorSpace::Rgb, [0.8; 3]);
    let mut s = settings(interpolation(PointStrategy::All), CurveCorrection::Simple);
    s.removal_factor = 0.5;
    let mut remover = GradientRemover::new(s).unwrap();
    remover.set_anchor_colors(&[Point::new(0, 0)], &[[0.4; 3]]).unwrap();

    let result = remover.remove_gradient(&input).unwrap();
    assert!(all_close(&result.gradient, [0.2; 3], 1e-6));
    assert!(all_close(&result.output, [0.6; 3], 1e-6));
}

#[test]
fn test_linear_gradient_removed() {
    // Horizontal ramp from 0.2 to 0.5 on top of a constant 0.1 signal
    let width = 31;
    let mut input = Image::new(width, 5, ColorSpace::Rgb);
    for y in 0..5 {
        for x in 0..width {
            let g = 0.2 + 0.3 * x as f32 / (width - 1) as f32;
            input.set_rgb(x as i32, y, [g + 0.1; 3]);
        }
    }

    let mut remover = GradientRemover::new(settings(
        interpolation(PointStrategy::Nearest { count: 2 }),
        CurveCorrection::Simple,
    ))
    .unwrap();
    remover
        .set_anchor_colors(&[Point::new(0, 2), Point::new(30, 2)], &[[0.2; 3], [0.5; 3]])
        .unwrap();

    let result = remover.remove_gradient(&input).unwrap();
    // Ends match exactly; the blend between them is not linear
    assert!((result.output.get_native(0, 2)[0] - 0.1).abs() < 1e-5);
    assert!((result.output.get_native(30, 2)[0] - 0.1).abs() < 1e-5);
    assert!((result.output.get_native(15, 2)[0] - 0.1).abs() < 1e-5, "midpoint blends evenly");
}

#[test]
fn test_negative_anchor_coordinates_resolve() {
    let mut input = Image::filled(10, 8, ColorSpace::Rgb, [0.1; 3]);
    input.set_rgb(9, 7, [0.9; 3]);

    let mut remover = GradientRemover::new(settings(
        interpolation(PointStrategy::All),
        CurveCorrection::Simple,
    ))
    .unwrap();
    remover.set_anchors(&[Point::new(-1, -1)], &input).unwrap();

    let anchor = remover.anchors()[0];
    assert_eq!(anchor.position, Point::new(9, 7));
    assert_eq!(anchor.color, [0.9; 3]);
}

#[test]
fn test_sample_radius_averages_window() {
    let mut input = Image::filled(5, 5, ColorSpace::Rgb, [0.0; 3]);
    input.set_rgb(2, 2, [0.9; 3]);

    let mut s = settings(interpolation(PointStrategy::All), CurveCorrection::Simple);
    s.sample_radius = 1;
    let mut remover = GradientRemover::new(s).unwrap();
    remover.set_anchors(&[Point::new(2, 2)], &input).unwrap();

    assert!((remover.anchors()[0].color[0] - 0.1).abs() < 1e-6);
}

#[test]
fn test_voronoi_triangle() {
    let input = Image::filled(101, 101, ColorSpace::Rgb, [0.5; 3]);
    let mut remover = GradientRemover::new(settings(
        interpolation(PointStrategy::Voronoi),
        CurveCorrection::Simple,
    ))
    .unwrap();
    remover
        .set_anchor_colors(
            &[Point::new(0, 0), Point::new(100, 0), Point::new(50, 100)],
            &[[0.2; 3], [0.3; 3], [0.4; 3]],
        )
        .unwrap();

    let relevant = remover.selector().relevant_anchors_for(Point::new(1, 1));
    assert_eq!(relevant.len(), 3, "a single triangle links every corner");

    let result = remover.remove_gradient(&input).unwrap();
    let near_first = result.gradient.get_native(0, 0)[0];
    assert!(near_first < 0.25, "first anchor should dominate, got {}", near_first);
    assert!(result
        .gradient
        .data()
        .iter()
        .all(|v| *v >= 0.2 - 1e-6 && *v <= 0.4 + 1e-6));
}

#[test]
fn test_auto_anchors() {
    let input = Image::filled(50, 40, ColorSpace::Rgb, [0.3, 0.2, 0.1]);
    let mut remover = GradientRemover::default();
    remover.set_auto_anchors(&input);
    assert_eq!(remover.anchors().len(), 3);

    let result = remover.remove_gradient(&input).unwrap();
    assert!(all_close(&result.output, [0.0; 3], 1e-6));
}

#[test]
fn test_low_pass_estimator_needs_no_anchors() {
    let input = Image::filled(12, 9, ColorSpace::Rgb, [0.4, 0.3, 0.2]);
    let remover = GradientRemover::new(settings(
        GradientEstimator::LowPass {
            filter: LowPassFilter::GaussianBlur { radius: 2 },
            color_space: ColorSpace::Hsv,
        },
        CurveCorrection::Simple,
    ))
    .unwrap();

    let result = remover.remove_gradient(&input).unwrap();
    assert_eq!(result.gradient.color_space(), ColorSpace::Rgb);
    assert!(all_close(&result.gradient, [0.4, 0.3, 0.2], 1e-5));
    assert!(all_close(&result.output, [0.0; 3], 1e-5));
}

#[test]
fn test_low_pass_median_removes_star() {
    let mut input = Image::filled(15, 15, ColorSpace::Rgb, [0.2; 3]);
    input.set_rgb(7, 7, [1.0; 3]);
    let remover = GradientRemover::new(settings(
        GradientEstimator::LowPass {
            filter: LowPassFilter::Median { radius: 2 },
            color_space: ColorSpace::Rgb,
        },
        CurveCorrection::Linear,
    ))
    .unwrap();

    let result = remover.remove_gradient(&input).unwrap();
    let star = result.output.get_native(7, 7)[0];
    assert!((star - 1.0).abs() < 1e-5, "star should survive, got {}", star);
    assert!(result.output.get_native(0, 0)[0].abs() < 1e-5);
}

#[test]
fn test_cancelled_pass() {
    let input = Image::filled(8, 8, ColorSpace::Rgb, [0.5; 3]);
    let token = CancelToken::new();
    let mut remover = GradientRemover::default().with_cancel(token.clone());
    remover.set_anchors(&[Point::new(1, 1)], &input).unwrap();

    token.cancel();
    assert_eq!(remover.remove_gradient(&input).unwrap_err(), GradientError::Cancelled);
}

#[test]
fn test_settings_change_keeps_anchors() {
    let input = Image::filled(8, 8, ColorSpace::Rgb, [0.5; 3]);
    let mut remover = GradientRemover::default();
    remover
        .set_anchor_colors(
            &[Point::new(0, 0), Point::new(7, 0), Point::new(0, 7), Point::new(7, 7)],
            &[[0.1; 3]; 4],
        )
        .unwrap();

    remover
        .set_settings(settings(interpolation(PointStrategy::Voronoi), CurveCorrection::Simple))
        .unwrap();
    assert_eq!(remover.anchors().len(), 4);
    assert!(remover.selector().triangulation().is_some());

    let result = remover.remove_gradient(&input).unwrap();
    assert!(all_close(&result.output, [0.4; 3], 1e-6));
}
