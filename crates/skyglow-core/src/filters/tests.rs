//! Tests for low-pass filters

use super::*;
use crate::image::ImageViewMut;

fn uniform(width: usize, height: usize, value: [f32; 3]) -> Image {
    Image::filled(width, height, ColorSpace::Rgb, value)
}

fn max_abs_diff(a: &Image, b: &Image) -> f32 {
    a.data()
        .iter()
        .zip(b.data())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

fn all_filters(radius: usize) -> [LowPassFilter; 6] {
    [
        LowPassFilter::BoxBlur { radius },
        LowPassFilter::GaussianBlur { radius },
        LowPassFilter::Median { radius },
        LowPassFilter::HorizontalMedian { radius },
        LowPassFilter::VerticalMedian { radius },
        LowPassFilter::PseudoMedian { radius },
    ]
}

// ========================================================================
// Box sizes
// ========================================================================

#[test]
fn test_box_sizes_are_odd() {
    for sigma in [1.0, 2.0, 3.5, 10.0, 50.0] {
        let sizes = box_sizes_for_gauss(sigma, GAUSSIAN_PASSES);
        assert_eq!(sizes.len(), GAUSSIAN_PASSES);
        assert!(sizes.iter().all(|w| w % 2 == 1), "sigma {} gave {:?}", sigma, sizes);
    }
}

#[test]
fn test_box_sizes_known_values() {
    assert_eq!(box_sizes_for_gauss(2.0, 3), vec![3, 3, 5]);
    assert_eq!(box_sizes_for_gauss(5.0, 3), vec![9, 9, 11]);
}

#[test]
fn test_box_sizes_match_variance() {
    let sigma: f64 = 8.0;
    let variance: f64 = box_sizes_for_gauss(sigma, 3)
        .iter()
        .map(|&w| ((w * w) as f64 - 1.0) / 12.0)
        .sum();
    assert!(
        (variance.sqrt() - sigma).abs() < 1.0,
        "approximated sigma {} too far from {}",
        variance.sqrt(),
        sigma
    );
}

#[test]
fn test_box_radius() {
    assert_eq!(box_radius(1), 0);
    assert_eq!(box_radius(3), 1);
    assert_eq!(box_radius(11), 5);
}

// ========================================================================
// Uniform images and identity
// ========================================================================

#[test]
fn test_uniform_image_preserved() {
    let image = uniform(17, 11, [0.25, 0.5, 0.75]);
    for filter in all_filters(3) {
        let result = filter.apply(&image, ColorSpace::Rgb, false, None).unwrap();
        assert!(
            max_abs_diff(&result, &image) < 1e-5,
            "{} changed a uniform image",
            filter
        );
    }
}

#[test]
fn test_radius_zero_is_identity() {
    let mut image = uniform(5, 4, [0.1, 0.2, 0.3]);
    image.set_rgb(2, 1, [0.9, 0.0, 0.4]);
    for filter in all_filters(0) {
        let result = filter.apply(&image, ColorSpace::Rgb, false, None).unwrap();
        assert_eq!(result, image, "{} with radius 0", filter);
    }
}

#[test]
fn test_empty_image() {
    let image = Image::new(0, 0, ColorSpace::Rgb);
    for filter in all_filters(2) {
        let result = filter.apply(&image, ColorSpace::Rgb, false, None).unwrap();
        assert_eq!(result.dimensions(), (0, 0));
    }
}

// ========================================================================
// Box blur
// ========================================================================

#[test]
fn test_box_blur_spreads_impulse() {
    let mut image = uniform(9, 9, [0.0; 3]);
    image.set_rgb(4, 4, [9.0, 9.0, 9.0]);
    box_blur(&mut image, 1, false, None).unwrap();

    for y in 3..=5 {
        for x in 3..=5 {
            let v = image.get_native(x, y)[0];
            assert!((v - 1.0).abs() < 1e-5, "({}, {}) = {}", x, y, v);
        }
    }
    assert!(image.get_native(2, 4)[0].abs() < 1e-6);
    let total: f32 = image.data().iter().step_by(3).sum();
    assert!((total - 9.0).abs() < 1e-4, "mass not preserved: {}", total);
}

#[test]
fn test_box_blur_replicates_edges() {
    let mut image = Image::new(4, 1, ColorSpace::Rgb);
    for (x, v) in [1.0, 0.0, 0.0, 0.0].into_iter().enumerate() {
        image.set_rgb(x as i32, 0, [v; 3]);
    }
    box_blur(&mut image, 1, false, None).unwrap();
    // Left edge window is [1, 1, 0]
    assert!((image.get_native(0, 0)[0] - 2.0 / 3.0).abs() < 1e-6);
    assert!((image.get_native(1, 0)[0] - 1.0 / 3.0).abs() < 1e-6);
    assert!(image.get_native(3, 0)[0].abs() < 1e-6);
}

#[test]
fn test_box_blur_radius_larger_than_image() {
    let mut image = Image::new(3, 2, ColorSpace::Rgb);
    image.set_rgb(0, 0, [1.0; 3]);
    box_blur(&mut image, 10, false, None).unwrap();
    assert!(image.data().iter().all(|v| v.is_finite() && *v >= 0.0 && *v <= 1.0));
}

#[test]
fn test_box_blur_parallel_matches_sequential() {
    let mut a = Image::new(400, 260, ColorSpace::Rgb);
    for y in 0..260 {
        for x in 0..400 {
            a.set_rgb(x, y, [(x % 7) as f32 / 7.0, (y % 5) as f32 / 5.0, 0.5]);
        }
    }
    let mut b = a.clone();
    box_blur(&mut a, 4, false, None).unwrap();
    box_blur(&mut b, 4, true, None).unwrap();
    assert!(max_abs_diff(&a, &b) < 1e-6);
}

// ========================================================================
// Gaussian
// ========================================================================

#[test]
fn test_gaussian_smooths_step() {
    let mut image = Image::new(40, 3, ColorSpace::Rgb);
    for y in 0..3 {
        for x in 20..40 {
            image.set_rgb(x, y, [1.0; 3]);
        }
    }
    gaussian_blur(&mut image, 3, false, None).unwrap();

    let row: Vec<f32> = (0..40).map(|x| image.get_native(x, 1)[0]).collect();
    assert!(row.windows(2).all(|w| w[1] >= w[0] - 1e-6), "step should stay monotone");
    assert!(row[19] > 0.0 && row[19] < 0.5);
    assert!(row[20] > 0.5 && row[20] < 1.0);
    assert!(row[0].abs() < 1e-6 && (row[39] - 1.0).abs() < 1e-6);
}

// ========================================================================
// Median family
// ========================================================================

#[test]
fn test_outlier_suppressed() {
    let mut image = uniform(7, 7, [0.2; 3]);
    image.set_rgb(3, 3, [1.0, 1.0, 1.0]);
    for filter in [
        LowPassFilter::Median { radius: 1 },
        LowPassFilter::HorizontalMedian { radius: 1 },
        LowPassFilter::VerticalMedian { radius: 1 },
        LowPassFilter::PseudoMedian { radius: 1 },
    ] {
        let result = filter.apply(&image, ColorSpace::Rgb, false, None).unwrap();
        let center = result.get_native(3, 3);
        assert!(
            (center[0] - 0.2).abs() < 1e-6,
            "{} left outlier at {:?}",
            filter,
            center
        );
    }
}

#[test]
fn test_line_median_keeps_whole_sample() {
    let mut image = Image::new(3, 1, ColorSpace::Rgb);
    image.set_rgb(0, 0, [0.9, 0.0, 0.1]);
    image.set_rgb(1, 0, [0.0, 0.9, 0.5]);
    image.set_rgb(2, 0, [0.3, 0.3, 0.9]);

    let result = line_median_filter(&image, 1, Axis::Horizontal, false, None).unwrap();
    // Ordered by channel 2: the middle sample wins intact
    assert_eq!(result.get_native(1, 0), [0.0, 0.9, 0.5]);
}

#[test]
fn test_vertical_median_ignores_rows() {
    let mut image = uniform(3, 5, [0.0; 3]);
    for x in 0..3 {
        image.set_rgb(x, 2, [1.0; 3]);
    }
    let horizontal = line_median_filter(&image, 1, Axis::Horizontal, false, None).unwrap();
    let vertical = line_median_filter(&image, 1, Axis::Vertical, false, None).unwrap();

    assert_eq!(horizontal.get_native(1, 2), [1.0; 3], "a full row survives horizontally");
    assert_eq!(vertical.get_native(1, 2), [0.0; 3], "a thin row is removed vertically");
}

#[test]
fn test_median_at_border_uses_in_bounds_pixels() {
    let mut image = uniform(3, 3, [0.0; 3]);
    image.set_rgb(0, 0, [1.0; 3]);
    image.set_rgb(1, 0, [1.0; 3]);
    image.set_rgb(0, 1, [1.0; 3]);

    // Corner window holds 4 pixels, three of them bright
    let result = median_filter(&image, 1, false, None).unwrap();
    assert_eq!(result.get_native(0, 0), [1.0; 3]);
}

#[test]
fn test_filter_in_hsv_returns_hsv() {
    let image = uniform(4, 4, [0.8, 0.2, 0.2]);
    let result = LowPassFilter::BoxBlur { radius: 1 }
        .apply(&image, ColorSpace::Hsv, false, None)
        .unwrap();
    assert_eq!(result.color_space(), ColorSpace::Hsv);
    let rgb = result.get_rgb(2, 2);
    assert!((rgb[0] - 0.8).abs() < 1e-5 && (rgb[1] - 0.2).abs() < 1e-5);
}

#[test]
fn test_filter_serde_roundtrip_yaml() {
    let yaml = "type: gaussian_blur\nradius: 25\n";
    let filter: LowPassFilter = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(filter, LowPassFilter::GaussianBlur { radius: 25 });
    assert_eq!(filter.to_string(), "GaussianBlur(radius=25)");
}

#[test]
fn test_filter_cancelled() {
    let token = CancelToken::new();
    token.cancel();
    let image = uniform(8, 8, [0.5; 3]);
    let result = LowPassFilter::Median { radius: 2 }.apply(&image, ColorSpace::Rgb, false, Some(&token));
    assert_eq!(result, Err(crate::error::GradientError::Cancelled));
}
