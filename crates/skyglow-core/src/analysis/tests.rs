//! Tests for histogram analysis

use super::*;
use crate::color::{R, S, V};
use crate::image::{Image, ImageViewMut};

#[test]
fn test_counts_every_pixel() {
    let image = Image::filled(5, 4, ColorSpace::Rgb, [0.1, 0.5, 0.95]);
    let histogram = Histogram::sample(&image, ColorSpace::Rgb, 10).unwrap();

    assert_eq!(histogram.sample_count(), 20);
    assert_eq!(histogram.raw_bins(0)[1], 20);
    assert_eq!(histogram.raw_bins(1)[5], 20);
    assert_eq!(histogram.raw_bins(2)[9], 20);
}

#[test]
fn test_out_of_range_values_clamp_to_edge_bins() {
    let mut image = Image::new(2, 1, ColorSpace::Rgb);
    image.set_rgb(0, 0, [-0.5, 1.0, 3.0]);
    image.set_rgb(1, 0, [0.0, 0.999, 1.0]);
    let histogram = Histogram::sample(&image, ColorSpace::Rgb, 4).unwrap();

    assert_eq!(histogram.raw_bins(R), &[2, 0, 0, 0]);
    assert_eq!(histogram.raw_bins(1), &[0, 0, 0, 2]);
    assert_eq!(histogram.raw_bins(2), &[0, 0, 0, 2]);
}

#[test]
fn test_hsv_hue_is_scaled() {
    // Pure blue has hue 240, i.e. 2/3 of the circle
    let image = Image::filled(3, 3, ColorSpace::Rgb, [0.0, 0.0, 1.0]);
    let histogram = Histogram::sample(&image, ColorSpace::Hsv, 4).unwrap();

    assert_eq!(histogram.raw_bins(H), &[0, 0, 9, 0]);
    assert_eq!(histogram.raw_bins(S), &[0, 0, 0, 9]);
    assert_eq!(histogram.raw_bins(V), &[0, 0, 0, 9]);
}

#[test]
fn test_normalized_by_global_max() {
    let mut image = Image::new(4, 1, ColorSpace::Rgb);
    for x in 0..4 {
        image.set_rgb(x, 0, [0.1, if x < 2 { 0.1 } else { 0.9 }, 0.1]);
    }
    let histogram = Histogram::sample(&image, ColorSpace::Rgb, 2).unwrap();

    assert_eq!(histogram.normalized_bins(0), vec![1.0, 0.0]);
    assert_eq!(histogram.normalized_bins(1), vec![0.5, 0.5]);
}

#[test]
fn test_region_ignores_outside_pixels() {
    let image = Image::filled(4, 4, ColorSpace::Rgb, [0.5; 3]);
    let histogram = Histogram::sample_region(&image, 2, 2, 10, 10, ColorSpace::Rgb, 8).unwrap();
    assert_eq!(histogram.sample_count(), 4);
}

#[test]
fn test_empty_image() {
    let image = Image::new(0, 0, ColorSpace::Rgb);
    let histogram = Histogram::sample(&image, ColorSpace::Rgb, 8).unwrap();
    assert_eq!(histogram.sample_count(), 0);
    assert!(histogram.normalized_bins(0).iter().all(|&v| v == 0.0));
}

#[test]
fn test_zero_bins_rejected() {
    let image = Image::new(2, 2, ColorSpace::Rgb);
    assert!(Histogram::sample(&image, ColorSpace::Rgb, 0).is_err());
}

#[test]
fn test_ends() {
    let mut image = Image::new(3, 1, ColorSpace::Rgb);
    image.set_rgb(0, 0, [0.2, 0.0, 0.0]);
    image.set_rgb(1, 0, [0.3, 0.0, 0.0]);
    image.set_rgb(2, 0, [0.7, 0.0, 0.0]);
    let histogram = Histogram::sample(&image, ColorSpace::Rgb, 11).unwrap();

    let ends = histogram.ends(R);
    assert!((ends.low - 0.2).abs() < 1e-6, "low = {}", ends.low);
    assert!((ends.high - 0.7).abs() < 1e-6, "high = {}", ends.high);
    assert_eq!(ends.non_empty_bins, 3);
}
