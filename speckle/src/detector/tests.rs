//! Tests for the LoG detector pipeline.

use super::*;
use crate::median::MedianFilterError;
use crate::testing::{add_noise, gaussian_blob, gaussian_blobs, init_tracing};

const RADIUS: f64 = 4.0;

fn blob_sigma(radius: f64, ndim: usize) -> f64 {
    radius / (ndim as f64).sqrt()
}

fn config() -> LogDetectorConfig {
    LogDetectorConfig::default()
        .with_radius(RADIUS)
        .with_threshold(0.5)
}

fn blob_2d(dims: &[usize], center: &[f64]) -> Image {
    gaussian_blob(
        Interval::from_dimensions(dims),
        center,
        blob_sigma(RADIUS, 2),
        100.0,
        10.0,
    )
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_missing_source() {
    let mut detector = LogDetector::<Image>::new(None, config());

    assert_eq!(detector.check_input(), Err(DetectionError::MissingSource));
    assert_eq!(
        detector.error_message().as_deref(),
        Some("LogDetector: Image is null.")
    );
    assert_eq!(detector.process().unwrap_err(), DetectionError::MissingSource);
}

#[test]
fn test_too_many_dimensions() {
    let image = Image::zeros(Interval::from_dimensions(&[4, 4, 4, 4]));
    let mut detector = LogDetector::new(Some(&image), config());

    let err = detector.check_input().unwrap_err();

    assert_eq!(err, DetectionError::TooManyDimensions(4));
    assert_eq!(
        err.to_string(),
        "LogDetector: Image must be 1D, 2D or 3D, got 4D."
    );
}

#[test]
fn test_interval_dimension_mismatch() {
    let image = Image::zeros(Interval::from_dimensions(&[16, 16]));
    let config = config().with_interval(Interval::from_dimensions(&[16, 16, 1]));
    let mut detector = LogDetector::new(Some(&image), config);

    assert_eq!(
        detector.check_input(),
        Err(DetectionError::DimensionMismatch {
            image: 2,
            interval: 3
        })
    );
}

#[test]
fn test_interval_out_of_bounds() {
    let image = Image::zeros(Interval::from_dimensions(&[16, 16]));
    let config = config().with_interval(Interval::new(vec![8, 8], vec![20, 15]));
    let mut detector = LogDetector::new(Some(&image), config);

    assert!(matches!(
        detector.check_input(),
        Err(DetectionError::IntervalOutOfBounds { .. })
    ));
}

#[test]
fn test_single_pixel_interval_is_empty() {
    let image = Image::zeros(Interval::from_dimensions(&[16, 16]));
    let config = config().with_interval(Interval::new(vec![3, 4], vec![3, 4]));
    let mut detector = LogDetector::new(Some(&image), config);

    assert_eq!(detector.process().unwrap_err(), DetectionError::EmptyInterval);
}

#[test]
fn test_calibration_mismatch() {
    let image = Image::zeros(Interval::from_dimensions(&[16, 16]));
    let config = config().with_calibration(&[1.0, 1.0, 1.0]);
    let mut detector = LogDetector::new(Some(&image), config);

    assert_eq!(
        detector.check_input(),
        Err(DetectionError::CalibrationMismatch {
            expected: 2,
            actual: 3
        })
    );
}

#[test]
fn test_check_input_does_not_read_samples() {
    // NaN data is only a problem for processing, never for validation.
    let image = Image::filled(Interval::from_dimensions(&[16, 16]), f32::NAN);
    let mut detector = LogDetector::new(Some(&image), config());
    assert!(detector.check_input().is_ok());
}

#[test]
#[should_panic(expected = "radius must be positive")]
fn test_invalid_config_panics() {
    let image = Image::zeros(Interval::from_dimensions(&[16, 16]));
    let _ = LogDetector::new(Some(&image), config().with_radius(0.0));
}

// ============================================================================
// Detection
// ============================================================================

#[test]
fn test_constant_image_has_no_spots() {
    init_tracing();
    let image = Image::filled(Interval::from_dimensions(&[48, 40]), 5.0);
    let mut detector = LogDetector::new(Some(&image), config().with_threshold(0.01));

    let spots = detector.process().unwrap();

    assert!(spots.is_empty(), "found {} spots", spots.len());
}

#[test]
fn test_single_blob_pixel_precision() {
    init_tracing();
    let image = blob_2d(&[64, 64], &[31.3, 28.6]);
    let mut detector = LogDetector::new(Some(&image), config().with_sub_pixel(false));

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    let spot = spots[0];
    assert_eq!(spot.position, [31.0, 29.0, 0.0]);
    assert_eq!(spot.radius, RADIUS);
    assert!(spot.quality > 0.5, "quality {}", spot.quality);
}

#[test]
fn test_single_blob_sub_pixel_precision() {
    let image = blob_2d(&[64, 64], &[31.3, 28.6]);
    let mut detector = LogDetector::new(Some(&image), config());

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    assert!((spots[0].x() - 31.3).abs() < 0.25, "x = {}", spots[0].x());
    assert!((spots[0].y() - 28.6).abs() < 0.25, "y = {}", spots[0].y());
}

#[test]
fn test_response_scales_with_amplitude() {
    // A blob matched to the kernel peaks at about amplitude / 40 in 2D.
    let image = blob_2d(&[64, 64], &[32.0, 32.0]);
    let mut detector = LogDetector::new(Some(&image), config().with_sub_pixel(false));

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    assert!(
        (spots[0].quality - 2.5).abs() < 0.25,
        "quality {}",
        spots[0].quality
    );
}

#[test]
fn test_two_blobs() {
    let image = gaussian_blobs(
        Interval::from_dimensions(&[80, 60]),
        &[(&[20.0, 20.0], 100.0), (&[55.0, 40.0], 60.0)],
        blob_sigma(RADIUS, 2),
        0.0,
    );
    let mut detector = LogDetector::new(Some(&image), config().with_sub_pixel(false));

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 2);
    // Scan order: the blob with the smaller y comes first.
    assert_eq!(spots[0].position, [20.0, 20.0, 0.0]);
    assert_eq!(spots[1].position, [55.0, 40.0, 0.0]);
    assert!(spots[0].quality > spots[1].quality);
}

#[test]
fn test_threshold_filters_weak_blob() {
    let image = gaussian_blobs(
        Interval::from_dimensions(&[80, 60]),
        &[(&[20.0, 20.0], 100.0), (&[55.0, 40.0], 20.0)],
        blob_sigma(RADIUS, 2),
        0.0,
    );
    let mut detector = LogDetector::new(Some(&image), config().with_threshold(1.0));

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    assert!((spots[0].x() - 20.0).abs() < 0.25);
}

#[test]
fn test_blob_near_edge() {
    let image = blob_2d(&[64, 64], &[2.0, 30.0]);
    let mut detector = LogDetector::new(Some(&image), config());

    let spots = detector.process().unwrap();

    // The input wraps around periodically, so the blob echoes at the far edge.
    assert_eq!(spots.len(), 2, "{spots:?}");
    assert!(
        spots
            .iter()
            .any(|s| (s.x() - 2.0).abs() < 1.0 && (s.y() - 30.0).abs() < 1.0),
        "no spot near the edge blob: {spots:?}"
    );
    let echo = spots
        .iter()
        .find(|s| s.x() > 61.5)
        .unwrap_or_else(|| panic!("no echo at the far edge: {spots:?}"));
    assert!((echo.y() - 30.0).abs() < 1.0);
}

#[test]
fn test_blob_clear_of_edge_has_no_echo() {
    let image = blob_2d(&[64, 64], &[4.0, 30.0]);
    let mut detector = LogDetector::new(Some(&image), config());

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1, "{spots:?}");
    assert!((spots[0].x() - 4.0).abs() < 1.0);
}

#[test]
fn test_calibration_scales_positions_and_kernel() {
    // Pixel size 0.5: a physical radius of 2 spans the same 4 pixels.
    let image = blob_2d(&[64, 64], &[20.0, 40.0]);
    let config = config()
        .with_radius(RADIUS * 0.5)
        .with_calibration(&[0.5, 0.5])
        .with_sub_pixel(false);
    let mut detector = LogDetector::new(Some(&image), config);

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].position, [10.0, 20.0, 0.0]);
    assert_eq!(spots[0].radius, 2.0);
}

#[test]
fn test_translation_invariance() {
    let image = blob_2d(&[64, 64], &[31.3, 28.6]);
    let shifted = image.clone().with_origin(&[100, -50]);

    let mut a = LogDetector::new(Some(&image), config());
    let mut b = LogDetector::new(Some(&shifted), config());
    let spots_a = a.process().unwrap().to_vec();
    let spots_b = b.process().unwrap().to_vec();

    assert_eq!(spots_a.len(), 1);
    assert_eq!(spots_b.len(), 1);
    assert!((spots_b[0].x() - 100.0 - spots_a[0].x()).abs() < 1e-6);
    assert!((spots_b[0].y() + 50.0 - spots_a[0].y()).abs() < 1e-6);
    assert!((spots_b[0].quality - spots_a[0].quality).abs() < 1e-4);
}

#[test]
fn test_interval_restricts_search() {
    let image = gaussian_blobs(
        Interval::from_dimensions(&[100, 60]),
        &[(&[20.0, 30.0], 100.0), (&[75.0, 30.0], 100.0)],
        blob_sigma(RADIUS, 2),
        0.0,
    );
    let config = config()
        .with_interval(Interval::new(vec![50, 0], vec![99, 59]))
        .with_sub_pixel(false);
    let mut detector = LogDetector::new(Some(&image), config);

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].position, [75.0, 30.0, 0.0]);
}

#[test]
fn test_singleton_axis_is_squeezed() {
    let interval = Interval::from_dimensions(&[100, 3, 50]);
    let mut image = Image::zeros(interval);
    let plane = blob_2d(&[100, 50], &[40.2, 20.7]);
    for z in 0..50 {
        for x in 0..100 {
            image.set(&[x, 1, z], plane.get(&[x, z]));
        }
    }

    let config = config()
        .with_interval(Interval::new(vec![0, 1, 0], vec![99, 1, 49]))
        .with_calibration(&[1.0, 2.0, 1.0]);
    let mut detector = LogDetector::new(Some(&image), config);

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    assert!((spots[0].x() - 40.2).abs() < 0.25, "x = {}", spots[0].x());
    assert_eq!(spots[0].y(), 2.0);
    assert!((spots[0].z() - 20.7).abs() < 0.25, "z = {}", spots[0].z());
}

#[test]
fn test_1d_signal() {
    let radius = 3.0;
    let image = gaussian_blob(
        Interval::from_dimensions(&[100]),
        &[40.4],
        blob_sigma(radius, 1),
        100.0,
        0.0,
    );
    let mut detector = LogDetector::new(Some(&image), config().with_radius(radius));

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    assert!((spots[0].x() - 40.4).abs() < 0.25, "x = {}", spots[0].x());
    assert_eq!(spots[0].y(), 0.0);
    assert_eq!(spots[0].z(), 0.0);
}

#[test]
fn test_3d_volume() {
    let radius = 3.0;
    let image = gaussian_blob(
        Interval::from_dimensions(&[32, 32, 24]),
        &[15.6, 16.2, 11.7],
        blob_sigma(radius, 3),
        100.0,
        5.0,
    );
    let mut detector = LogDetector::new(Some(&image), config().with_radius(radius));

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    let expected = [15.6, 16.2, 11.7];
    for (d, &e) in expected.iter().enumerate() {
        assert!(
            (spots[0].position[d] - e).abs() < 0.3,
            "axis {d}: {} vs {e}",
            spots[0].position[d]
        );
    }
}

#[test]
fn test_thread_count_does_not_change_spots() {
    let mut image = gaussian_blobs(
        Interval::from_dimensions(&[90, 70]),
        &[
            (&[15.2, 12.9], 100.0),
            (&[60.7, 20.1], 80.0),
            (&[40.0, 55.5], 120.0),
        ],
        blob_sigma(RADIUS, 2),
        10.0,
    );
    add_noise(&mut image, 2.0, 7);

    let mut single = LogDetector::new(Some(&image), config());
    single.set_num_threads(1);
    let mut many = LogDetector::new(Some(&image), config());
    many.set_num_threads(4);

    let a = single.process().unwrap().to_vec();
    let b = many.process().unwrap().to_vec();

    assert!(a.len() >= 3);
    assert_eq!(a, b);
}

#[test]
fn test_median_filter_removes_hot_pixels() {
    let mut image = blob_2d(&[64, 64], &[31.0, 28.0]);
    for &(x, y) in &[(5, 5), (50, 10), (12, 55), (58, 58)] {
        image.set(&[x, y], 5000.0);
    }

    let mut plain = LogDetector::new(Some(&image), config().with_sub_pixel(false));
    let mut filtered = LogDetector::new(
        Some(&image),
        config().with_sub_pixel(false).with_median_filter(true),
    );

    assert!(plain.process().unwrap().len() > 1);
    let spots = filtered.process().unwrap();
    assert_eq!(spots.len(), 1);
    assert!((spots[0].x() - 31.0).abs() <= 1.0);
    assert!((spots[0].y() - 28.0).abs() <= 1.0);
}

#[test]
fn test_median_filter_failure() {
    let image = Image::zeros(Interval::from_dimensions(&[2, 50]));
    let mut detector = LogDetector::new(Some(&image), config().with_median_filter(true));

    let err = detector.process().unwrap_err();

    assert_eq!(
        err,
        DetectionError::MedianFilter(MedianFilterError::WindowTooLarge {
            axis: 0,
            extent: 2,
            window: 3
        })
    );
    assert!(
        detector
            .error_message()
            .is_some_and(|m| m.starts_with("LogDetector: Failed to apply median filter"))
    );
}

// ============================================================================
// State
// ============================================================================

#[test]
fn test_process_is_cached() {
    let image = blob_2d(&[64, 64], &[31.3, 28.6]);
    let mut detector = LogDetector::new(Some(&image), config());

    let first = detector.process().unwrap().to_vec();
    let time = detector.processing_time_ms();
    detector.set_num_threads(2);
    let second = detector.process().unwrap().to_vec();

    assert_eq!(first, second);
    assert_eq!(detector.result(), first.as_slice());
    assert_eq!(detector.processing_time_ms(), time);
    assert!(detector.error_message().is_none());
}

#[test]
fn test_failure_is_cached() {
    let image = Image::zeros(Interval::from_dimensions(&[16, 16]));
    let config = config().with_interval(Interval::new(vec![3, 4], vec![3, 4]));
    let mut detector = LogDetector::new(Some(&image), config);

    let first = detector.process().unwrap_err();
    let second = detector.process().unwrap_err();

    assert_eq!(first, second);
    assert!(detector.result().is_empty());
}

#[test]
fn test_check_input_keeps_cached_failure() {
    let image = Image::zeros(Interval::from_dimensions(&[2, 50]));
    let mut detector = LogDetector::new(Some(&image), config().with_median_filter(true));

    let err = detector.process().unwrap_err();
    let message = detector.error_message();

    assert_eq!(detector.check_input(), Err(err.clone()));
    assert_eq!(detector.error_message(), message);
    assert_eq!(detector.process().unwrap_err(), err);
}

#[test]
fn test_check_input_after_success() {
    let image = blob_2d(&[64, 64], &[31.3, 28.6]);
    let mut detector = LogDetector::new(Some(&image), config());

    let spots = detector.process().unwrap().to_vec();

    assert!(detector.check_input().is_ok());
    assert_eq!(detector.result(), spots.as_slice());
}

#[test]
fn test_result_empty_before_process() {
    let image = blob_2d(&[32, 32], &[16.0, 16.0]);
    let mut detector = LogDetector::new(Some(&image), config());

    assert!(detector.check_input().is_ok());
    assert!(detector.result().is_empty());
    assert!(detector.error_message().is_none());
    assert_eq!(detector.num_threads(), parallel::default_num_threads());
}

#[test]
fn test_detects_through_dyn_source() {
    let image = blob_2d(&[64, 64], &[31.3, 28.6]);
    let source: &dyn Source = &image;
    let mut detector = LogDetector::new(Some(source), config().with_sub_pixel(false));

    let spots = detector.process().unwrap();

    assert_eq!(spots.len(), 1);
    assert_eq!(spots[0].position, [31.0, 29.0, 0.0]);
}
