//! Configuration for LoG blob detection.

use crate::array::Interval;

/// Detector parameters.
///
/// Physical quantities (`radius`, spot positions) use the units of
/// `calibration`, the per-axis pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct LogDetectorConfig {
    /// Region of the source to process, in source coordinates.
    /// `None` processes the whole source.
    pub interval: Option<Interval>,
    /// Physical pixel size per source axis. Empty means 1.0 on every axis.
    pub calibration: Vec<f64>,
    /// Expected blob radius in physical units.
    pub radius: f64,
    /// Minimum filter response for a maximum to be reported.
    pub threshold: f64,
    /// Refine maxima to sub-pixel positions with a quadratic fit.
    pub sub_pixel: bool,
    /// Median-filter the input before convolving.
    pub median_filter: bool,
}

impl Default for LogDetectorConfig {
    fn default() -> Self {
        Self {
            interval: None,
            calibration: Vec::new(),
            radius: 5.0,
            threshold: 0.0,
            sub_pixel: true,
            median_filter: false,
        }
    }
}

impl LogDetectorConfig {
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_calibration(mut self, calibration: &[f64]) -> Self {
        self.calibration = calibration.to_vec();
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_sub_pixel(mut self, sub_pixel: bool) -> Self {
        self.sub_pixel = sub_pixel;
        self
    }

    pub fn with_median_filter(mut self, median_filter: bool) -> Self {
        self.median_filter = median_filter;
        self
    }

    /// Validate the configuration.
    ///
    /// # Panics
    /// Panics with a descriptive message if any parameter is out of range.
    pub fn validate(&self) {
        assert!(
            self.radius.is_finite() && self.radius > 0.0,
            "radius must be positive, got {}",
            self.radius
        );
        assert!(
            self.threshold.is_finite(),
            "threshold must be finite, got {}",
            self.threshold
        );
        for (d, &c) in self.calibration.iter().enumerate() {
            assert!(
                c.is_finite() && c > 0.0,
                "calibration must be positive, got {} on axis {}",
                c,
                d
            );
        }
    }

    /// Calibration for a source of `ndim` axes.
    pub fn calibration_for(&self, ndim: usize) -> Vec<f64> {
        if self.calibration.is_empty() {
            vec![1.0; ndim]
        } else {
            self.calibration.clone()
        }
    }
}
