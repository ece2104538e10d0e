//! Error types for blob detection.

use rayon::ThreadPoolBuildError;
use thiserror::Error;

use crate::array::{Interval, MAX_DIMS};
use crate::median::MedianFilterError;

/// Errors reported by [`LogDetector`](super::LogDetector).
///
/// The detector caches its outcome, so errors are `Clone`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error("LogDetector: Image is null.")]
    MissingSource,

    #[error("LogDetector: Image must be 1D, 2D or 3D, got {0}D.")]
    TooManyDimensions(usize),

    #[error("LogDetector: Interval has {interval} axes but the image has {image}.")]
    DimensionMismatch { image: usize, interval: usize },

    #[error("LogDetector: Interval {interval:?} is not inside the image bounds {bounds:?}.")]
    IntervalOutOfBounds { interval: Interval, bounds: Interval },

    #[error("LogDetector: Interval has no axis with more than one sample.")]
    EmptyInterval,

    #[error("LogDetector: Expected {expected} calibration values, got {actual}.")]
    CalibrationMismatch { expected: usize, actual: usize },

    #[error("LogDetector: Failed to apply median filter: {0}")]
    MedianFilter(#[from] MedianFilterError),

    #[error("LogDetector: Failed to build a thread pool: {0}")]
    ThreadPool(String),
}

impl From<ThreadPoolBuildError> for DetectionError {
    fn from(err: ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}

impl DetectionError {
    /// Dimensionality check shared by validation and processing.
    pub(crate) fn check_ndim(ndim: usize) -> Result<(), Self> {
        if ndim > MAX_DIMS {
            return Err(Self::TooManyDimensions(ndim));
        }
        Ok(())
    }
}
