//! Speckle - Laplacian-of-Gaussian blob detection.
//!
//! This library finds bright, roughly Gaussian blobs of a given radius in
//! 1D, 2D and 3D images:
//! - FFT convolution with guard-band padding and periodic extension
//! - Movable neighborhoods with pluggable out-of-bounds policies
//! - Median pre-filtering and local-maximum search with sub-pixel refinement
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use speckle::{Image, Interval, LogDetector, LogDetectorConfig};
//!
//! let image = Image::new(Interval::from_dimensions(&[512, 512]), pixels);
//!
//! let config = LogDetectorConfig::default()
//!     .with_radius(2.5)
//!     .with_threshold(0.3);
//! let mut detector = LogDetector::new(Some(&image), config);
//! let spots = detector.process()?;
//!
//! println!("Found {} spots", spots.len());
//! ```

pub mod array;
pub(crate) mod common;
pub mod detector;
pub mod fft;
pub mod kernel;
pub mod maxima;
pub mod median;
pub mod neighborhood;
mod spot;

#[cfg(test)]
pub mod testing;

// ============================================================================
// Arrays and views
// ============================================================================

pub use array::{Boundary, Extended, Image, Interval, MAX_DIMS, Source, SqueezedView};

// ============================================================================
// Building blocks
// ============================================================================

pub use fft::FftConvolver;
pub use kernel::create_log_kernel;
pub use maxima::find_local_maxima;
pub use median::{MedianFilterError, median_filter};
pub use neighborhood::{
    Neighborhood, NeighborhoodCursor, RectangleNeighborhood, RectangleSkipCenterNeighborhood,
    WindowBinding, WindowGeometry,
};

// ============================================================================
// Detection
// ============================================================================

pub use detector::{DetectionError, LogDetector, LogDetectorConfig};
pub use spot::Spot;
