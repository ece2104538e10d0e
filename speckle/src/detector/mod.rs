//! Laplacian-of-Gaussian blob detector.
//!
//! [`LogDetector`] ties the pipeline together: it crops the source to the
//! configured interval and drops singleton axes, optionally median-filters,
//! convolves with a LoG kernel tuned to the blob radius, and reports the
//! local maxima of the response as [`Spot`]s in physical units.

mod config;
mod error;

#[cfg(test)]
mod tests;

#[cfg(feature = "bench")]
pub mod bench;

pub use config::LogDetectorConfig;
pub use error::DetectionError;

use std::time::Instant;

use crate::array::{Image, Interval, MAX_DIMS, Source, SqueezedView};
use crate::common::parallel;
use crate::fft::FftConvolver;
use crate::kernel::create_log_kernel;
use crate::maxima::find_local_maxima;
use crate::median::median_filter;
use crate::spot::Spot;

#[derive(Debug, Clone, PartialEq)]
enum State {
    Uninitialized,
    Validated,
    Completed,
    Failed(DetectionError),
}

/// Detects bright blobs of a given radius in a 1D, 2D or 3D source.
///
/// The detector runs once: the first [`process`](Self::process) call caches
/// its spots or its error, and later calls return the cached outcome.
///
/// ```rust,ignore
/// use speckle::{Image, Interval, LogDetector, LogDetectorConfig};
///
/// let image = Image::zeros(Interval::from_dimensions(&[256, 256]));
/// let config = LogDetectorConfig::default()
///     .with_radius(3.0)
///     .with_threshold(1.0);
/// let mut detector = LogDetector::new(Some(&image), config);
/// let spots = detector.process()?;
/// ```
#[derive(Debug)]
pub struct LogDetector<'a, S: Source + ?Sized> {
    source: Option<&'a S>,
    config: LogDetectorConfig,
    num_threads: usize,
    state: State,
    spots: Vec<Spot>,
    processing_time_ms: u64,
}

impl<'a, S: Source + ?Sized> LogDetector<'a, S> {
    /// # Panics
    ///
    /// Panics if `config` fails [`LogDetectorConfig::validate`].
    pub fn new(source: Option<&'a S>, config: LogDetectorConfig) -> Self {
        config.validate();
        Self {
            source,
            config,
            num_threads: parallel::default_num_threads(),
            state: State::Uninitialized,
            spots: Vec::new(),
            processing_time_ms: 0,
        }
    }

    pub fn config(&self) -> &LogDetectorConfig {
        &self.config
    }

    #[inline]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Thread count for the next [`process`](Self::process) call.
    /// Has no effect on an already cached outcome.
    pub fn set_num_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads.max(1);
    }

    /// Validate the source and the configured interval without touching
    /// sample values.
    ///
    /// Once a run has finished, this reports the cached outcome instead.
    pub fn check_input(&mut self) -> Result<(), DetectionError> {
        match &self.state {
            State::Completed => return Ok(()),
            State::Failed(err) => return Err(err.clone()),
            State::Uninitialized | State::Validated => {}
        }
        let outcome = self.validate_input();
        self.state = match &outcome {
            Ok(()) => State::Validated,
            Err(err) => State::Failed(err.clone()),
        };
        outcome
    }

    /// Run the detection, or return the outcome of an earlier run.
    pub fn process(&mut self) -> Result<&[Spot], DetectionError> {
        match &self.state {
            State::Completed => return Ok(&self.spots),
            State::Failed(err) => return Err(err.clone()),
            State::Uninitialized | State::Validated => {}
        }
        if self.state == State::Uninitialized {
            self.check_input()?;
        }

        let start = Instant::now();
        let outcome = self.run();
        self.processing_time_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(spots) => {
                tracing::info!(
                    "LoG detection: {} spots in {} ms",
                    spots.len(),
                    self.processing_time_ms
                );
                self.spots = spots;
                self.state = State::Completed;
                Ok(&self.spots)
            }
            Err(err) => {
                tracing::warn!("{err}");
                self.state = State::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Spots of the last completed run; empty before that.
    pub fn result(&self) -> &[Spot] {
        &self.spots
    }

    /// Message of the last failure, if any.
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            State::Failed(err) => Some(err.to_string()),
            _ => None,
        }
    }

    /// Wall-clock time of the last run, in milliseconds.
    pub fn processing_time_ms(&self) -> u64 {
        self.processing_time_ms
    }

    fn validate_input(&self) -> Result<(), DetectionError> {
        let source = self.source.ok_or(DetectionError::MissingSource)?;
        let bounds = source.interval();
        DetectionError::check_ndim(bounds.ndim())?;

        let interval = self.interval_of(source);
        if interval.ndim() != bounds.ndim() {
            return Err(DetectionError::DimensionMismatch {
                image: bounds.ndim(),
                interval: interval.ndim(),
            });
        }
        if !bounds.contains(interval.min_corner()) || !bounds.contains(interval.max_corner()) {
            return Err(DetectionError::IntervalOutOfBounds {
                interval: interval.clone(),
                bounds: bounds.clone(),
            });
        }
        if interval.num_non_singleton() == 0 {
            return Err(DetectionError::EmptyInterval);
        }
        if !self.config.calibration.is_empty() && self.config.calibration.len() != bounds.ndim() {
            return Err(DetectionError::CalibrationMismatch {
                expected: bounds.ndim(),
                actual: self.config.calibration.len(),
            });
        }
        Ok(())
    }

    fn interval_of<'s>(&'s self, source: &'s S) -> &'s Interval {
        self.config.interval.as_ref().unwrap_or(source.interval())
    }

    fn run(&self) -> Result<Vec<Spot>, DetectionError> {
        let source = self.source.ok_or(DetectionError::MissingSource)?;
        let interval = self.interval_of(source);
        let calibration = self.config.calibration_for(interval.ndim());
        let num_threads = self.num_threads;

        let view = SqueezedView::new(source, interval);
        let axes = view.axes().to_vec();
        let squeezed_calibration: Vec<f64> = axes.iter().map(|&a| calibration[a]).collect();
        let working_interval = view.interval().clone();
        let ndim = working_interval.ndim();

        tracing::debug!(
            "LoG detection: interval {:?} squeezed to {:?} (axes {:?}), radius {}, {} threads",
            interval.dimensions(),
            working_interval.dimensions(),
            axes,
            self.config.radius,
            num_threads
        );

        let filtered: Image;
        let working: &dyn Source = if self.config.median_filter {
            filtered = parallel::install(num_threads, || median_filter(&view))??;
            &filtered
        } else {
            &view
        };

        let kernel = create_log_kernel(self.config.radius, ndim, &squeezed_calibration);
        let convolver = FftConvolver::with_num_threads(&kernel, &working_interval, num_threads)?;

        let mut output = Image::zeros(Interval::from_dimensions(&working_interval.dimensions()));
        convolver.convolve(working, &mut output)?;
        let response = output.with_origin(working_interval.min_corner());

        let spots = find_local_maxima(
            &response,
            self.config.threshold,
            &squeezed_calibration,
            self.config.radius,
            self.config.sub_pixel,
            num_threads,
        )?;

        Ok(lift_spots(spots, interval, &axes, &calibration))
    }
}

/// Map spots found on the squeezed axes back onto the source axes.
///
/// Dropped axes take the calibrated coordinate of the interval on that axis.
fn lift_spots(spots: Vec<Spot>, interval: &Interval, axes: &[usize], calibration: &[f64]) -> Vec<Spot> {
    let mut base = [0.0; MAX_DIMS];
    for d in 0..interval.ndim() {
        base[d] = interval.min(d) as f64 * calibration[d];
    }

    spots
        .into_iter()
        .map(|spot| {
            let mut position = base;
            for (i, &axis) in axes.iter().enumerate() {
                position[axis] = spot.position[i];
            }
            Spot { position, ..spot }
        })
        .collect()
}
