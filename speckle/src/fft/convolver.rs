//! Convolution of arrays with a fixed kernel through precomputed spectra.

use rayon::ThreadPoolBuildError;
use rayon::prelude::*;

use super::{Spectrum, fast_size};
use crate::array::{Boundary, Extended, Image, Interval, MAX_DIMS, Source, strides_of};
use crate::common::parallel;

/// Convolves arrays placed on one target interval with one kernel.
///
/// The kernel spectrum is computed once at construction against the padded
/// shape of the target interval and reused by every [`convolve`](Self::convolve)
/// call. Padding adds the kernel extent minus one to every axis (rounded up
/// to a fast transform length), so circular wraparound never reaches the
/// cropped output.
#[derive(Debug)]
pub struct FftConvolver {
    num_threads: usize,
    interval: Interval,
    padding: Interval,
    kernel_spectrum: Spectrum,
}

impl FftConvolver {
    /// Build with the default thread count.
    pub fn new(kernel: &Image, interval: &Interval) -> Result<Self, ThreadPoolBuildError> {
        Self::with_num_threads(kernel, interval, parallel::default_num_threads())
    }

    /// # Panics
    ///
    /// Panics if `kernel` and `interval` have different dimensionality.
    pub fn with_num_threads(
        kernel: &Image,
        interval: &Interval,
        num_threads: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let n = interval.ndim();
        assert_eq!(
            kernel.ndim(),
            n,
            "kernel has {} axes but the target interval has {n}",
            kernel.ndim()
        );
        assert!(n <= MAX_DIMS, "convolution supports at most {MAX_DIMS} axes");

        let padded: Vec<usize> = (0..n)
            .map(|d| fast_size(interval.dimension(d) + kernel.dimension(d) - 1))
            .collect();
        let padding = padding_interval_centered(interval, &padded);

        // Zero-extend the kernel to the padded size, then read that periodically
        // from the kernel center so the center lands on spectrum index 0.
        let kernel_padding = padding_interval_centered(kernel.interval(), &padded);
        let kernel_start: Vec<i64> = (0..n)
            .map(|d| kernel.interval().min(d) + (kernel.dimension(d) / 2) as i64)
            .collect();
        let kernel_crop = Interval::from_min_size(&kernel_start, &padded);

        tracing::debug!(
            "FFT convolver: interval {:?}, kernel {:?}, padded {:?}, {} threads",
            interval.dimensions(),
            kernel.dimensions(),
            padded,
            num_threads
        );

        let kernel_spectrum = parallel::install(num_threads, || {
            let zero_padded = Extended::new(kernel, Boundary::ZERO).restrict(kernel_padding);
            Spectrum::forward(
                &Extended::new(&zero_padded, Boundary::Periodic),
                &kernel_crop,
            )
        })?;

        Ok(Self {
            num_threads,
            interval: interval.clone(),
            padding,
            kernel_spectrum,
        })
    }

    #[inline]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn set_num_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads;
    }

    /// Target interval the output is shaped like.
    #[inline]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Padded interval, centered on the target interval.
    #[inline]
    pub fn padding_interval(&self) -> &Interval {
        &self.padding
    }

    #[inline]
    pub fn kernel_spectrum(&self) -> &Spectrum {
        &self.kernel_spectrum
    }

    /// Convolve `source` with the kernel, writing the cropped result to `output`.
    ///
    /// `source` is extended periodically relative to its own interval. `output`
    /// must have the target interval's extent; its origin is irrelevant and
    /// cell `i` of `output` holds the response at cell `i` of the target interval.
    ///
    /// # Panics
    ///
    /// Panics on dimensionality or shape mismatch.
    pub fn convolve<S: Source + ?Sized>(
        &self,
        source: &S,
        output: &mut Image,
    ) -> Result<(), ThreadPoolBuildError> {
        let n = self.interval.ndim();
        assert_eq!(source.ndim(), n, "source dimensionality mismatch");
        assert_eq!(
            output.dimensions(),
            self.interval.dimensions(),
            "output shape must match the target interval"
        );

        parallel::install(self.num_threads, || {
            let mut spectrum =
                Spectrum::forward(&Extended::new(source, Boundary::Periodic), &self.padding);
            spectrum.multiply(&self.kernel_spectrum);
            let response = spectrum.inverse();
            self.crop_into(&response, output);
        })
    }

    fn crop_into(&self, response: &[f32], output: &mut Image) {
        let n = self.interval.ndim();
        let width = self.interval.dimension(0);
        let padded = self.padding.dimensions();
        let padded_strides = strides_of(&padded);

        let mut offset = [0usize; MAX_DIMS];
        for (d, o) in offset.iter_mut().enumerate().take(n) {
            *o = (self.interval.min(d) - self.padding.min(d)) as usize;
        }

        output
            .pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, out_row)| {
                let mut start = offset[0];
                let mut rest = row;
                for d in 1..n {
                    let dim = self.interval.dimension(d);
                    start += (rest % dim + offset[d]) * padded_strides[d];
                    rest /= dim;
                }
                out_row.copy_from_slice(&response[start..start + width]);
            });
    }
}

/// Centered placement of `interval` inside a box of `padded` extent.
pub fn padding_interval_centered(interval: &Interval, padded: &[usize]) -> Interval {
    let min: Vec<i64> = (0..interval.ndim())
        .map(|d| {
            assert!(
                padded[d] >= interval.dimension(d),
                "padded extent {} is smaller than the interval extent {} on axis {d}",
                padded[d],
                interval.dimension(d)
            );
            interval.min(d) - ((padded[d] - interval.dimension(d)) / 2) as i64
        })
        .collect();
    Interval::from_min_size(&min, padded)
}
