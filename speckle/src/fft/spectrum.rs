//! Complex spectra of sampled arrays.

use std::sync::Arc;

use rayon::prelude::*;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftDirection, FftPlanner};

use crate::array::{Extended, Interval, MAX_DIMS, Source};
use crate::common::UnsafeSendPtr;

/// Frequency-domain representation of a real array, stored with axis 0 fastest.
#[derive(Debug, Clone)]
pub struct Spectrum {
    shape: Vec<usize>,
    data: Vec<Complex<f32>>,
}

impl Spectrum {
    /// Sample `source` over `interval` and transform it.
    ///
    /// Positions outside the source's own bounds are read through its
    /// boundary policy.
    pub fn forward<S: Source + ?Sized>(source: &Extended<'_, S>, interval: &Interval) -> Self {
        let shape = interval.dimensions();
        let mut data = vec![Complex::new(0.0, 0.0); interval.volume()];
        sample_rows(source, interval, &mut data);
        transform(&mut data, &shape, FftDirection::Forward);
        Self { shape, data }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &[Complex<f32>] {
        &self.data
    }

    /// Element-wise complex multiplication by `other`.
    pub fn multiply(&mut self, other: &Spectrum) {
        assert_eq!(self.shape, other.shape, "spectrum shape mismatch");
        self.data
            .par_iter_mut()
            .zip(other.data.par_iter())
            .for_each(|(a, b)| *a *= *b);
    }

    /// Inverse transform, returning the real part scaled by `1 / len`.
    pub fn inverse(mut self) -> Vec<f32> {
        transform(&mut self.data, &self.shape, FftDirection::Inverse);
        let norm = 1.0 / self.data.len() as f32;
        self.data.par_iter().map(|c| c.re * norm).collect()
    }
}

/// Fill `out` with samples of `source` over `interval`, one axis-0 row per task.
fn sample_rows<S: Source + ?Sized>(
    source: &Extended<'_, S>,
    interval: &Interval,
    out: &mut [Complex<f32>],
) {
    let n = interval.ndim();
    let width = interval.dimension(0);

    out.par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, chunk)| {
            let mut pos = [0i64; MAX_DIMS];
            let mut rest = row;
            for (d, p) in pos.iter_mut().enumerate().take(n).skip(1) {
                let dim = interval.dimension(d);
                *p = interval.min(d) + (rest % dim) as i64;
                rest /= dim;
            }
            for (x, value) in chunk.iter_mut().enumerate() {
                pos[0] = interval.min(0) + x as i64;
                *value = Complex::new(source.get(&pos[..n]), 0.0);
            }
        });
}

/// In-place n-dimensional transform of `data` laid out with axis 0 fastest.
pub(crate) fn transform(data: &mut [Complex<f32>], shape: &[usize], direction: FftDirection) {
    debug_assert_eq!(data.len(), shape.iter().product::<usize>());
    let mut planner = FftPlanner::<f32>::new();
    for (axis, &len) in shape.iter().enumerate() {
        if len > 1 {
            let fft = planner.plan_fft(len, direction);
            transform_axis(data, shape, axis, &fft);
        }
    }
}

fn transform_axis(
    data: &mut [Complex<f32>],
    shape: &[usize],
    axis: usize,
    fft: &Arc<dyn Fft<f32>>,
) {
    let len = shape[axis];
    let scratch_len = fft.get_inplace_scratch_len();

    if axis == 0 {
        data.par_chunks_mut(len).for_each_init(
            || vec![Complex::new(0.0, 0.0); scratch_len],
            |scratch, line| fft.process_with_scratch(line, scratch),
        );
        return;
    }

    // Lines along `axis` are strided; gather each into a contiguous buffer.
    let stride: usize = shape[..axis].iter().product();
    let outer: usize = shape[axis + 1..].iter().product();
    let ptr = UnsafeSendPtr::new(data.as_mut_ptr());

    (0..stride * outer).into_par_iter().for_each_init(
        || {
            (
                vec![Complex::new(0.0, 0.0); len],
                vec![Complex::new(0.0, 0.0); scratch_len],
            )
        },
        |(line, scratch), l| {
            let base = (l / stride) * stride * len + l % stride;
            let p = ptr.get();
            // SAFETY: line `l` touches only `base + k * stride` for k < len,
            // and distinct lines never share an element.
            unsafe {
                for (k, v) in line.iter_mut().enumerate() {
                    *v = *p.add(base + k * stride);
                }
            }
            fft.process_with_scratch(line, scratch);
            unsafe {
                for (k, v) in line.iter().enumerate() {
                    *p.add(base + k * stride) = *v;
                }
            }
        },
    );
}
