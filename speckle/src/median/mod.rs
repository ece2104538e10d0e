//! Median pre-filter for salt-and-pepper noise.
//!
//! A 3-wide median over the first two axes; 3D volumes are filtered plane by
//! plane, matching the usual per-slice preprocessing of microscopy stacks.
//! Edges are handled by mirroring, so no sample is invented.


use rayon::prelude::*;
use thiserror::Error;

use crate::array::{Boundary, Image, MAX_DIMS, Source};
use crate::neighborhood::{Neighborhood, RectangleNeighborhood};

/// Half extent of the median window on the filtered axes.
pub const MEDIAN_SPAN: i64 = 1;

/// Errors reported by [`median_filter`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MedianFilterError {
    #[error("median filter supports 1 to {MAX_DIMS} axes, got {0}")]
    UnsupportedDimensionality(usize),

    #[error("axis {axis} has {extent} samples, fewer than the {window}-sample median window")]
    WindowTooLarge {
        axis: usize,
        extent: usize,
        window: usize,
    },
}

/// Window span used for a source of `ndim` axes.
pub fn median_span(ndim: usize) -> Vec<i64> {
    (0..ndim)
        .map(|d| if d < 2 { MEDIAN_SPAN } else { 0 })
        .collect()
}

/// Median-filter `source` into a new image on the same interval.
///
/// Rows along axis 0 are filtered in parallel; every worker scans with its
/// own copy of one template window.
pub fn median_filter<S: Source + ?Sized>(source: &S) -> Result<Image, MedianFilterError> {
    let interval = source.interval().clone();
    let n = interval.ndim();
    if n == 0 || n > MAX_DIMS {
        return Err(MedianFilterError::UnsupportedDimensionality(n));
    }

    let span = median_span(n);
    for (axis, &s) in span.iter().enumerate() {
        let window = (2 * s + 1) as usize;
        let extent = interval.dimension(axis);
        if s > 0 && extent < window {
            return Err(MedianFilterError::WindowTooLarge {
                axis,
                extent,
                window,
            });
        }
    }

    let template = RectangleNeighborhood::over(source, &span, Boundary::MirrorSingle);
    let window_size = template.size();
    let width = interval.dimension(0);
    let mut output = Image::zeros(interval.clone());

    output
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each_init(
            || (template.copy(), Vec::with_capacity(window_size)),
            |(window, values), (row, out_row)| {
                let mut pos = [0i64; MAX_DIMS];
                let mut rest = row;
                for (d, p) in pos.iter_mut().enumerate().take(n).skip(1) {
                    let dim = interval.dimension(d);
                    *p = interval.min(d) + (rest % dim) as i64;
                    rest /= dim;
                }
                pos[0] = interval.min(0);
                window.set_position(&pos[..n]);

                for out in out_row.iter_mut() {
                    values.clear();
                    values.extend(window.cursor());
                    *out = median_of(values);
                    window.fwd(0);
                }
            },
        );

    tracing::debug!(
        "Median filter: {:?}, window {window_size} samples",
        interval.dimensions()
    );

    Ok(output)
}

/// Median of an odd-length sample set. Reorders `values`.
#[inline]
pub fn median_of(values: &mut [f32]) -> f32 {
    debug_assert!(!values.is_empty());
    let mid = values.len() / 2;
    let (_, median, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
    *median
}
