//! Local-maximum search over a filtered response.
//!
//! A sample is a maximum when it lies above the threshold and none of its
//! `3^n - 1` neighbors is strictly greater. Edges are read through a
//! `MirrorSingle` boundary, so a border cell is compared against its inner
//! neighbors only.
//!
//! The image is cut into contiguous slabs along its last axis; each worker
//! scans one slab with its own copy of a template window. Slabs are joined in
//! order, so the output is in scan order whatever the thread count.

mod subpixel;


pub use subpixel::{MAX_MOVES, Refined, refine};

use rayon::ThreadPoolBuildError;
use rayon::prelude::*;

use crate::array::{Boundary, Extended, Image, MAX_DIMS};
use crate::common::parallel;
use crate::neighborhood::{Neighborhood, RectangleSkipCenterNeighborhood};
use crate::spot::Spot;

/// Integer-grid maximum before refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub position: [i64; MAX_DIMS],
    pub value: f32,
}

/// Find the maxima of `image` above `threshold` and turn them into spots.
///
/// Positions are the image's own coordinates (refined when `sub_pixel` is
/// set) multiplied by `calibration`. Components past `image.ndim()` are zero.
pub fn find_local_maxima(
    image: &Image,
    threshold: f64,
    calibration: &[f64],
    radius: f64,
    sub_pixel: bool,
    num_threads: usize,
) -> Result<Vec<Spot>, ThreadPoolBuildError> {
    let n = image.ndim();
    assert!(
        (1..=MAX_DIMS).contains(&n),
        "maxima search supports 1 to {MAX_DIMS} axes, got {n}"
    );
    assert_eq!(calibration.len(), n, "calibration dimensionality mismatch");

    parallel::install(num_threads, || {
        let peaks = scan_peaks(image, threshold, num_threads);
        let extended = Extended::new(image, Boundary::MirrorSingle);

        let spots: Vec<Spot> = peaks
            .par_iter()
            .map(|peak| {
                let (coords, quality) = if sub_pixel {
                    let refined = refine(&extended, &peak.position[..n]);
                    (refined.position, refined.value)
                } else {
                    let mut coords = [0.0; MAX_DIMS];
                    for (c, &p) in coords.iter_mut().zip(&peak.position[..n]) {
                        *c = p as f64;
                    }
                    (coords, peak.value as f64)
                };

                let mut position = [0.0; 3];
                for d in 0..n {
                    position[d] = coords[d] * calibration[d];
                }
                Spot::new(position, radius, quality)
            })
            .collect();

        tracing::debug!(
            "Maxima: {} peaks above {threshold} (sub-pixel: {sub_pixel})",
            spots.len()
        );
        spots
    })
}

/// Integer maxima of `image` above `threshold`, in scan order.
pub fn scan_peaks(image: &Image, threshold: f64, num_jobs: usize) -> Vec<Peak> {
    let n = image.ndim();
    let last = n - 1;
    let slab_stride = image.strides()[last];
    let template =
        RectangleSkipCenterNeighborhood::over(image, &[1; MAX_DIMS][..n], Boundary::MirrorSingle);

    let slabs = parallel::split_even(image.dimension(last), num_jobs);
    let found: Vec<Vec<Peak>> = slabs
        .into_par_iter()
        .map(|slab| {
            let mut window = template.copy();
            let mut pos = [0i64; MAX_DIMS];
            let mut peaks = Vec::new();
            let pixels = image.pixels();

            for index in slab.start * slab_stride..slab.end * slab_stride {
                let value = pixels[index];
                if value.is_nan() || value as f64 <= threshold {
                    continue;
                }
                image.position_into(index, &mut pos[..n]);
                window.set_position(&pos[..n]);
                if !window.cursor().any(|neighbor| neighbor > value) {
                    peaks.push(Peak {
                        position: pos,
                        value,
                    });
                }
            }
            peaks
        })
        .collect();

    found.into_iter().flatten().collect()
}
