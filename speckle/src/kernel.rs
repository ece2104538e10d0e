//! Laplacian-of-Gaussian kernel construction.

use crate::array::{Image, Interval};

/// Build the negative, normalized LoG kernel tuned to blobs of `radius`.
///
/// `radius` is in physical units; `calibration` gives the physical pixel
/// size of each of the `ndim` axes. The kernel's Gaussian has
/// `sigma = radius / sqrt(ndim)`, so a blob of that radius produces the
/// strongest response. The kernel is centered on the origin and positive in
/// its core, so bright blobs become local maxima. Its samples are shifted to
/// sum to zero, so a flat input produces no response.
///
/// # Panics
///
/// Panics if `ndim` is zero, `calibration` is shorter than `ndim`, or the
/// radius is not positive.
pub fn create_log_kernel(radius: f64, ndim: usize, calibration: &[f64]) -> Image {
    assert!(ndim > 0, "LoG kernel needs at least one axis");
    assert!(
        calibration.len() >= ndim,
        "calibration has {} entries for {ndim} axes",
        calibration.len()
    );
    assert!(radius > 0.0, "radius must be positive, got {radius}");

    let sigma = radius / (ndim as f64).sqrt();

    let half_sizes: Vec<i64> = calibration[..ndim]
        .iter()
        .map(|&cal| {
            let sigma_px = sigma / cal;
            ((3.0 * sigma_px + 0.5) as i64 + 1).max(2) + 1
        })
        .collect();
    let interval = Interval::new(
        half_sizes.iter().map(|&h| -h).collect(),
        half_sizes.clone(),
    );

    let c = 1.0 / 20.0 * (1.0 / sigma / (2.0 * std::f64::consts::PI).sqrt()).powi(ndim as i32);
    let sigma_sq = sigma * sigma;

    let mut kernel = Image::from_fn(interval, |pos| {
        let mut mantissa = 0.0;
        let mut exponent = 0.0;
        for (d, &p) in pos.iter().enumerate() {
            let x = calibration[d] * p as f64;
            mantissa += -c * (x * x / sigma_sq - 1.0);
            exponent += -x * x / 2.0 / sigma_sq;
        }
        (mantissa * exponent.exp()) as f32
    });

    let mean = kernel.pixels().iter().map(|&v| v as f64).sum::<f64>() / kernel.len() as f64;
    for v in kernel.pixels_mut() {
        *v -= mean as f32;
    }

    tracing::debug!(
        "LoG kernel: radius {radius}, sigma {sigma:.3}, {ndim}D, size {:?}",
        kernel.dimensions()
    );

    kernel
}
