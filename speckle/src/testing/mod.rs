//! Testing utilities for speckle.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::array::{Image, Interval};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times - will only initialize once.
/// Respects RUST_LOG env var, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Isotropic Gaussian blob on a flat background.
///
/// `center` is in the interval's absolute pixel coordinates.
pub fn gaussian_blob(
    interval: Interval,
    center: &[f64],
    sigma: f64,
    amplitude: f32,
    background: f32,
) -> Image {
    gaussian_blobs(interval, &[(center, amplitude)], sigma, background)
}

/// Sum of isotropic Gaussian blobs sharing one sigma.
pub fn gaussian_blobs(
    interval: Interval,
    blobs: &[(&[f64], f32)],
    sigma: f64,
    background: f32,
) -> Image {
    let two_sigma_sq = 2.0 * sigma * sigma;
    Image::from_fn(interval, |pos| {
        let mut value = background;
        for &(center, amplitude) in blobs {
            let r_sq: f64 = pos
                .iter()
                .zip(center)
                .map(|(&p, &c)| (p as f64 - c) * (p as f64 - c))
                .sum();
            value += amplitude * (-r_sq / two_sigma_sq).exp() as f32;
        }
        value
    })
}

/// Seeded uniform noise in `[-amplitude, amplitude]`.
pub fn add_noise(image: &mut Image, amplitude: f32, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for v in image.pixels_mut() {
        *v += rng.random_range(-amplitude..=amplitude);
    }
}
