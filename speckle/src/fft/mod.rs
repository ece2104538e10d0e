//! Frequency-domain convolution.
//!
//! Multi-dimensional transforms are computed as 1D `rustfft` transforms along
//! every axis in turn (row-column decomposition). Lines along an axis are
//! independent, so they are spread over the current rayon pool.

mod convolver;
mod spectrum;


#[cfg(feature = "bench")]
pub mod bench;

pub use convolver::FftConvolver;
pub use spectrum::Spectrum;

/// Smallest length `>= min_len` whose prime factors are all in {2, 3, 5, 7}.
///
/// `rustfft` has dedicated butterflies for these radices, so such lengths
/// transform much faster than lengths with large prime factors.
pub fn fast_size(min_len: usize) -> usize {
    let mut n = min_len.max(1);
    while !is_smooth(n) {
        n += 1;
    }
    n
}

fn is_smooth(mut n: usize) -> bool {
    for p in [2, 3, 5, 7] {
        while n % p == 0 {
            n /= p;
        }
    }
    n == 1
}
