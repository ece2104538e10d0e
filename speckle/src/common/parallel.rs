//! Thread pool and work-splitting helpers.

use std::ops::Range;

use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};

/// Thread count used when none is configured: the size of rayon's global pool,
/// which defaults to the number of available processing units.
#[inline]
pub fn default_num_threads() -> usize {
    rayon::current_num_threads()
}

/// Run `op` inside a dedicated pool of `num_threads` workers.
///
/// Every rayon call made by `op` is scheduled on that pool, so the caller's
/// thread count applies to nested parallel iterators as well.
pub fn install<R, F>(num_threads: usize, op: F) -> Result<R, ThreadPoolBuildError>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads.max(1))
        .build()?;
    Ok(pool.install(op))
}

/// Split `0..len` into at most `num_jobs` contiguous ranges of near-equal size.
///
/// Ranges are returned in order and cover `0..len` exactly.
pub fn split_even(len: usize, num_jobs: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let num_jobs = num_jobs.clamp(1, len);
    let base = len / num_jobs;
    let extra = len % num_jobs;

    let mut ranges = Vec::with_capacity(num_jobs);
    let mut start = 0;
    for job in 0..num_jobs {
        let end = start + base + usize::from(job < extra);
        ranges.push(start..end);
        start = end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_even_covers_range() {
        let ranges = split_even(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn test_split_even_more_jobs_than_items() {
        let ranges = split_even(2, 8);
        assert_eq!(ranges, vec![0..1, 1..2]);
    }

    #[test]
    fn test_split_even_empty() {
        assert!(split_even(0, 4).is_empty());
    }

    #[test]
    fn test_install_uses_requested_thread_count() {
        let threads = install(3, rayon::current_num_threads).unwrap();
        assert_eq!(threads, 3);
    }

    #[test]
    fn test_install_zero_threads_falls_back_to_one() {
        let threads = install(0, rayon::current_num_threads).unwrap();
        assert_eq!(threads, 1);
    }
}
