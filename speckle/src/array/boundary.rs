//! Out-of-bounds extension policies and the lazy view applying them.

use super::{Interval, MAX_DIMS, Source};

/// How samples are produced for positions outside a source's interval.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Boundary {
    /// The source tiles space: position `max + 1` reads `min`.
    #[default]
    Periodic,
    /// Mirror without repeating the edge sample: `min - 1` reads `min + 1`.
    MirrorSingle,
    /// Mirror repeating the edge sample: `min - 1` reads `min`.
    MirrorDouble,
    /// Clamp to the nearest edge sample.
    Border,
    /// A fixed value everywhere outside.
    Constant(f32),
}

impl Boundary {
    pub const ZERO: Self = Self::Constant(0.0);

    /// Map coordinate `p` into `[lo, hi]`, or `None` for constant extension.
    #[inline]
    pub fn map_coordinate(self, p: i64, lo: i64, hi: i64) -> Option<i64> {
        match self {
            Self::Constant(_) if p < lo || p > hi => None,
            _ => Some(self.wrap(p, lo, hi)),
        }
    }

    #[inline]
    fn wrap(self, p: i64, lo: i64, hi: i64) -> i64 {
        if p >= lo && p <= hi {
            return p;
        }
        let n = hi - lo + 1;
        let q = p - lo;
        let mapped = match self {
            Self::Periodic => q.rem_euclid(n),
            Self::MirrorSingle => {
                if n == 1 {
                    0
                } else {
                    let period = 2 * n - 2;
                    let r = q.rem_euclid(period);
                    if r >= n { period - r } else { r }
                }
            }
            Self::MirrorDouble => {
                let period = 2 * n;
                let r = q.rem_euclid(period);
                if r >= n { period - 1 - r } else { r }
            }
            Self::Border => q.clamp(0, n - 1),
            Self::Constant(_) => q,
        };
        lo + mapped
    }
}

/// A source extended to infinity through a [`Boundary`] policy.
///
/// Holds a reference only; copying an `Extended` never copies samples.
#[derive(Debug)]
pub struct Extended<'a, S: ?Sized> {
    source: &'a S,
    boundary: Boundary,
}

impl<S: ?Sized> Clone for Extended<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for Extended<'_, S> {}

impl<'a, S: Source + ?Sized> Extended<'a, S> {
    pub fn new(source: &'a S, boundary: Boundary) -> Self {
        assert!(
            source.interval().ndim() <= MAX_DIMS,
            "extended views support at most {MAX_DIMS} axes, got {}",
            source.interval().ndim()
        );
        Self { source, boundary }
    }

    #[inline]
    pub fn source(&self) -> &'a S {
        self.source
    }

    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    #[inline]
    pub fn interval(&self) -> &'a Interval {
        self.source.interval()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.source.interval().ndim()
    }

    #[inline]
    pub fn is_out_of_bounds(&self, pos: &[i64]) -> bool {
        !self.source.interval().contains(pos)
    }

    /// Sample at any position.
    #[inline]
    pub fn get(&self, pos: &[i64]) -> f32 {
        let interval = self.source.interval();
        if interval.contains(pos) {
            return self.source.get(pos);
        }
        if let Boundary::Constant(value) = self.boundary {
            return value;
        }
        let n = pos.len();
        let mut mapped = [0i64; MAX_DIMS];
        for d in 0..n {
            mapped[d] = self.boundary.wrap(pos[d], interval.min(d), interval.max(d));
        }
        self.source.get(&mapped[..n])
    }
}

impl<'a, S: Source + ?Sized> Extended<'a, S> {
    /// Crop the extended source to `interval`, which may reach past the
    /// source's own bounds.
    pub fn restrict(self, interval: Interval) -> Restricted<'a, S> {
        assert_eq!(
            interval.ndim(),
            self.ndim(),
            "restriction dimensionality mismatch"
        );
        Restricted {
            extended: self,
            interval,
        }
    }
}

/// An [`Extended`] source bounded to an interval of its own.
#[derive(Debug)]
pub struct Restricted<'a, S: ?Sized> {
    extended: Extended<'a, S>,
    interval: Interval,
}

impl<S: Source + ?Sized> Source for Restricted<'_, S> {
    #[inline]
    fn interval(&self) -> &Interval {
        &self.interval
    }

    #[inline]
    fn get(&self, pos: &[i64]) -> f32 {
        self.extended.get(pos)
    }
}
