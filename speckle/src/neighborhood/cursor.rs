//! Cursor contract and the odometer walk shared by the window cursors.

use crate::array::{Extended, MAX_DIMS, Source};

/// Read-only scan over the cells of a neighborhood.
///
/// A cursor starts before the first cell; every [`fwd`](Self::fwd) moves to
/// the next cell in a fixed order (axis 0 fastest, starting at the window's
/// min corner). Samples are read through the source's boundary policy.
pub trait NeighborhoodCursor: Iterator<Item = f32> {
    fn ndim(&self) -> usize;

    fn fwd(&mut self);

    fn has_next(&self) -> bool;

    /// Sample at the current cell.
    fn get(&self) -> f32;

    /// Move back before the first cell.
    fn reset(&mut self);

    fn int_position(&self, d: usize) -> i64;

    /// True when the current cell lies outside the source's own interval,
    /// i.e. its sample was produced by the boundary policy.
    fn is_out_of_bounds(&self) -> bool;

    #[inline]
    fn real_position(&self, d: usize) -> f64 {
        self.int_position(d) as f64
    }

    fn localize(&self, position: &mut [i64]) {
        for (d, p) in position.iter_mut().enumerate().take(self.ndim()) {
            *p = self.int_position(d);
        }
    }

    /// Advance `steps` cells, one [`fwd`](Self::fwd) at a time.
    fn jump_fwd(&mut self, steps: usize) {
        for _ in 0..steps {
            self.fwd();
        }
    }

    /// Cursors are read-only; removal always panics.
    fn remove(&mut self) {
        panic!(
            "remove() is not implemented for {}",
            std::any::type_name::<Self>()
        );
    }
}

/// Odometer over a box, axis 0 fastest.
#[derive(Debug)]
pub(crate) struct GridWalker<'a, S: ?Sized> {
    extended: Extended<'a, S>,
    n: usize,
    min: [i64; MAX_DIMS],
    max: [i64; MAX_DIMS],
    pos: [i64; MAX_DIMS],
    visited: usize,
}

impl<S: ?Sized> Clone for GridWalker<'_, S> {
    fn clone(&self) -> Self {
        Self {
            extended: self.extended,
            n: self.n,
            min: self.min,
            max: self.max,
            pos: self.pos,
            visited: self.visited,
        }
    }
}

impl<'a, S: Source + ?Sized> GridWalker<'a, S> {
    pub(crate) fn new(
        extended: Extended<'a, S>,
        n: usize,
        min: [i64; MAX_DIMS],
        max: [i64; MAX_DIMS],
    ) -> Self {
        assert_eq!(
            extended.ndim(),
            n,
            "neighborhood and source dimensionality mismatch"
        );
        let mut walker = Self {
            extended,
            n,
            min,
            max,
            pos: min,
            visited: 0,
        };
        walker.reset();
        walker
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.pos = self.min;
        self.pos[0] -= 1;
        self.visited = 0;
    }

    #[inline]
    pub(crate) fn fwd(&mut self) {
        self.pos[0] += 1;
        for d in 0..self.n - 1 {
            if self.pos[d] > self.max[d] {
                self.pos[d] = self.min[d];
                self.pos[d + 1] += 1;
            } else {
                break;
            }
        }
        self.visited += 1;
    }

    /// Number of cells stepped onto since the last reset.
    #[inline]
    pub(crate) fn visited(&self) -> usize {
        self.visited
    }

    #[inline]
    pub(crate) fn ndim(&self) -> usize {
        self.n
    }

    #[inline]
    pub(crate) fn pos(&self) -> &[i64] {
        &self.pos[..self.n]
    }

    #[inline]
    pub(crate) fn position(&self, d: usize) -> i64 {
        self.pos[d]
    }

    #[inline]
    pub(crate) fn get(&self) -> f32 {
        self.extended.get(self.pos())
    }

    #[inline]
    pub(crate) fn is_out_of_bounds(&self) -> bool {
        self.extended.is_out_of_bounds(self.pos())
    }
}
