//! Rectangular windows, with or without their center cell.

use super::cursor::GridWalker;
use super::{Neighborhood, NeighborhoodCursor, WindowBinding};
use crate::array::{Boundary, MAX_DIMS, Source};

/// Every cell of a `2 * span + 1` box.
#[derive(Debug)]
pub struct RectangleNeighborhood<'a, S: ?Sized> {
    window: WindowBinding<'a, S>,
}

impl<'a, S: Source + ?Sized> RectangleNeighborhood<'a, S> {
    /// An unbound window; call [`Neighborhood::update_source`] before scanning.
    pub fn new(ndim: usize, boundary: Boundary) -> Self {
        Self {
            window: WindowBinding::new(ndim, boundary),
        }
    }

    /// A window bound to `source` with the given span, centered on the min corner.
    pub fn over(source: &'a S, span: &[i64], boundary: Boundary) -> Self {
        Self {
            window: WindowBinding::over(source, span, boundary),
        }
    }
}

impl<'a, S: Source + ?Sized + 'a> Neighborhood<'a, S> for RectangleNeighborhood<'a, S> {
    type Cursor = RectangleCursor<'a, S>;

    #[inline]
    fn window(&self) -> &WindowBinding<'a, S> {
        &self.window
    }

    #[inline]
    fn window_mut(&mut self) -> &mut WindowBinding<'a, S> {
        &mut self.window
    }

    fn cursor(&self) -> RectangleCursor<'a, S> {
        RectangleCursor {
            walker: self.window.walker(),
            total: self.size(),
        }
    }

    fn copy(&self) -> Self {
        Self { window: self.window }
    }
}

/// Cursor over a [`RectangleNeighborhood`].
#[derive(Debug)]
pub struct RectangleCursor<'a, S: ?Sized> {
    walker: GridWalker<'a, S>,
    total: usize,
}

impl<S: Source + ?Sized> NeighborhoodCursor for RectangleCursor<'_, S> {
    #[inline]
    fn ndim(&self) -> usize {
        self.walker.ndim()
    }

    #[inline]
    fn fwd(&mut self) {
        self.walker.fwd();
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.walker.visited() < self.total
    }

    #[inline]
    fn get(&self) -> f32 {
        self.walker.get()
    }

    fn reset(&mut self) {
        self.walker.reset();
    }

    #[inline]
    fn int_position(&self, d: usize) -> i64 {
        self.walker.position(d)
    }

    #[inline]
    fn is_out_of_bounds(&self) -> bool {
        self.walker.is_out_of_bounds()
    }
}

impl<S: Source + ?Sized> Iterator for RectangleCursor<'_, S> {
    type Item = f32;

    #[inline]
    fn next(&mut self) -> Option<f32> {
        if !self.has_next() {
            return None;
        }
        self.walker.fwd();
        Some(self.walker.get())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.walker.visited().min(self.total);
        (remaining, Some(remaining))
    }
}

impl<S: Source + ?Sized> ExactSizeIterator for RectangleCursor<'_, S> {}

/// Every cell of a `2 * span + 1` box except its center.
#[derive(Debug)]
pub struct RectangleSkipCenterNeighborhood<'a, S: ?Sized> {
    window: WindowBinding<'a, S>,
}

impl<'a, S: Source + ?Sized> RectangleSkipCenterNeighborhood<'a, S> {
    pub fn new(ndim: usize, boundary: Boundary) -> Self {
        Self {
            window: WindowBinding::new(ndim, boundary),
        }
    }

    pub fn over(source: &'a S, span: &[i64], boundary: Boundary) -> Self {
        Self {
            window: WindowBinding::over(source, span, boundary),
        }
    }
}

impl<'a, S: Source + ?Sized + 'a> Neighborhood<'a, S> for RectangleSkipCenterNeighborhood<'a, S> {
    type Cursor = SkipCenterCursor<'a, S>;

    #[inline]
    fn window(&self) -> &WindowBinding<'a, S> {
        &self.window
    }

    #[inline]
    fn window_mut(&mut self) -> &mut WindowBinding<'a, S> {
        &mut self.window
    }

    fn size(&self) -> usize {
        self.geometry().volume() - 1
    }

    fn cursor(&self) -> SkipCenterCursor<'a, S> {
        let geometry = self.geometry();
        let mut center = [0; MAX_DIMS];
        center[..geometry.ndim()].copy_from_slice(geometry.center());
        SkipCenterCursor {
            walker: self.window.walker(),
            center,
            skipped: false,
            total: self.size(),
        }
    }

    fn copy(&self) -> Self {
        Self { window: self.window }
    }
}

/// Cursor over a [`RectangleSkipCenterNeighborhood`].
#[derive(Debug)]
pub struct SkipCenterCursor<'a, S: ?Sized> {
    walker: GridWalker<'a, S>,
    center: [i64; MAX_DIMS],
    skipped: bool,
    total: usize,
}

impl<S: Source + ?Sized> SkipCenterCursor<'_, S> {
    #[inline]
    fn yielded(&self) -> usize {
        self.walker.visited() - usize::from(self.skipped)
    }
}

impl<S: Source + ?Sized> NeighborhoodCursor for SkipCenterCursor<'_, S> {
    #[inline]
    fn ndim(&self) -> usize {
        self.walker.ndim()
    }

    #[inline]
    fn fwd(&mut self) {
        self.walker.fwd();
        if !self.skipped && self.walker.pos() == &self.center[..self.walker.ndim()] {
            self.skipped = true;
            self.walker.fwd();
        }
    }

    #[inline]
    fn has_next(&self) -> bool {
        self.yielded() < self.total
    }

    #[inline]
    fn get(&self) -> f32 {
        self.walker.get()
    }

    fn reset(&mut self) {
        self.walker.reset();
        self.skipped = false;
    }

    #[inline]
    fn int_position(&self, d: usize) -> i64 {
        self.walker.position(d)
    }

    #[inline]
    fn is_out_of_bounds(&self) -> bool {
        self.walker.is_out_of_bounds()
    }
}

impl<S: Source + ?Sized> Iterator for SkipCenterCursor<'_, S> {
    type Item = f32;

    #[inline]
    fn next(&mut self) -> Option<f32> {
        if !self.has_next() {
            return None;
        }
        self.fwd();
        Some(self.walker.get())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.yielded().min(self.total);
        (remaining, Some(remaining))
    }
}

impl<S: Source + ?Sized> ExactSizeIterator for SkipCenterCursor<'_, S> {}
