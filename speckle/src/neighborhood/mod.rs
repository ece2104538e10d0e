//! Movable windows over n-dimensional sources.
//!
//! A neighborhood is a box of odd extent `2 * span[d] + 1` around a center.
//! It can be moved without reallocating, bound to a source through an
//! out-of-bounds [`Boundary`] policy, and scanned with a cursor. Median
//! filtering and the local-maximum test both scan through this one
//! primitive, so n-dimensional edge handling lives in a single place.
//!
//! Variants share a [`WindowBinding`] (geometry plus source binding) and
//! differ only in the cells their cursor visits:
//! - [`RectangleNeighborhood`]: every cell of the box.
//! - [`RectangleSkipCenterNeighborhood`]: every cell except the center.

mod cursor;
mod rectangle;


use cursor::GridWalker;
pub use cursor::NeighborhoodCursor;
pub use rectangle::{
    RectangleCursor, RectangleNeighborhood, RectangleSkipCenterNeighborhood, SkipCenterCursor,
};

use crate::array::{Boundary, Extended, MAX_DIMS, Source};

/// Center and span of a window, shared by every neighborhood variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    n: usize,
    center: [i64; MAX_DIMS],
    span: [i64; MAX_DIMS],
}

impl WindowGeometry {
    /// A window of `n` axes centered on the origin with zero span.
    pub fn new(n: usize) -> Self {
        assert!(
            (1..=MAX_DIMS).contains(&n),
            "neighborhoods support 1 to {MAX_DIMS} axes, got {n}"
        );
        Self {
            n,
            center: [0; MAX_DIMS],
            span: [0; MAX_DIMS],
        }
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn center(&self) -> &[i64] {
        &self.center[..self.n]
    }

    #[inline]
    pub fn span(&self) -> &[i64] {
        &self.span[..self.n]
    }

    pub fn set_span(&mut self, span: &[i64]) {
        assert_eq!(span.len(), self.n, "span dimensionality mismatch");
        for (d, &s) in span.iter().enumerate() {
            assert!(s >= 0, "span must be non-negative, got {s} on axis {d}");
            self.span[d] = s;
        }
    }

    #[inline]
    pub fn center_mut(&mut self) -> &mut [i64] {
        &mut self.center[..self.n]
    }

    #[inline]
    pub fn min(&self, d: usize) -> i64 {
        self.center[d] - self.span[d]
    }

    #[inline]
    pub fn max(&self, d: usize) -> i64 {
        self.center[d] + self.span[d]
    }

    #[inline]
    pub fn dimension(&self, d: usize) -> usize {
        (2 * self.span[d] + 1) as usize
    }

    /// Number of cells in the full box.
    pub fn volume(&self) -> usize {
        (0..self.n).map(|d| self.dimension(d)).product()
    }

    pub(crate) fn min_array(&self) -> [i64; MAX_DIMS] {
        let mut min = [0; MAX_DIMS];
        for (d, m) in min.iter_mut().enumerate().take(self.n) {
            *m = self.min(d);
        }
        min
    }

    pub(crate) fn max_array(&self) -> [i64; MAX_DIMS] {
        let mut max = [0; MAX_DIMS];
        for (d, m) in max.iter_mut().enumerate().take(self.n) {
            *m = self.max(d);
        }
        max
    }
}

/// Window geometry together with its boundary policy and bound source.
#[derive(Debug)]
pub struct WindowBinding<'a, S: ?Sized> {
    geometry: WindowGeometry,
    boundary: Boundary,
    extended: Option<Extended<'a, S>>,
}

impl<S: ?Sized> Clone for WindowBinding<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for WindowBinding<'_, S> {}

impl<'a, S: Source + ?Sized> WindowBinding<'a, S> {
    /// An unbound window of `ndim` axes.
    pub fn new(ndim: usize, boundary: Boundary) -> Self {
        Self {
            geometry: WindowGeometry::new(ndim),
            boundary,
            extended: None,
        }
    }

    /// A window bound to `source` with the given span, centered on the min corner.
    pub fn over(source: &'a S, span: &[i64], boundary: Boundary) -> Self {
        let mut window = Self::new(source.ndim(), boundary);
        window.geometry.set_span(span);
        window
            .geometry
            .center_mut()
            .copy_from_slice(source.interval().min_corner());
        window.bind(source);
        window
    }

    #[inline]
    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    #[inline]
    pub fn geometry_mut(&mut self) -> &mut WindowGeometry {
        &mut self.geometry
    }

    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// The extended source, or `None` while unbound.
    #[inline]
    pub fn extended(&self) -> Option<Extended<'a, S>> {
        self.extended
    }

    pub fn bind(&mut self, source: &'a S) {
        assert_eq!(
            source.ndim(),
            self.geometry.ndim(),
            "neighborhood and source dimensionality mismatch"
        );
        self.extended = Some(Extended::new(source, self.boundary));
    }

    /// Odometer over the full box at the current position.
    pub(crate) fn walker(&self) -> GridWalker<'a, S> {
        GridWalker::new(
            bound_or_panic(self.extended),
            self.geometry.ndim(),
            self.geometry.min_array(),
            self.geometry.max_array(),
        )
    }
}

/// Positioning, bounds and iteration contract of a movable window.
///
/// Implementors expose their [`WindowBinding`] and build a cursor; binding,
/// positioning and bounds queries are shared default methods.
pub trait Neighborhood<'a, S: Source + ?Sized + 'a> {
    type Cursor: NeighborhoodCursor;

    fn window(&self) -> &WindowBinding<'a, S>;

    fn window_mut(&mut self) -> &mut WindowBinding<'a, S>;

    /// A fresh cursor positioned before the first cell.
    fn cursor(&self) -> Self::Cursor;

    /// Independent window with the same center, span and source binding.
    fn copy(&self) -> Self
    where
        Self: Sized;

    #[inline]
    fn geometry<'s>(&'s self) -> &'s WindowGeometry
    where
        'a: 's,
    {
        self.window().geometry()
    }

    #[inline]
    fn geometry_mut<'s>(&'s mut self) -> &'s mut WindowGeometry
    where
        'a: 's,
    {
        self.window_mut().geometry_mut()
    }

    #[inline]
    fn boundary(&self) -> Boundary {
        self.window().boundary()
    }

    /// The extended source, or `None` before [`Self::update_source`].
    #[inline]
    fn extended(&self) -> Option<Extended<'a, S>> {
        self.window().extended()
    }

    /// Bind the window to `source` through this neighborhood's boundary policy.
    ///
    /// Must be called again whenever the backing source changes.
    fn update_source(&mut self, source: &'a S) {
        self.window_mut().bind(source);
    }

    /// Number of cells visited by the cursor.
    fn size(&self) -> usize {
        self.geometry().volume()
    }

    #[inline]
    fn ndim(&self) -> usize {
        self.geometry().ndim()
    }

    fn set_span(&mut self, span: &[i64]) {
        self.geometry_mut().set_span(span);
    }

    fn set_position(&mut self, position: &[i64]) {
        let center = self.geometry_mut().center_mut();
        assert_eq!(position.len(), center.len(), "position dimensionality mismatch");
        center.copy_from_slice(position);
    }

    fn set_position_axis(&mut self, position: i64, d: usize) {
        self.geometry_mut().center_mut()[d] = position;
    }

    fn move_by(&mut self, distance: &[i64]) {
        let center = self.geometry_mut().center_mut();
        assert_eq!(distance.len(), center.len(), "distance dimensionality mismatch");
        for (c, &delta) in center.iter_mut().zip(distance) {
            *c += delta;
        }
    }

    /// Move by a real offset, rounded to the nearest cell.
    fn move_by_real(&mut self, distance: &[f64]) {
        let center = self.geometry_mut().center_mut();
        assert_eq!(distance.len(), center.len(), "distance dimensionality mismatch");
        for (c, &delta) in center.iter_mut().zip(distance) {
            *c += delta.round() as i64;
        }
    }

    fn move_axis(&mut self, distance: i64, d: usize) {
        self.geometry_mut().center_mut()[d] += distance;
    }

    fn fwd(&mut self, d: usize) {
        self.move_axis(1, d);
    }

    fn bck(&mut self, d: usize) {
        self.move_axis(-1, d);
    }

    #[inline]
    fn center(&self, d: usize) -> i64 {
        self.geometry().center()[d]
    }

    #[inline]
    fn min(&self, d: usize) -> i64 {
        self.geometry().min(d)
    }

    #[inline]
    fn max(&self, d: usize) -> i64 {
        self.geometry().max(d)
    }

    #[inline]
    fn real_min(&self, d: usize) -> f64 {
        self.geometry().min(d) as f64
    }

    #[inline]
    fn real_max(&self, d: usize) -> f64 {
        self.geometry().max(d) as f64
    }

    /// Min corner along `d` in physical units.
    #[inline]
    fn calibrated_min(&self, d: usize, calibration: &[f64]) -> f64 {
        self.real_min(d) * calibration[d]
    }

    /// Max corner along `d` in physical units.
    #[inline]
    fn calibrated_max(&self, d: usize, calibration: &[f64]) -> f64 {
        self.real_max(d) * calibration[d]
    }

    #[inline]
    fn dimension(&self, d: usize) -> usize {
        self.geometry().dimension(d)
    }

    fn dimensions(&self) -> Vec<usize> {
        (0..self.ndim()).map(|d| self.dimension(d)).collect()
    }

    /// Sample at the window's min corner, read through the boundary policy.
    fn first_element(&self) -> f32 {
        let geometry = self.geometry();
        let min = geometry.min_array();
        bound_or_panic(self.extended()).get(&min[..geometry.ndim()])
    }

    /// Iteration order depends on the window position, so two windows only
    /// share it when they are the same instance.
    fn same_iteration_order(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        std::ptr::eq(self, other)
    }
}

pub(crate) fn bound_or_panic<T>(extended: Option<T>) -> T {
    match extended {
        Some(extended) => extended,
        None => panic!("neighborhood has no source: call update_source() before sampling"),
    }
}
