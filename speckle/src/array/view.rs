//! Cropped views with singleton axes removed.

use super::{Interval, MAX_DIMS, Source};

/// A source restricted to an interval whose singleton axes are dropped.
///
/// Coordinates on the kept axes are the source's own coordinates, so a
/// sample at `(x, z)` of a view over `[0..99, 7..7, 0..49]` reads source
/// position `(x, 7, z)`.
#[derive(Debug, Clone)]
pub struct SqueezedView<'a, S: ?Sized> {
    source: &'a S,
    interval: Interval,
    axes: Vec<usize>,
    template: [i64; MAX_DIMS],
    source_ndim: usize,
}

impl<'a, S: Source + ?Sized> SqueezedView<'a, S> {
    /// `interval` is given in source coordinates and must lie inside the source.
    pub fn new(source: &'a S, interval: &Interval) -> Self {
        let source_ndim = source.interval().ndim();
        assert_eq!(
            interval.ndim(),
            source_ndim,
            "view interval dimensionality mismatch"
        );
        assert!(
            source_ndim <= MAX_DIMS,
            "views support at most {MAX_DIMS} axes, got {source_ndim}"
        );
        assert!(
            source.interval().contains(interval.min_corner())
                && source.interval().contains(interval.max_corner()),
            "view interval {interval:?} is not inside the source {:?}",
            source.interval()
        );

        let mut template = [0i64; MAX_DIMS];
        template[..source_ndim].copy_from_slice(interval.min_corner());
        let squeezed = interval.squeeze();

        Self {
            source,
            interval: squeezed.interval,
            axes: squeezed.axes,
            template,
            source_ndim,
        }
    }

    /// Source axis of every view axis.
    #[inline]
    pub fn axes(&self) -> &[usize] {
        &self.axes
    }

    #[inline]
    pub fn source(&self) -> &'a S {
        self.source
    }
}

impl<S: Source + ?Sized> Source for SqueezedView<'_, S> {
    #[inline]
    fn interval(&self) -> &Interval {
        &self.interval
    }

    #[inline]
    fn get(&self, pos: &[i64]) -> f32 {
        let mut full = self.template;
        for (&p, &axis) in pos.iter().zip(&self.axes) {
            full[axis] = p;
        }
        self.source.get(&full[..self.source_ndim])
    }
}
