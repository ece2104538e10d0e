//! Sampled n-dimensional arrays, intervals, and lazy views over them.
//!
//! Every algorithm in the crate reads samples through the [`Source`] trait,
//! so owned images, crops and boundary extensions can be mixed freely
//! without copying data.

mod boundary;
mod image;
mod interval;
mod view;


pub use boundary::{Boundary, Extended, Restricted};
pub use image::Image;
pub use interval::{Interval, Squeezed};
pub use view::SqueezedView;

pub(crate) use image::strides_of;

/// Largest dimensionality the detection algorithms operate on.
pub const MAX_DIMS: usize = 3;

/// Read access to samples on a bounded integer grid.
///
/// `get` is only defined for positions inside `interval()`; wrap the source
/// in an [`Extended`] view to sample anywhere.
pub trait Source: Sync {
    fn interval(&self) -> &Interval;

    fn get(&self, pos: &[i64]) -> f32;

    #[inline]
    fn ndim(&self) -> usize {
        self.interval().ndim()
    }
}

impl<S: Source + ?Sized> Source for &S {
    #[inline]
    fn interval(&self) -> &Interval {
        (**self).interval()
    }

    #[inline]
    fn get(&self, pos: &[i64]) -> f32 {
        (**self).get(pos)
    }
}
