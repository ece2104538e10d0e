//! Owned n-dimensional f32 image.

use super::{Interval, Source};

/// Dense f32 samples laid out with axis 0 fastest, placed on an [`Interval`].
///
/// Unlike a plain buffer, the image keeps the absolute coordinates of its
/// samples, so a crop of a larger image can be addressed with the parent's
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    interval: Interval,
    strides: Vec<usize>,
    pixels: Vec<f32>,
}

impl Image {
    pub fn new(interval: Interval, pixels: Vec<f32>) -> Self {
        assert_eq!(
            pixels.len(),
            interval.volume(),
            "pixels length must equal the interval volume"
        );
        let strides = strides_of(&interval.dimensions());
        Self {
            interval,
            strides,
            pixels,
        }
    }

    pub fn zeros(interval: Interval) -> Self {
        let len = interval.volume();
        Self::new(interval, vec![0.0; len])
    }

    pub fn filled(interval: Interval, value: f32) -> Self {
        let len = interval.volume();
        Self::new(interval, vec![value; len])
    }

    /// Evaluate `f` at every position of `interval`.
    pub fn from_fn<F>(interval: Interval, mut f: F) -> Self
    where
        F: FnMut(&[i64]) -> f32,
    {
        let mut image = Self::zeros(interval);
        let mut pos = vec![0i64; image.ndim()];
        for i in 0..image.pixels.len() {
            image.position_into(i, &mut pos);
            image.pixels[i] = f(&pos);
        }
        image
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.interval.ndim()
    }

    #[inline]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    #[inline]
    pub fn dimension(&self, d: usize) -> usize {
        self.interval.dimension(d)
    }

    #[inline]
    pub fn dimensions(&self) -> Vec<usize> {
        self.interval.dimensions()
    }

    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_vec(self) -> Vec<f32> {
        self.pixels
    }

    /// Linear index of an in-bounds absolute position.
    #[inline]
    pub fn index_of(&self, pos: &[i64]) -> usize {
        debug_assert!(
            self.interval.contains(pos),
            "position {pos:?} outside {:?}",
            self.interval
        );
        pos.iter()
            .zip(self.interval.min_corner())
            .zip(&self.strides)
            .map(|((&p, &lo), &s)| (p - lo) as usize * s)
            .sum()
    }

    /// Absolute position of linear index `index`, written into `pos`.
    #[inline]
    pub fn position_into(&self, mut index: usize, pos: &mut [i64]) {
        debug_assert!(index < self.pixels.len());
        for d in 0..self.ndim() {
            let dim = self.interval.dimension(d);
            pos[d] = self.interval.min(d) + (index % dim) as i64;
            index /= dim;
        }
    }

    pub fn position_of(&self, index: usize) -> Vec<i64> {
        let mut pos = vec![0; self.ndim()];
        self.position_into(index, &mut pos);
        pos
    }

    #[inline]
    pub fn get(&self, pos: &[i64]) -> f32 {
        self.pixels[self.index_of(pos)]
    }

    #[inline]
    pub fn set(&mut self, pos: &[i64], value: f32) {
        let idx = self.index_of(pos);
        self.pixels[idx] = value;
    }

    /// Move the image so its min corner sits at `min`. Samples are not touched.
    pub fn with_origin(mut self, min: &[i64]) -> Self {
        self.interval = self.interval.with_origin(min);
        self
    }

    pub fn max_value(&self) -> f32 {
        self.pixels.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min_value(&self) -> f32 {
        self.pixels.iter().copied().fold(f32::INFINITY, f32::min)
    }
}

impl Source for Image {
    #[inline]
    fn interval(&self) -> &Interval {
        &self.interval
    }

    #[inline]
    fn get(&self, pos: &[i64]) -> f32 {
        Image::get(self, pos)
    }
}

pub(crate) fn strides_of(dims: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(dims.len());
    let mut stride = 1;
    for &dim in dims {
        strides.push(stride);
        stride *= dim;
    }
    strides
}
