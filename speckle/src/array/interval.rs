//! Axis-aligned integer bounding boxes.

/// An n-dimensional integer box with inclusive `min`/`max` per axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    min: Vec<i64>,
    max: Vec<i64>,
}

/// Result of [`Interval::squeeze`]: the reduced interval and the source axes it kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squeezed {
    pub interval: Interval,
    /// Source axis index for every axis of `interval`, in increasing order.
    pub axes: Vec<usize>,
}

impl Interval {
    pub fn new(min: Vec<i64>, max: Vec<i64>) -> Self {
        assert_eq!(min.len(), max.len(), "min and max must have the same length");
        for (d, (lo, hi)) in min.iter().zip(&max).enumerate() {
            assert!(lo <= hi, "axis {d}: min {lo} is greater than max {hi}");
        }
        Self { min, max }
    }

    /// Zero-based interval with the given extent per axis.
    pub fn from_dimensions(dims: &[usize]) -> Self {
        Self::from_min_size(&vec![0; dims.len()], dims)
    }

    pub fn from_min_size(min: &[i64], size: &[usize]) -> Self {
        assert_eq!(min.len(), size.len(), "min and size must have the same length");
        assert!(size.iter().all(|&s| s > 0), "every axis must have a positive size");
        let max = min
            .iter()
            .zip(size)
            .map(|(&lo, &s)| lo + s as i64 - 1)
            .collect();
        Self {
            min: min.to_vec(),
            max,
        }
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.min.len()
    }

    #[inline]
    pub fn min(&self, d: usize) -> i64 {
        self.min[d]
    }

    #[inline]
    pub fn max(&self, d: usize) -> i64 {
        self.max[d]
    }

    #[inline]
    pub fn min_corner(&self) -> &[i64] {
        &self.min
    }

    #[inline]
    pub fn max_corner(&self) -> &[i64] {
        &self.max
    }

    /// Number of samples along axis `d`.
    #[inline]
    pub fn dimension(&self, d: usize) -> usize {
        (self.max[d] - self.min[d] + 1) as usize
    }

    pub fn dimensions(&self) -> Vec<usize> {
        (0..self.ndim()).map(|d| self.dimension(d)).collect()
    }

    pub fn volume(&self) -> usize {
        (0..self.ndim()).map(|d| self.dimension(d)).product()
    }

    pub fn contains(&self, pos: &[i64]) -> bool {
        debug_assert_eq!(pos.len(), self.ndim());
        pos.iter()
            .zip(self.min.iter().zip(&self.max))
            .all(|(&p, (&lo, &hi))| p >= lo && p <= hi)
    }

    /// Grow (or shrink, for negative values) every axis by `border` on both sides.
    pub fn expand(&self, border: i64) -> Self {
        Self::new(
            self.min.iter().map(|&v| v - border).collect(),
            self.max.iter().map(|&v| v + border).collect(),
        )
    }

    pub fn translate(&self, offset: &[i64]) -> Self {
        assert_eq!(offset.len(), self.ndim(), "offset dimensionality mismatch");
        Self {
            min: self.min.iter().zip(offset).map(|(&v, &o)| v + o).collect(),
            max: self.max.iter().zip(offset).map(|(&v, &o)| v + o).collect(),
        }
    }

    /// Same extent, moved so that its min corner is `min`.
    pub fn with_origin(&self, min: &[i64]) -> Self {
        Self::from_min_size(min, &self.dimensions())
    }

    /// Drop every axis of extent 1.
    pub fn squeeze(&self) -> Squeezed {
        let axes: Vec<usize> = (0..self.ndim())
            .filter(|&d| self.dimension(d) > 1)
            .collect();
        let interval = Self {
            min: axes.iter().map(|&d| self.min[d]).collect(),
            max: axes.iter().map(|&d| self.max[d]).collect(),
        };
        Squeezed { interval, axes }
    }

    /// Number of axes with extent greater than one.
    pub fn num_non_singleton(&self) -> usize {
        (0..self.ndim()).filter(|&d| self.dimension(d) > 1).count()
    }
}
