//! Detected blob record.

/// A detected blob in physical units.
///
/// Positions always have three components; axes the detection did not cover
/// are set to the calibrated coordinate of the processed interval on that
/// axis (zero for missing axes of 1D/2D sources).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spot {
    /// Position in physical units (pixel coordinate times calibration).
    pub position: [f64; 3],
    /// Radius the detector was tuned for.
    pub radius: f64,
    /// Filter response at the spot (interpolated with sub-pixel refinement).
    pub quality: f64,
}

impl Spot {
    pub fn new(position: [f64; 3], radius: f64, quality: f64) -> Self {
        Self {
            position,
            radius,
            quality,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position[0]
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position[1]
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.position[2]
    }

    /// Squared euclidean distance between two spot centers.
    pub fn distance_sq(&self, other: &Spot) -> f64 {
        self.position
            .iter()
            .zip(&other.position)
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}
