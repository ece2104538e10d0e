//! Quadratic sub-pixel localization.

use crate::array::{Extended, MAX_DIMS, Source};

/// Largest number of one-pixel re-centering moves before giving up.
pub const MAX_MOVES: usize = 10;

/// A peak is re-centered while any offset component exceeds this.
const MOVE_THRESHOLD: f64 = 0.5;

const SINGULAR_PIVOT: f64 = 1e-12;

/// Refined peak location in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refined {
    pub position: [f64; MAX_DIMS],
    pub value: f64,
    /// False when the fit did not settle and the integer peak was kept.
    pub converged: bool,
}

/// Fit a quadratic around `peak` and return its extremum.
///
/// Gradient and Hessian come from central differences. While the fitted
/// offset leaves the current cell, the fit moves one cell per axis towards it
/// (without leaving the image). A fit that cannot settle, or a singular
/// Hessian, keeps the integer position and the raw sample value.
pub fn refine<S: Source + ?Sized>(extended: &Extended<'_, S>, peak: &[i64]) -> Refined {
    let n = peak.len();
    debug_assert!(n <= MAX_DIMS);
    let interval = extended.interval();

    let mut center = [0i64; MAX_DIMS];
    center[..n].copy_from_slice(peak);

    for _ in 0..=MAX_MOVES {
        let Some(fit) = QuadraticFit::at(extended, &center[..n]) else {
            break;
        };

        let mut moved = false;
        let mut leaves_cell = false;
        for d in 0..n {
            let step = if fit.offset[d] > MOVE_THRESHOLD {
                1
            } else if fit.offset[d] < -MOVE_THRESHOLD {
                -1
            } else {
                0
            };
            if step != 0 {
                leaves_cell = true;
                let target = (center[d] + step).clamp(interval.min(d), interval.max(d));
                moved |= target != center[d];
                center[d] = target;
            }
        }

        if !leaves_cell {
            let mut position = [0.0; MAX_DIMS];
            for d in 0..n {
                position[d] = center[d] as f64 + fit.offset[d];
            }
            return Refined {
                position,
                value: fit.value,
                converged: true,
            };
        }
        if !moved {
            break;
        }
    }

    unrefined(extended, peak)
}

fn unrefined<S: Source + ?Sized>(extended: &Extended<'_, S>, peak: &[i64]) -> Refined {
    let mut position = [0.0; MAX_DIMS];
    for (p, &c) in position.iter_mut().zip(peak) {
        *p = c as f64;
    }
    Refined {
        position,
        value: extended.get(peak) as f64,
        converged: false,
    }
}

/// Second-order Taylor fit around one cell.
struct QuadraticFit {
    offset: [f64; MAX_DIMS],
    value: f64,
}

impl QuadraticFit {
    /// `None` when the Hessian is singular.
    fn at<S: Source + ?Sized>(extended: &Extended<'_, S>, center: &[i64]) -> Option<Self> {
        let n = center.len();
        let sample = |delta: &[(usize, i64)]| -> f64 {
            let mut pos = [0i64; MAX_DIMS];
            pos[..n].copy_from_slice(center);
            for &(d, s) in delta {
                pos[d] += s;
            }
            extended.get(&pos[..n]) as f64
        };

        let v = sample(&[]);
        let mut gradient = [0.0; MAX_DIMS];
        let mut hessian = [[0.0; MAX_DIMS]; MAX_DIMS];
        for d in 0..n {
            let fwd = sample(&[(d, 1)]);
            let bck = sample(&[(d, -1)]);
            gradient[d] = 0.5 * (fwd - bck);
            hessian[d][d] = fwd - 2.0 * v + bck;
            for e in 0..d {
                let h = 0.25
                    * (sample(&[(d, 1), (e, 1)]) - sample(&[(d, 1), (e, -1)])
                        - sample(&[(d, -1), (e, 1)])
                        + sample(&[(d, -1), (e, -1)]));
                hessian[d][e] = h;
                hessian[e][d] = h;
            }
        }

        let mut rhs = [0.0; MAX_DIMS];
        for d in 0..n {
            rhs[d] = -gradient[d];
        }
        let offset = solve(hessian, rhs, n)?;
        let value = v + 0.5 * (0..n).map(|d| gradient[d] * offset[d]).sum::<f64>();
        Some(Self { offset, value })
    }
}

/// Solve `a * x = b` for the leading `n x n` block by Gaussian elimination
/// with partial pivoting.
fn solve(
    mut a: [[f64; MAX_DIMS]; MAX_DIMS],
    mut b: [f64; MAX_DIMS],
    n: usize,
) -> Option<[f64; MAX_DIMS]> {
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < SINGULAR_PIVOT {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; MAX_DIMS];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
