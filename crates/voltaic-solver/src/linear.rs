//! Dense linear solvers.
//!
//! Gaussian elimination with partial pivoting by column absolute value, in
//! two parallel implementations over real and complex entries. The solver
//! works on a locally augmented copy; the caller's matrix is never touched.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use voltaic_core::EPSILON;

use crate::error::{Error, Result};

/// Solve a real system Ax = b.
pub fn solve_dense(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    check_dimensions(a.nrows(), a.ncols(), b.len())?;
    let n = a.nrows();
    let mut m = a.clone_owned();
    let mut x = b.clone_owned();

    // Forward elimination.
    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_mag = m[(k, k)].abs();
        for i in (k + 1)..n {
            let mag = m[(i, k)].abs();
            if mag > pivot_mag {
                pivot_row = i;
                pivot_mag = mag;
            }
        }
        if pivot_mag < EPSILON {
            return Err(Error::SingularMatrix { column: k });
        }
        if pivot_row != k {
            m.swap_rows(k, pivot_row);
            x.swap_rows(k, pivot_row);
        }

        let pivot = m[(k, k)];
        for i in (k + 1)..n {
            let factor = m[(i, k)] / pivot;
            if factor.abs() < EPSILON {
                continue;
            }
            for j in k..n {
                let delta = factor * m[(k, j)];
                m[(i, j)] -= delta;
            }
            let delta = factor * x[k];
            x[i] -= delta;
        }
    }

    // Back substitution.
    for k in (0..n).rev() {
        let mut sum = x[k];
        for j in (k + 1)..n {
            sum -= m[(k, j)] * x[j];
        }
        x[k] = sum / m[(k, k)];
    }

    Ok(x)
}

/// Solve a complex system Ax = b. Identical to [`solve_dense`] with complex
/// arithmetic; pivoting compares magnitudes.
pub fn solve_complex(
    a: &DMatrix<Complex<f64>>,
    b: &DVector<Complex<f64>>,
) -> Result<DVector<Complex<f64>>> {
    check_dimensions(a.nrows(), a.ncols(), b.len())?;
    let n = a.nrows();
    let mut m = a.clone_owned();
    let mut x = b.clone_owned();

    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_mag = m[(k, k)].norm();
        for i in (k + 1)..n {
            let mag = m[(i, k)].norm();
            if mag > pivot_mag {
                pivot_row = i;
                pivot_mag = mag;
            }
        }
        if pivot_mag < EPSILON {
            return Err(Error::SingularMatrix { column: k });
        }
        if pivot_row != k {
            m.swap_rows(k, pivot_row);
            x.swap_rows(k, pivot_row);
        }

        let pivot = m[(k, k)];
        for i in (k + 1)..n {
            let factor = m[(i, k)] / pivot;
            if factor.norm() < EPSILON {
                continue;
            }
            for j in k..n {
                let delta = factor * m[(k, j)];
                m[(i, j)] -= delta;
            }
            let delta = factor * x[k];
            x[i] -= delta;
        }
    }

    for k in (0..n).rev() {
        let mut sum = x[k];
        for j in (k + 1)..n {
            sum -= m[(k, j)] * x[j];
        }
        x[k] = sum / m[(k, k)];
    }

    Ok(x)
}

fn check_dimensions(nrows: usize, ncols: usize, blen: usize) -> Result<()> {
    if nrows != ncols {
        return Err(Error::DimensionMismatch {
            expected: nrows,
            actual: ncols,
        });
    }
    if nrows != blen {
        return Err(Error::DimensionMismatch {
            expected: nrows,
            actual: blen,
        });
    }
    Ok(())
}
