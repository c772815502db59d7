//! Dense matrix helpers
//!
//! The solvers use `ndarray::Array2` / `Array1` as their matrix and vector types. This
//! module gathers the shape checks and small products they share, written against
//! [`Scalar`] so they work for exact domains as well as floats.

use crate::error::{Result, SolverError};
use crate::traits::{Scalar, max_norm};
use ndarray::{Array1, Array2, s};

/// Ensure `a` is square and non-empty, returning its order.
pub fn check_square<T: Scalar>(a: &Array2<T>) -> Result<usize> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(SolverError::NotSquare { rows, cols });
    }
    if rows == 0 {
        return Err(SolverError::EmptySystem);
    }
    Ok(rows)
}

/// Ensure `a` is square and `b` matches its order.
pub fn check_system<T: Scalar>(a: &Array2<T>, b: &Array1<T>) -> Result<usize> {
    let n = check_square(a)?;
    if b.len() != n {
        return Err(SolverError::DimensionMismatch {
            what: "right-hand side",
            expected: n,
            got: b.len(),
        });
    }
    Ok(n)
}

/// y = A * x
pub fn matvec<T: Scalar>(a: &Array2<T>, x: &Array1<T>) -> Array1<T> {
    a.dot(x)
}

/// C = A * B
pub fn matmul<T: Scalar>(a: &Array2<T>, b: &Array2<T>) -> Array2<T> {
    a.dot(b)
}

/// Owned transpose
pub fn transpose<T: Scalar>(a: &Array2<T>) -> Array2<T> {
    a.t().to_owned()
}

/// r = b - A * x
pub fn residual<T: Scalar>(a: &Array2<T>, x: &Array1<T>, b: &Array1<T>) -> Array1<T> {
    b - &matvec(a, x)
}

/// Largest entry magnitude of a matrix.
pub fn max_abs<T: Scalar>(a: &Array2<T>) -> T {
    max_norm(a.iter())
}

/// Roundoff scale of the whole matrix: `n * eps * max|a_ij|`.
///
/// Zero for exact domains.
pub fn roundoff_scale<T: Scalar>(a: &Array2<T>) -> T {
    T::from_usize(a.nrows().max(1)) * T::epsilon() * max_abs(a)
}

/// Per-column zero-pivot thresholds: `n * eps * max_i |a_ij|` for column `j`.
///
/// A pivot produced in column `j` is compared against the scale of that column only,
/// so a badly scaled but well-posed matrix such as `diag(1e20, 1)` is accepted. Zero
/// for exact domains, so only true zeros are rejected there.
pub fn column_thresholds<T: Scalar>(a: &Array2<T>) -> Vec<T> {
    let scale = T::from_usize(a.nrows().max(1)) * T::epsilon();
    a.columns()
        .into_iter()
        .map(|col| scale * max_norm(col.iter()))
        .collect()
}

/// First index pair `(i, j)` with `|a_ij - a_ji| > tol`, if any.
pub fn find_asymmetry<T: Scalar>(a: &Array2<T>, tol: T) -> Option<(usize, usize)> {
    let n = a.nrows();
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .find(|&(i, j)| (a[[i, j]] - a[[j, i]]).norm() > tol)
}

/// Convert to an `f64` matrix (lossy for exact domains).
pub fn to_f64_matrix<T: Scalar>(a: &Array2<T>) -> Array2<f64> {
    a.mapv(|v| v.to_f64())
}

/// `[A | b]` together with the current column order of the unknowns.
///
/// Only lives for the duration of one elimination call.
#[derive(Debug, Clone)]
pub struct AugmentedSystem<T: Scalar> {
    /// n x (n + 1) working matrix
    pub matrix: Array2<T>,
    /// `columns[k]` is the original index of the unknown now in column `k`
    pub columns: Vec<usize>,
    /// Zero-pivot threshold of the unknown now in column `k`
    pub thresholds: Vec<T>,
}

impl<T: Scalar> AugmentedSystem<T> {
    /// Copy `a` and `b` into a fresh augmented matrix.
    pub fn new(a: &Array2<T>, b: &Array1<T>) -> Result<Self> {
        let n = check_system(a, b)?;
        let mut matrix = Array2::zeros((n, n + 1));
        matrix.slice_mut(s![.., ..n]).assign(a);
        matrix.column_mut(n).assign(b);
        Ok(Self {
            matrix,
            columns: (0..n).collect(),
            thresholds: column_thresholds(a),
        })
    }

    /// Number of equations
    pub fn order(&self) -> usize {
        self.matrix.nrows()
    }

    /// Swap two equations.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let ncols = self.matrix.ncols();
        for k in 0..ncols {
            self.matrix.swap([i, k], [j, k]);
        }
    }

    /// Swap two unknowns (coefficient columns) and record the permutation.
    pub fn swap_columns(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let nrows = self.matrix.nrows();
        for k in 0..nrows {
            self.matrix.swap([k, i], [k, j]);
        }
        self.columns.swap(i, j);
        self.thresholds.swap(i, j);
    }
}
