//! Triangular solves shared by the elimination and factorization methods

use crate::error::{Result, SolverError};
use crate::traits::Scalar;
use ndarray::{Array1, Array2};

/// Solve L y = b for lower triangular L.
///
/// With `unit_diagonal` the diagonal of `l` is not read and taken as 1.
pub fn forward_substitution<T: Scalar>(
    l: &Array2<T>,
    b: &Array1<T>,
    unit_diagonal: bool,
    tol: T,
) -> Result<Array1<T>> {
    let n = b.len();
    let mut y = b.clone();
    for i in 0..n {
        for j in 0..i {
            let l_ij = l[[i, j]];
            y[i] = y[i] - l_ij * y[j];
        }
        if !unit_diagonal {
            let l_ii = l[[i, i]];
            if l_ii.is_zero_approx(tol) {
                return Err(SolverError::ZeroPivot { step: i });
            }
            y[i] /= l_ii;
        }
    }
    Ok(y)
}

/// Solve U x = y for upper triangular U.
///
/// `x[n-1] = y[n-1] / U[n-1,n-1]`, then for `i = n-2..0`:
/// `x[i] = (y[i] - sum_{j>i} U[i,j] x[j]) / U[i,i]`.
pub fn back_substitution<T: Scalar>(
    u: &Array2<T>,
    y: &Array1<T>,
    unit_diagonal: bool,
    tol: T,
) -> Result<Array1<T>> {
    let n = y.len();
    let mut x = y.clone();
    for i in (0..n).rev() {
        for j in (i + 1)..n {
            let u_ij = u[[i, j]];
            x[i] = x[i] - u_ij * x[j];
        }
        if !unit_diagonal {
            let u_ii = u[[i, i]];
            if u_ii.is_zero_approx(tol) {
                return Err(SolverError::ZeroPivot { step: i });
            }
            x[i] /= u_ii;
        }
    }
    Ok(x)
}

/// Solve Lᵗ x = y using the lower triangular `l` directly.
pub fn back_substitution_transposed<T: Scalar>(
    l: &Array2<T>,
    y: &Array1<T>,
    tol: T,
) -> Result<Array1<T>> {
    let n = y.len();
    let mut x = y.clone();
    for i in (0..n).rev() {
        for j in (i + 1)..n {
            let l_ji = l[[j, i]];
            x[i] = x[i] - l_ji * x[j];
        }
        let l_ii = l[[i, i]];
        if l_ii.is_zero_approx(tol) {
            return Err(SolverError::ZeroPivot { step: i });
        }
        x[i] /= l_ii;
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_forward_substitution() {
        let l = array![[2.0_f64, 0.0, 0.0], [1.0, 1.0, 0.0], [-1.0, -2.0, 3.0]];
        let b = array![10.0_f64, 5.0, 4.0];
        let y = forward_substitution(&l, &b, false, 0.0).unwrap();
        assert_relative_eq!(y[0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(y[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(y[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unit_diagonal_is_not_read() {
        let l = array![[7.0_f64, 0.0], [2.0, 7.0]];
        let b = array![1.0_f64, 4.0];
        let y = forward_substitution(&l, &b, true, 0.0).unwrap();
        assert_eq!(y, array![1.0, 2.0]);
    }

    #[test]
    fn test_back_substitution_transposed_matches_explicit() {
        let l = array![[2.0_f64, 0.0, 0.0], [1.0, 1.0, 0.0], [-1.0, -2.0, 3.0]];
        let y = array![5.0_f64, 0.0, 3.0];
        let x1 = back_substitution_transposed(&l, &y, 0.0).unwrap();
        let x2 = back_substitution(&l.t().to_owned(), &y, false, 0.0).unwrap();
        for i in 0..3 {
            assert_relative_eq!(x1[i], x2[i], epsilon = 1e-12);
        }
        assert_relative_eq!(x1[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x1[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x1[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_diagonal() {
        let u = array![[1.0_f64, 1.0], [0.0, 0.0]];
        let y = array![1.0_f64, 1.0];
        assert_eq!(
            back_substitution(&u, &y, false, 0.0),
            Err(SolverError::ZeroPivot { step: 1 })
        );
    }
}
