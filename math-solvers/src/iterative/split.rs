//! Splitting `A = D - L - U`

use crate::dense::check_square;
use crate::error::{Result, SolverError};
use crate::traits::Scalar;
use ndarray::Array2;

/// Diagonal, negated strictly lower and negated strictly upper parts of a square matrix.
#[derive(Debug, Clone)]
pub struct SplitMatrices<T: Scalar> {
    /// Diagonal part
    pub d: Array2<T>,
    /// Strictly lower part, negated
    pub l: Array2<T>,
    /// Strictly upper part, negated
    pub u: Array2<T>,
}

impl<T: Scalar> SplitMatrices<T> {
    /// Split `a`. Only the shape is checked; see [`check_diagonal`] for the pivots.
    pub fn from_matrix(a: &Array2<T>) -> Result<Self> {
        let n = check_square(a)?;
        let mut d = Array2::zeros((n, n));
        let mut l = Array2::zeros((n, n));
        let mut u = Array2::zeros((n, n));
        for ((i, j), &v) in a.indexed_iter() {
            if i == j {
                d[[i, j]] = v;
            } else if i > j {
                l[[i, j]] = -v;
            } else {
                u[[i, j]] = -v;
            }
        }
        Ok(Self { d, l, u })
    }
}

/// First diagonal entry that is exactly zero, as [`SolverError::ZeroPivot`].
pub fn check_diagonal<T: Scalar>(a: &Array2<T>) -> Result<()> {
    match a.diag().iter().position(|v| v.is_zero()) {
        Some(step) => Err(SolverError::ZeroPivot { step }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_split_signs() {
        let a = array![[4.0_f64, -1.0, 1.0], [4.0, -8.0, 1.0], [-2.0, 1.0, 5.0]];
        let split = SplitMatrices::from_matrix(&a).unwrap();

        assert_eq!(split.d.diag(), array![4.0, -8.0, 5.0]);
        assert_eq!(split.l[[1, 0]], -4.0);
        assert_eq!(split.l[[2, 0]], 2.0);
        assert_eq!(split.u[[0, 1]], 1.0);
        assert_eq!(split.u[[0, 0]], 0.0);
        assert_eq!(&(&split.d - &split.l) - &split.u, a);
    }

    #[test]
    fn test_zero_diagonal() {
        let a = array![[1.0_f64, 2.0], [3.0, 0.0]];
        assert_eq!(check_diagonal(&a), Err(SolverError::ZeroPivot { step: 1 }));
        assert!(check_diagonal(&array![[1.0_f64]]).is_ok());
    }
}
