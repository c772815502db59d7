//! Cholesky (square-root method) factorization
//!
//! For a symmetric positive definite `A`, computes lower triangular `L` with
//! `A = L * Lᵗ`. Positive definiteness is not checked up front: the factorization
//! fails with [`SolverError::NotPositiveDefinite`] as soon as a value under a square
//! root is not strictly positive.

use crate::dense::{check_square, find_asymmetry, matmul, roundoff_scale, transpose};
use crate::diagnostics::{DiagnosticsSink, NoopSink, StepPhase, StepRecord};
use crate::direct::triangular::{back_substitution_transposed, forward_substitution};
use crate::error::{Result, SolverError};
use crate::traits::Scalar;
use ndarray::{Array1, Array2};

/// Cholesky factor `L` of `A = L Lᵗ`
#[derive(Debug, Clone)]
pub struct CholeskyFactor<T: Scalar> {
    /// Lower triangular factor
    pub l: Array2<T>,
}

impl<T: Scalar> CholeskyFactor<T> {
    /// Matrix dimension
    pub fn n(&self) -> usize {
        self.l.nrows()
    }

    /// Solve Ax = b: forward substitution on L y = b, then back substitution on Lᵗ x = y
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>> {
        if b.len() != self.n() {
            return Err(SolverError::DimensionMismatch {
                what: "right-hand side",
                expected: self.n(),
                got: b.len(),
            });
        }
        let y = forward_substitution(&self.l, b, false, T::zero())?;
        back_substitution_transposed(&self.l, &y, T::zero())
    }

    /// L * Lᵗ
    pub fn reconstruct(&self) -> Array2<T> {
        matmul(&self.l, &transpose(&self.l))
    }
}

/// Cholesky factorization
pub fn cholesky<T: Scalar>(a: &Array2<T>) -> Result<CholeskyFactor<T>> {
    cholesky_with_diagnostics(a, &mut NoopSink)
}

/// Cholesky factorization, one [`StepPhase::Factorization`] record per row.
///
/// Row `i` of `L`: `L[i,j] = (A[i,j] - sum_{k<j} L[i,k] L[j,k]) / L[j,j]` for `j < i`,
/// then `L[i,i] = sqrt(A[i,i] - sum_{k<i} L[i,k]^2)`.
pub fn cholesky_with_diagnostics<T, S>(a: &Array2<T>, sink: &mut S) -> Result<CholeskyFactor<T>>
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    let n = check_square(a)?;
    if let Some((row, col)) = find_asymmetry(a, roundoff_scale(a)) {
        return Err(SolverError::NotSymmetric { row, col });
    }

    let mut l = Array2::<T>::zeros((n, n));
    for i in 0..n {
        for j in 0..i {
            let mut sum = T::zero();
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
        }

        let mut sum = T::zero();
        for k in 0..i {
            sum += l[[i, k]] * l[[i, k]];
        }
        let radicand = a[[i, i]] - sum;
        if radicand <= T::zero() {
            return Err(SolverError::NotPositiveDefinite { step: i });
        }
        l[[i, i]] = radicand
            .sqrt()
            .ok_or(SolverError::NotPositiveDefinite { step: i })?;

        let mut record = StepRecord::new(StepPhase::Factorization, i);
        if sink.wants_snapshots() {
            record.matrix_snapshot = Some(l.clone());
        }
        sink.record(&record);
    }

    Ok(CholeskyFactor { l })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use num_rational::Rational64;

    #[test]
    fn test_cholesky_factor_and_solve() {
        let a = array![[4.0_f64, 2.0, -2.0], [2.0, 2.0, -3.0], [-2.0, -3.0, 14.0]];
        let b = array![10.0_f64, 5.0, 4.0];

        let chol = cholesky(&a).expect("Cholesky should succeed");
        let expected_l = array![[2.0_f64, 0.0, 0.0], [1.0, 1.0, 0.0], [-1.0, -2.0, 3.0]];
        for ((i, j), v) in chol.l.indexed_iter() {
            assert_relative_eq!(*v, expected_l[[i, j]], epsilon = 1e-12);
        }

        let x = chol.solve(&b).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cholesky_exact_rational() {
        let r = |n: i64| Rational64::from_integer(n);
        let a = array![[r(4), r(2), r(-2)], [r(2), r(2), r(-3)], [r(-2), r(-3), r(14)]];
        let chol = cholesky(&a).unwrap();
        assert_eq!(chol.reconstruct(), a);
        assert_eq!(chol.solve(&array![r(10), r(5), r(4)]).unwrap(), array![r(2), r(2), r(1)]);
    }

    #[test]
    fn test_not_positive_definite() {
        let a = array![[1.0_f64, 2.0], [2.0, 1.0]];
        assert_eq!(
            cholesky(&a).unwrap_err(),
            SolverError::NotPositiveDefinite { step: 1 }
        );

        let negative = array![[-4.0_f64, 0.0], [0.0, 1.0]];
        assert_eq!(
            cholesky(&negative).unwrap_err(),
            SolverError::NotPositiveDefinite { step: 0 }
        );
    }

    #[test]
    fn test_badly_scaled_diagonal() {
        let a = array![[1e20_f64, 0.0], [0.0, 1.0]];
        let chol = cholesky(&a).expect("positive diagonal is positive definite");
        assert_relative_eq!(chol.l[[0, 0]], 1e10);
        assert_eq!(chol.l[[1, 1]], 1.0);
        assert_eq!(chol.solve(&array![1e20_f64, 1.0]).unwrap(), array![1.0, 1.0]);
    }

    #[test]
    fn test_not_symmetric() {
        let a = array![[4.0_f64, 1.0], [2.0, 3.0]];
        assert_eq!(
            cholesky(&a).unwrap_err(),
            SolverError::NotSymmetric { row: 0, col: 1 }
        );
    }
}
