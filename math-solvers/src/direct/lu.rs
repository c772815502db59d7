//! LU factorizations without pivoting
//!
//! Computes `A = L * U` by the compact Doolittle (unit lower `L`, row by row) or Crout
//! (unit upper `U`, column by column) schemes. No row interchange is ever performed:
//! every leading principal minor must be non-singular, otherwise the factorization
//! stops with [`SolverError::ZeroPivot`]. Use Gaussian elimination with pivoting when
//! that cannot be guaranteed.

use crate::dense::{check_square, column_thresholds, matmul};
use crate::diagnostics::{DiagnosticsSink, NoopSink, StepPhase, StepRecord};
use crate::direct::triangular::{back_substitution, forward_substitution};
use crate::error::{Result, SolverError};
use crate::traits::Scalar;
use ndarray::{Array1, Array2};
use std::cmp::Ordering;

/// Which triangle carries the unit diagonal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LuKind {
    /// `L` unit lower triangular
    Doolittle,
    /// `U` unit upper triangular
    Crout,
}

/// LU factorization result
#[derive(Debug, Clone)]
pub struct LuFactors<T: Scalar> {
    /// Lower triangular factor
    pub l: Array2<T>,
    /// Upper triangular factor
    pub u: Array2<T>,
    /// Factorization scheme
    pub kind: LuKind,
}

impl<T: Scalar> LuFactors<T> {
    /// Matrix dimension
    pub fn n(&self) -> usize {
        self.l.nrows()
    }

    /// Solve Ax = b using the pre-computed factors: L y = b, then U x = y.
    ///
    /// The pivots were checked against their column scale while factoring, so the
    /// triangular solves only guard against exact zeros.
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>> {
        if b.len() != self.n() {
            return Err(SolverError::DimensionMismatch {
                what: "right-hand side",
                expected: self.n(),
                got: b.len(),
            });
        }

        let unit_lower = self.kind == LuKind::Doolittle;
        let y = forward_substitution(&self.l, b, unit_lower, T::zero())?;
        back_substitution(&self.u, &y, !unit_lower, T::zero())
    }

    /// L * U, equal to the factorized matrix up to roundoff
    pub fn reconstruct(&self) -> Array2<T> {
        matmul(&self.l, &self.u)
    }
}

/// Doolittle factorization
pub fn doolittle<T: Scalar>(a: &Array2<T>) -> Result<LuFactors<T>> {
    doolittle_with_diagnostics(a, &mut NoopSink)
}

/// Doolittle factorization, one [`StepPhase::Factorization`] record per row.
///
/// For each `i`: `U[i,k] = A[i,k] - sum_{m<i} L[i,m] U[m,k]` for `k >= i`, then
/// `L[k,i] = (A[k,i] - sum_{m<i} L[k,m] U[m,i]) / U[i,i]` for `k > i`.
pub fn doolittle_with_diagnostics<T, S>(a: &Array2<T>, sink: &mut S) -> Result<LuFactors<T>>
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    let n = check_square(a)?;
    let thresholds = column_thresholds(a);
    let mut l = Array2::<T>::eye(n);
    let mut u = Array2::<T>::zeros((n, n));

    for i in 0..n {
        for k in i..n {
            let mut sum = T::zero();
            for m in 0..i {
                sum += l[[i, m]] * u[[m, k]];
            }
            u[[i, k]] = a[[i, k]] - sum;
        }

        let pivot = u[[i, i]];
        if pivot.is_zero_approx(thresholds[i]) {
            return Err(SolverError::ZeroPivot { step: i });
        }

        for k in (i + 1)..n {
            let mut sum = T::zero();
            for m in 0..i {
                sum += l[[k, m]] * u[[m, i]];
            }
            l[[k, i]] = (a[[k, i]] - sum) / pivot;
        }

        report_step(sink, LuKind::Doolittle, i, &l, &u);
    }

    Ok(LuFactors {
        l,
        u,
        kind: LuKind::Doolittle,
    })
}

/// Crout factorization
pub fn crout<T: Scalar>(a: &Array2<T>) -> Result<LuFactors<T>> {
    crout_with_diagnostics(a, &mut NoopSink)
}

/// Crout factorization, one [`StepPhase::Factorization`] record per column.
///
/// For each `j`: `L[i,j] = A[i,j] - sum_{k<j} L[i,k] U[k,j]` for `i >= j`, then
/// `U[j,c] = (A[j,c] - sum_{k<j} L[j,k] U[k,c]) / L[j,j]` for `c > j`.
pub fn crout_with_diagnostics<T, S>(a: &Array2<T>, sink: &mut S) -> Result<LuFactors<T>>
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    let n = check_square(a)?;
    let thresholds = column_thresholds(a);
    let mut l = Array2::<T>::zeros((n, n));
    let mut u = Array2::<T>::eye(n);

    for j in 0..n {
        for i in j..n {
            let mut sum = T::zero();
            for k in 0..j {
                sum += l[[i, k]] * u[[k, j]];
            }
            l[[i, j]] = a[[i, j]] - sum;
        }

        let pivot = l[[j, j]];
        if pivot.is_zero_approx(thresholds[j]) {
            return Err(SolverError::ZeroPivot { step: j });
        }

        for c in (j + 1)..n {
            let mut sum = T::zero();
            for k in 0..j {
                sum += l[[j, k]] * u[[k, c]];
            }
            u[[j, c]] = (a[[j, c]] - sum) / pivot;
        }

        report_step(sink, LuKind::Crout, j, &l, &u);
    }

    Ok(LuFactors {
        l,
        u,
        kind: LuKind::Crout,
    })
}

/// Snapshot packs both factors into one matrix; the unit diagonal is not stored.
fn report_step<T, S>(sink: &mut S, kind: LuKind, step: usize, l: &Array2<T>, u: &Array2<T>)
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    let mut record = StepRecord::new(StepPhase::Factorization, step);
    if sink.wants_snapshots() {
        let packed = Array2::from_shape_fn(l.dim(), |(i, j)| match i.cmp(&j) {
            Ordering::Greater => l[[i, j]],
            Ordering::Less => u[[i, j]],
            Ordering::Equal if kind == LuKind::Doolittle => u[[i, j]],
            Ordering::Equal => l[[i, j]],
        });
        record.matrix_snapshot = Some(packed);
    }
    sink.record(&record);
}
