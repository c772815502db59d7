//! Gaussian elimination
//!
//! Forward elimination on the augmented system `[A | b]` followed by back
//! substitution. Three pivoting policies are supported:
//!
//! - [`Pivoting::None`]: the diagonal element is used as-is, a vanishing one is a
//!   [`SolverError::ZeroPivot`]
//! - [`Pivoting::Partial`]: largest magnitude in the current column (row swaps)
//! - [`Pivoting::Full`]: largest magnitude in the remaining block (row and column
//!   swaps, the solution is un-permuted before it is returned)
//!
//! Also provides the Gauss–Jordan [`inverse`] used by the condition number.

use crate::dense::{AugmentedSystem, check_square, column_thresholds};
use crate::diagnostics::{DiagnosticsSink, NoopSink, PivotChoice, StepPhase, StepRecord};
use crate::direct::pivot::{select_full_pivot, select_partial_pivot};
use crate::error::{Result, SolverError};
use crate::traits::Scalar;
use ndarray::{Array1, Array2, s};

/// Pivoting policy for Gaussian elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Pivoting {
    /// Use the diagonal element of each step
    None,
    /// Row interchanges only (column pivoting)
    #[default]
    Partial,
    /// Row and column interchanges
    Full,
}

/// Solve Ax = b by Gaussian elimination.
pub fn gauss_solve<T: Scalar>(
    a: &Array2<T>,
    b: &Array1<T>,
    pivoting: Pivoting,
) -> Result<Array1<T>> {
    gauss_solve_with_diagnostics(a, b, pivoting, &mut NoopSink)
}

/// Solve Ax = b by Gaussian elimination, reporting every step to `sink`.
///
/// One [`StepPhase::Elimination`] record is emitted per pivot column and a final
/// [`StepPhase::BackSubstitution`] record once the solution is known.
pub fn gauss_solve_with_diagnostics<T, S>(
    a: &Array2<T>,
    b: &Array1<T>,
    pivoting: Pivoting,
    sink: &mut S,
) -> Result<Array1<T>>
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    let mut aug = AugmentedSystem::new(a, b)?;
    let n = aug.order();

    for i in 0..n {
        let choice = match pivoting {
            Pivoting::None => {
                if aug.matrix[[i, i]].is_zero_approx(aug.thresholds[i]) {
                    return Err(SolverError::ZeroPivot { step: i });
                }
                PivotChoice { row: i, col: i }
            }
            Pivoting::Partial => PivotChoice {
                row: select_partial_pivot(&aug.matrix, i, aug.thresholds[i])?,
                col: i,
            },
            Pivoting::Full => select_full_pivot(&aug.matrix, i, n, &aug.thresholds)?,
        };

        aug.swap_rows(i, choice.row);
        aug.swap_columns(i, choice.col);
        eliminate_below(&mut aug.matrix, i);

        let mut record = StepRecord::new(StepPhase::Elimination, i).with_pivot(choice);
        if sink.wants_snapshots() {
            record.matrix_snapshot = Some(aug.matrix.clone());
        }
        sink.record(&record);
    }

    let permuted = back_substitute_augmented(&aug.matrix, &aug.thresholds)?;

    // x[columns[k]] = permuted[k]
    let mut x = Array1::zeros(n);
    for (k, &original) in aug.columns.iter().enumerate() {
        x[original] = permuted[k];
    }

    let mut record = StepRecord::new(StepPhase::BackSubstitution, n);
    if sink.wants_snapshots() {
        record.iterate = Some(x.clone());
    }
    sink.record(&record);

    Ok(x)
}

/// Subtract multiples of row `i` from every row below it, zeroing column `i`.
fn eliminate_below<T: Scalar>(m: &mut Array2<T>, i: usize) {
    let (nrows, ncols) = m.dim();
    let pivot = m[[i, i]];
    for j in (i + 1)..nrows {
        let factor = m[[j, i]] / pivot;
        if factor.is_zero() {
            continue;
        }
        m[[j, i]] = T::zero();
        for k in (i + 1)..ncols {
            let update = factor * m[[i, k]];
            m[[j, k]] -= update;
        }
    }
}

/// Back substitution on an upper triangular augmented matrix `[U | y]`.
fn back_substitute_augmented<T: Scalar>(m: &Array2<T>, thresholds: &[T]) -> Result<Array1<T>> {
    let n = m.nrows();
    let mut x = m.column(n).to_owned();
    for i in (0..n).rev() {
        for j in (i + 1)..n {
            let u_ij = m[[i, j]];
            x[i] = x[i] - u_ij * x[j];
        }
        let u_ii = m[[i, i]];
        if u_ii.is_zero_approx(thresholds[i]) {
            return Err(SolverError::SingularMatrix { step: i });
        }
        x[i] /= u_ii;
    }
    Ok(x)
}

/// Inverse by Gauss–Jordan elimination with partial pivoting.
pub fn inverse<T: Scalar>(a: &Array2<T>) -> Result<Array2<T>> {
    let n = check_square(a)?;
    let thresholds = column_thresholds(a);

    let mut work = Array2::zeros((n, 2 * n));
    work.slice_mut(s![.., ..n]).assign(a);
    for i in 0..n {
        work[[i, n + i]] = T::one();
    }

    for i in 0..n {
        let row = select_partial_pivot(&work, i, thresholds[i])?;
        if row != i {
            for k in 0..(2 * n) {
                work.swap([i, k], [row, k]);
            }
        }

        let pivot_inv = work[[i, i]].inv();
        for k in 0..(2 * n) {
            work[[i, k]] *= pivot_inv;
        }

        for j in 0..n {
            if j == i {
                continue;
            }
            let factor = work[[j, i]];
            if factor.is_zero() {
                continue;
            }
            for k in 0..(2 * n) {
                let update = factor * work[[i, k]];
                work[[j, k]] -= update;
            }
        }
    }

    Ok(work.slice(s![.., n..]).to_owned())
}
