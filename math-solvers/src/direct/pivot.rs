//! Pivot selection for Gaussian elimination
//!
//! Both selectors are pure reads over the active sub-matrix (rows and columns at or
//! after the current step). The caller performs the swaps. Ties are resolved in favour
//! of the first element met in row-major scan order, so the choice is reproducible.

use crate::diagnostics::PivotChoice;
use crate::error::{Result, SolverError};
use crate::traits::Scalar;
use ndarray::Array2;

/// Row with the largest magnitude in column `step`, rows `step..`.
///
/// Returns [`SolverError::SingularMatrix`] when every candidate is at or below `tol`.
pub fn select_partial_pivot<T: Scalar>(m: &Array2<T>, step: usize, tol: T) -> Result<usize> {
    let nrows = m.nrows();
    debug_assert!(step < nrows, "pivot search region must be non-empty");

    let mut max_val = m[[step, step]].norm();
    let mut max_row = step;
    for i in (step + 1)..nrows {
        let val = m[[i, step]].norm();
        if val > max_val {
            max_val = val;
            max_row = i;
        }
    }

    if max_val <= tol {
        return Err(SolverError::SingularMatrix { step });
    }
    Ok(max_row)
}

/// Largest magnitude in the block `rows step.., cols step..ncols`.
///
/// `ncols` bounds the coefficient columns so the right-hand side of an augmented
/// matrix is never chosen. `thresholds[j]` is the zero-pivot threshold of column `j`;
/// an entry at or below the threshold of its own column is never a candidate.
/// Returns [`SolverError::SingularMatrix`] when no candidate is left.
pub fn select_full_pivot<T: Scalar>(
    m: &Array2<T>,
    step: usize,
    ncols: usize,
    thresholds: &[T],
) -> Result<PivotChoice> {
    let nrows = m.nrows();
    debug_assert!(step < nrows && step < ncols, "pivot search region must be non-empty");
    debug_assert!(thresholds.len() >= ncols);

    let mut best: Option<(PivotChoice, T)> = None;
    for i in step..nrows {
        for j in step..ncols {
            let val = m[[i, j]].norm();
            if val <= thresholds[j] {
                continue;
            }
            if best.as_ref().is_none_or(|(_, max_val)| val > *max_val) {
                best = Some((PivotChoice { row: i, col: j }, val));
            }
        }
    }

    best.map(|(choice, _)| choice)
        .ok_or(SolverError::SingularMatrix { step })
}
