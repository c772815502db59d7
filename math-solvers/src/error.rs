//! Error types for the dense solvers.
//!
//! Every variant is fatal to the call that produced it: the solvers never retry and
//! never fall back from one method to another. Running out of iterations in a
//! stationary method is *not* an error, see
//! [`IterationStatus::BudgetExhausted`](crate::iterative::IterationStatus).

use thiserror::Error;

/// Errors that can occur while factorizing or solving a linear system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// No usable pivot was found: the system has no unique solution.
    #[error("matrix is singular: no pivot above threshold at elimination step {step}")]
    SingularMatrix {
        /// Elimination step at which every candidate vanished
        step: usize,
    },

    /// A structural zero pivot in a method that cannot pivot (no pivoting Gauss, LU,
    /// tridiagonal chase, stationary iterations).
    #[error("zero pivot at step {step}")]
    ZeroPivot {
        /// Row/column index of the vanishing pivot
        step: usize,
    },

    /// Cholesky met a non-positive value under the square root.
    #[error("matrix is not positive definite (step {step})")]
    NotPositiveDefinite {
        /// Diagonal index where the factorization broke down
        step: usize,
    },

    /// Cholesky input is not symmetric.
    #[error("matrix is not symmetric: a[{row}, {col}] != a[{col}, {row}]")]
    NotSymmetric {
        /// Row of the first offending entry
        row: usize,
        /// Column of the first offending entry
        col: usize,
    },

    /// The operation requires a square matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// An operand has the wrong length.
    #[error("{what} dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Which operand is malformed
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Zero-sized system.
    #[error("system is empty")]
    EmptySystem,

    /// SOR relaxation factor outside (0, 2), or not representable in the scalar domain.
    #[error("invalid relaxation factor {omega} (must be in (0, 2))")]
    InvalidRelaxation {
        /// The rejected factor
        omega: f64,
    },

    /// Negative (or NaN) tolerance.
    #[error("tolerance must be non-negative")]
    InvalidTolerance,

    /// Norm not defined for the given operand kind.
    #[error("{norm} norm is not supported for {operand}")]
    UnsupportedNorm {
        /// Requested norm
        norm: &'static str,
        /// "vectors" or "matrices"
        operand: &'static str,
    },

    /// The shifted QR iteration did not deflate.
    #[error("eigenvalue iteration did not converge after {iterations} iterations")]
    EigenNoConvergence {
        /// Iterations spent on the last active block (0 when reported by LAPACK)
        iterations: usize,
    },
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Returns `true` if the error means the matrix admits no (stable) elimination.
    ///
    /// This includes `SingularMatrix`, `ZeroPivot` and `NotPositiveDefinite`.
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            SolverError::SingularMatrix { .. }
                | SolverError::ZeroPivot { .. }
                | SolverError::NotPositiveDefinite { .. }
        )
    }

    /// Returns `true` if this is a shape error.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            SolverError::NotSquare { .. }
                | SolverError::DimensionMismatch { .. }
                | SolverError::EmptySystem
        )
    }

    /// Returns `true` if a caller-supplied parameter was rejected.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SolverError::InvalidRelaxation { .. }
                | SolverError::InvalidTolerance
                | SolverError::UnsupportedNorm { .. }
        )
    }
}
