//! Stationary iterative solvers for linear systems
//!
//! This module provides the classical splitting methods:
//! - Jacobi
//! - Gauss–Seidel
//! - SOR (successive over-relaxation)
//!
//! Use [`iterate`] for a complete run or [`StationaryIterator`] to drive the sweeps
//! yourself. Whether a scheme converges can be decided beforehand with
//! [`analyze_convergence`](crate::analysis::analyze_convergence).

mod split;
mod stationary;

pub use split::{SplitMatrices, check_diagonal};
pub use stationary::{
    IterationState, IterationStatus, IterativeConfig, IterativeSolution, Scheme,
    StationaryIterator, StopCriterion, iterate, iterate_with_diagnostics,
};
