//! Dense and banded linear-system solvers
//!
//! This crate provides direct and stationary iterative solvers for small to medium
//! dense systems `A x = b`, together with the tools to reason about them.
//!
//! # Features
//!
//! - **Direct Solvers**: Gaussian elimination (no, partial or full pivoting), Doolittle
//!   and Crout LU, Cholesky, tridiagonal chase, iterative refinement
//! - **Stationary Iterations**: Jacobi, Gauss–Seidel, SOR
//! - **Convergence Analysis**: iteration matrix and spectral radius, without iterating
//! - **Norms**: vector and matrix norms, inverse, condition number
//! - **Diagnostics**: every elimination step and sweep can be observed through a
//!   [`DiagnosticsSink`]
//! - **Generic Scalar Types**: works with f64, f32 and exact `Rational64`
//!
//! # Example
//!
//! ```
//! use math_dense_solvers::{
//!     DirectMethod, IterativeConfig, Pivoting, Scheme, analyze_convergence, iterate,
//!     solve_direct,
//! };
//! use ndarray::array;
//!
//! let a = array![[4.0_f64, -1.0], [-1.0, 4.0]];
//! let b = array![2.0_f64, 2.0];
//!
//! let x = solve_direct(&a, &b, DirectMethod::Gauss(Pivoting::Partial))?;
//!
//! let report = analyze_convergence(&a, Scheme::GaussSeidel)?;
//! assert!(report.converges);
//!
//! let solution = iterate(&a, &b, Scheme::GaussSeidel, None, IterativeConfig::default())?;
//! assert!(solution.converged);
//! assert!((solution.x[0] - x[0]).abs() < 1e-5);
//! # Ok::<(), math_dense_solvers::SolverError>(())
//! ```

pub mod analysis;
pub mod dense;
pub mod diagnostics;
pub mod direct;
pub mod error;
pub mod iterative;
pub mod norms;
pub mod parallel;
pub mod traits;

pub use error::{Result, SolverError};
pub use traits::Scalar;

// Re-export direct solvers
pub use direct::{
    CholeskyFactor, DirectMethod, FactorMethod, Factorization, LuFactors, LuKind, Pivoting,
    RefinementResult, TridiagonalSystem, cholesky, crout, doolittle, factorize,
    factorize_with_diagnostics, gauss_solve, inverse, refine, solve_direct,
    solve_direct_with_diagnostics, solve_tridiagonal,
};

// Re-export iterative solvers
pub use iterative::{
    IterationState, IterationStatus, IterativeConfig, IterativeSolution, Scheme,
    SplitMatrices, StationaryIterator, StopCriterion, iterate, iterate_with_diagnostics,
};

// Re-export analysis and norms
pub use analysis::{ConvergenceReport, affine_form, analyze_convergence, iteration_matrix};
pub use norms::{NormKind, condition_number, matrix_norm, residual_norm, vector_norm};

pub use diagnostics::{
    DiagnosticsSink, LogSink, NoopSink, PivotChoice, RecordingSink, StepPhase, StepRecord,
};
pub use parallel::solve_direct_batch;
