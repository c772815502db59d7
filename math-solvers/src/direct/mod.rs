//! Direct solvers for dense and banded linear systems
//!
//! This module provides direct (non-iterative) solvers:
//! - [`gauss_solve`]: Gaussian elimination without, with partial or with full pivoting
//! - [`doolittle`] / [`crout`]: compact LU factorizations, no pivoting
//! - [`cholesky`]: square-root method for symmetric positive definite systems
//! - [`solve_tridiagonal`]: chase algorithm for tridiagonal systems
//! - [`refine`]: iterative refinement of an approximate solution
//!
//! [`solve_direct`] and [`factorize`] dispatch on a method selector.

mod cholesky;
mod gauss;
mod lu;
pub mod pivot;
mod refine;
pub mod triangular;
mod tridiagonal;

pub use cholesky::{CholeskyFactor, cholesky, cholesky_with_diagnostics};
pub use gauss::{Pivoting, gauss_solve, gauss_solve_with_diagnostics, inverse};
pub use lu::{
    LuFactors, LuKind, crout, crout_with_diagnostics, doolittle, doolittle_with_diagnostics,
};
pub use refine::{RefinementResult, refine, refine_with_diagnostics};
pub use tridiagonal::{TridiagonalSystem, solve_tridiagonal};

use crate::dense::check_system;
use crate::diagnostics::{DiagnosticsSink, NoopSink, StepPhase, StepRecord};
use crate::error::Result;
use crate::traits::Scalar;
use ndarray::{Array1, Array2};

/// Direct method selector
///
/// Pivoting only exists for Gaussian elimination; the factorizations never pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DirectMethod {
    /// Gaussian elimination with the given pivoting policy
    Gauss(Pivoting),
    /// Doolittle LU
    Doolittle,
    /// Crout LU
    Crout,
    /// Cholesky (symmetric positive definite only)
    Cholesky,
}

impl Default for DirectMethod {
    fn default() -> Self {
        DirectMethod::Gauss(Pivoting::Partial)
    }
}

/// Factorization selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FactorMethod {
    /// `A = L U`, unit lower `L`
    Doolittle,
    /// `A = L U`, unit upper `U`
    Crout,
    /// `A = L Lᵗ`
    Cholesky,
}

/// A reusable factorization of a square matrix
#[derive(Debug, Clone)]
pub enum Factorization<T: Scalar> {
    /// Doolittle or Crout factors
    Lu(LuFactors<T>),
    /// Cholesky factor
    Cholesky(CholeskyFactor<T>),
}

impl<T: Scalar> Factorization<T> {
    /// Matrix dimension
    pub fn n(&self) -> usize {
        match self {
            Factorization::Lu(lu) => lu.n(),
            Factorization::Cholesky(chol) => chol.n(),
        }
    }

    /// Solve Ax = b with the stored factors
    pub fn solve(&self, b: &Array1<T>) -> Result<Array1<T>> {
        match self {
            Factorization::Lu(lu) => lu.solve(b),
            Factorization::Cholesky(chol) => chol.solve(b),
        }
    }

    /// Product of the factors
    pub fn reconstruct(&self) -> Array2<T> {
        match self {
            Factorization::Lu(lu) => lu.reconstruct(),
            Factorization::Cholesky(chol) => chol.reconstruct(),
        }
    }
}

/// Factorize `a` with the chosen method
pub fn factorize<T: Scalar>(a: &Array2<T>, method: FactorMethod) -> Result<Factorization<T>> {
    factorize_with_diagnostics(a, method, &mut NoopSink)
}

/// Factorize `a`, reporting every factorization step to `sink`
pub fn factorize_with_diagnostics<T, S>(
    a: &Array2<T>,
    method: FactorMethod,
    sink: &mut S,
) -> Result<Factorization<T>>
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    Ok(match method {
        FactorMethod::Doolittle => Factorization::Lu(doolittle_with_diagnostics(a, sink)?),
        FactorMethod::Crout => Factorization::Lu(crout_with_diagnostics(a, sink)?),
        FactorMethod::Cholesky => Factorization::Cholesky(cholesky_with_diagnostics(a, sink)?),
    })
}

/// Solve Ax = b with a direct method.
///
/// # Example
///
/// ```
/// use math_dense_solvers::{DirectMethod, Pivoting, solve_direct};
/// use ndarray::array;
///
/// let a = array![[2.0_f64, 1.0], [1.0, 3.0]];
/// let b = array![3.0_f64, 5.0];
/// let x = solve_direct(&a, &b, DirectMethod::Gauss(Pivoting::Partial)).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve_direct<T: Scalar>(
    a: &Array2<T>,
    b: &Array1<T>,
    method: DirectMethod,
) -> Result<Array1<T>> {
    solve_direct_with_diagnostics(a, b, method, &mut NoopSink)
}

/// Solve Ax = b with a direct method, reporting every step to `sink`
pub fn solve_direct_with_diagnostics<T, S>(
    a: &Array2<T>,
    b: &Array1<T>,
    method: DirectMethod,
    sink: &mut S,
) -> Result<Array1<T>>
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    let factor_method = match method {
        DirectMethod::Gauss(pivoting) => {
            return gauss_solve_with_diagnostics(a, b, pivoting, sink);
        }
        DirectMethod::Doolittle => FactorMethod::Doolittle,
        DirectMethod::Crout => FactorMethod::Crout,
        DirectMethod::Cholesky => FactorMethod::Cholesky,
    };

    let n = check_system(a, b)?;
    let factors = factorize_with_diagnostics(a, factor_method, sink)?;
    let x = factors.solve(b)?;

    let mut record = StepRecord::new(StepPhase::BackSubstitution, n);
    if sink.wants_snapshots() {
        record.iterate = Some(x.clone());
    }
    sink.record(&record);

    Ok(x)
}
