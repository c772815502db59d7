//! Iterative refinement
//!
//! Improves an approximate solution `x` of `A x = b` by repeatedly solving for the
//! correction `d` in `A d = r` with `r = b - A x`, then `x <- x + d`. The factorizing
//! methods factor `A` once and reuse the factors for every correction.

use crate::dense::{check_system, residual};
use crate::diagnostics::{DiagnosticsSink, NoopSink, StepPhase, StepRecord};
use crate::direct::{DirectMethod, FactorMethod, Factorization, Pivoting, factorize, gauss_solve};
use crate::error::{Result, SolverError};
use crate::traits::{Scalar, max_norm};
use ndarray::{Array1, Array2};

/// Refinement outcome
#[derive(Debug, Clone)]
pub struct RefinementResult<T: Scalar> {
    /// Refined solution
    pub x: Array1<T>,
    /// Corrections applied
    pub steps: usize,
    /// Max norm of the last correction (zero when no step was taken)
    pub correction: T,
}

/// Refine `x0` with at most `max_steps` corrections, stopping once `‖d‖∞ <= tol`.
pub fn refine<T: Scalar>(
    a: &Array2<T>,
    b: &Array1<T>,
    x0: &Array1<T>,
    method: DirectMethod,
    max_steps: usize,
    tol: T,
) -> Result<RefinementResult<T>> {
    refine_with_diagnostics(a, b, x0, method, max_steps, tol, &mut NoopSink)
}

/// Refinement reporting one [`StepPhase::Refinement`] record per correction.
#[allow(clippy::too_many_arguments)]
pub fn refine_with_diagnostics<T, S>(
    a: &Array2<T>,
    b: &Array1<T>,
    x0: &Array1<T>,
    method: DirectMethod,
    max_steps: usize,
    tol: T,
    sink: &mut S,
) -> Result<RefinementResult<T>>
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    let n = check_system(a, b)?;
    if x0.len() != n {
        return Err(SolverError::DimensionMismatch {
            what: "initial guess",
            expected: n,
            got: x0.len(),
        });
    }
    if tol < T::zero() || !tol.is_finite() {
        return Err(SolverError::InvalidTolerance);
    }

    let correction_solver = CorrectionSolver::new(a, method)?;
    let mut x = x0.clone();
    let mut correction = T::zero();
    let mut steps = 0;

    while steps < max_steps {
        let r = residual(a, &x, b);
        let d = correction_solver.solve(a, &r)?;
        x += &d;
        steps += 1;
        correction = max_norm(d.iter());

        let mut record = StepRecord::new(StepPhase::Refinement, steps).with_residual(correction);
        if sink.wants_snapshots() {
            record.iterate = Some(x.clone());
        }
        sink.record(&record);

        if correction <= tol {
            break;
        }
    }

    Ok(RefinementResult {
        x,
        steps,
        correction,
    })
}

enum CorrectionSolver<T: Scalar> {
    Gauss(Pivoting),
    Factored(Factorization<T>),
}

impl<T: Scalar> CorrectionSolver<T> {
    fn new(a: &Array2<T>, method: DirectMethod) -> Result<Self> {
        let factor_method = match method {
            DirectMethod::Gauss(pivoting) => return Ok(CorrectionSolver::Gauss(pivoting)),
            DirectMethod::Doolittle => FactorMethod::Doolittle,
            DirectMethod::Crout => FactorMethod::Crout,
            DirectMethod::Cholesky => FactorMethod::Cholesky,
        };
        Ok(CorrectionSolver::Factored(factorize(a, factor_method)?))
    }

    fn solve(&self, a: &Array2<T>, r: &Array1<T>) -> Result<Array1<T>> {
        match self {
            CorrectionSolver::Gauss(pivoting) => gauss_solve(a, r, *pivoting),
            CorrectionSolver::Factored(f) => f.solve(r),
        }
    }
}
