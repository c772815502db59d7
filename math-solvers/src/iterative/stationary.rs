//! Stationary iterations: Jacobi, Gauss–Seidel and SOR
//!
//! Each sweep updates the unknowns in index order `0..n`:
//!
//! ```text
//! sigma_i  = sum_{j != i} a_ij * x_j
//! x_i     <- (1 - omega) * x_i + omega * (b_i - sigma_i) / a_ii
//! ```
//!
//! Jacobi reads every `x_j` from the previous iterate. Gauss–Seidel and SOR read the
//! values already updated in the current sweep for `j < i` and the previous iterate
//! for `j > i`. Gauss–Seidel is SOR with `omega = 1` and shares its code path, so both
//! produce bit-identical iterates.
//!
//! The iterator is a small state machine:
//!
//! ```text
//! new (Init) -> sweep* -> Converged | Diverged | BudgetExhausted
//! ```
//!
//! Running out of iterations is a normal outcome ([`IterationStatus::BudgetExhausted`])
//! carrying the last iterate and its residual, not an error.

use crate::dense::{check_system, residual};
use crate::diagnostics::{DiagnosticsSink, NoopSink, StepPhase, StepRecord};
use crate::error::{Result, SolverError};
use crate::iterative::split::check_diagonal;
use crate::traits::{Scalar, max_norm};
use ndarray::{Array1, Array2};

/// Stationary scheme
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Scheme {
    /// Simultaneous displacements
    Jacobi,
    /// Successive displacements
    GaussSeidel,
    /// Successive over-relaxation, `0 < omega < 2`
    Sor {
        /// Relaxation factor
        omega: f64,
    },
}

impl Scheme {
    /// Relaxation factor of the scheme (1 for Jacobi and Gauss–Seidel)
    pub fn omega(&self) -> f64 {
        match self {
            Scheme::Jacobi | Scheme::GaussSeidel => 1.0,
            Scheme::Sor { omega } => *omega,
        }
    }

    /// Short display name
    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Jacobi => "Jacobi",
            Scheme::GaussSeidel => "Gauss-Seidel",
            Scheme::Sor { .. } => "SOR",
        }
    }

    /// Validate the relaxation factor and convert it to the scalar domain.
    pub(crate) fn relaxation<T: Scalar>(&self) -> Result<T> {
        let omega = self.omega();
        if omega.is_nan() || omega <= 0.0 || omega >= 2.0 {
            return Err(SolverError::InvalidRelaxation { omega });
        }
        T::from_f64(omega).ok_or(SolverError::InvalidRelaxation { omega })
    }
}

/// Quantity compared against the tolerance after every sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopCriterion {
    /// `‖x^(k+1) - x^(k)‖∞`
    #[default]
    UpdateNorm,
    /// `‖b - A x^(k+1)‖∞`
    ResidualNorm,
}

/// Stationary iteration configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterativeConfig<T> {
    /// Maximum number of sweeps
    pub max_iterations: usize,
    /// Convergence threshold for the stopping metric
    pub tolerance: T,
    /// Stopping metric
    pub stop_criterion: StopCriterion,
    /// Print progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for IterativeConfig<f64> {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
            stop_criterion: StopCriterion::UpdateNorm,
            print_interval: 0,
        }
    }
}

/// How an iteration ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IterationStatus {
    /// Stopping metric at or below the tolerance
    Converged,
    /// Stopping metric or iterate is no longer finite
    Diverged,
    /// `max_iterations` sweeps without convergence
    BudgetExhausted,
}

/// Current iterate and bookkeeping
#[derive(Debug, Clone)]
pub struct IterationState<T: Scalar> {
    /// Current estimate `x^(k)`
    pub x: Array1<T>,
    /// Completed sweeps
    pub k: usize,
    /// Stopping metric of the last sweep
    pub metric: Option<T>,
}

/// Stationary iteration result
#[derive(Debug, Clone)]
pub struct IterativeSolution<T: Scalar> {
    /// Last iterate
    pub x: Array1<T>,
    /// Number of sweeps performed
    pub iterations: usize,
    /// `‖b - A x‖∞` of the last iterate
    pub residual: T,
    /// Final state
    pub status: IterationStatus,
    /// Whether convergence was achieved
    pub converged: bool,
}

/// Jacobi / Gauss–Seidel / SOR state machine over a borrowed system.
#[derive(Debug)]
pub struct StationaryIterator<'a, T: Scalar> {
    a: &'a Array2<T>,
    b: &'a Array1<T>,
    scheme: Scheme,
    omega: T,
    config: IterativeConfig<T>,
    state: IterationState<T>,
}

impl<'a, T: Scalar> StationaryIterator<'a, T> {
    /// Validate the system and set up `x^(0)` (zero vector when `x0` is `None`).
    ///
    /// The diagonal is checked here once; sweeps never re-check it.
    pub fn new(
        a: &'a Array2<T>,
        b: &'a Array1<T>,
        scheme: Scheme,
        x0: Option<&Array1<T>>,
        config: IterativeConfig<T>,
    ) -> Result<Self> {
        let n = check_system(a, b)?;
        let omega = scheme.relaxation::<T>()?;
        if config.tolerance < T::zero() || !config.tolerance.is_finite() {
            return Err(SolverError::InvalidTolerance);
        }
        check_diagonal(a)?;

        let x = match x0 {
            Some(x0) if x0.len() != n => {
                return Err(SolverError::DimensionMismatch {
                    what: "initial guess",
                    expected: n,
                    got: x0.len(),
                });
            }
            Some(x0) => x0.clone(),
            None => Array1::zeros(n),
        };

        Ok(Self {
            a,
            b,
            scheme,
            omega,
            config,
            state: IterationState {
                x,
                k: 0,
                metric: None,
            },
        })
    }

    /// Current state
    pub fn state(&self) -> &IterationState<T> {
        &self.state
    }

    /// Scheme being run
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Perform one sweep and return its stopping metric.
    pub fn sweep(&mut self) -> T {
        let x_old = self.state.x.clone();
        match self.scheme {
            Scheme::Jacobi => self.jacobi_sweep(&x_old),
            Scheme::GaussSeidel | Scheme::Sor { .. } => self.relaxed_sweep(),
        }
        self.state.k += 1;

        let metric = match self.config.stop_criterion {
            StopCriterion::UpdateNorm => max_norm((&self.state.x - &x_old).iter()),
            StopCriterion::ResidualNorm => max_norm(residual(self.a, &self.state.x, self.b).iter()),
        };
        self.state.metric = Some(metric);
        metric
    }

    /// Sweep until convergence, divergence or budget exhaustion.
    pub fn run(self) -> IterativeSolution<T> {
        self.run_with_diagnostics(&mut NoopSink)
    }

    /// Like [`run`](Self::run), reporting one [`StepPhase::Sweep`] record per sweep.
    pub fn run_with_diagnostics<S>(mut self, sink: &mut S) -> IterativeSolution<T>
    where
        S: DiagnosticsSink<T> + ?Sized,
    {
        let status = loop {
            if self.state.k >= self.config.max_iterations {
                break IterationStatus::BudgetExhausted;
            }

            let metric = self.sweep();
            let k = self.state.k;

            let mut record = StepRecord::new(StepPhase::Sweep, k).with_residual(metric);
            if sink.wants_snapshots() {
                record.iterate = Some(self.state.x.clone());
            }
            sink.record(&record);

            if self.config.print_interval > 0 && k % self.config.print_interval == 0 {
                log::info!(
                    "{} iteration {}: metric = {:.6e}",
                    self.scheme.name(),
                    k,
                    metric.to_f64()
                );
            }

            if !metric.is_finite() || self.state.x.iter().any(|v| !v.is_finite()) {
                log::warn!("{} diverged after {} iterations", self.scheme.name(), k);
                break IterationStatus::Diverged;
            }
            if metric <= self.config.tolerance {
                break IterationStatus::Converged;
            }
        };

        let residual = max_norm(residual(self.a, &self.state.x, self.b).iter());
        IterativeSolution {
            x: self.state.x,
            iterations: self.state.k,
            residual,
            status,
            converged: status == IterationStatus::Converged,
        }
    }

    fn jacobi_sweep(&mut self, x_old: &Array1<T>) {
        let n = x_old.len();
        for i in 0..n {
            let sigma = off_diagonal_sum(self.a, x_old, i);
            self.state.x[i] = (self.b[i] - sigma) / self.a[[i, i]];
        }
    }

    /// In place: `x[j]` for `j < i` already holds this sweep's value.
    fn relaxed_sweep(&mut self) {
        let n = self.state.x.len();
        let one = T::one();
        for i in 0..n {
            let sigma = off_diagonal_sum(self.a, &self.state.x, i);
            let gauss_seidel = (self.b[i] - sigma) / self.a[[i, i]];
            self.state.x[i] = if self.omega == one {
                gauss_seidel
            } else {
                (one - self.omega) * self.state.x[i] + self.omega * gauss_seidel
            };
        }
    }
}

fn off_diagonal_sum<T: Scalar>(a: &Array2<T>, x: &Array1<T>, i: usize) -> T {
    let mut sigma = T::zero();
    for (j, &xj) in x.iter().enumerate() {
        if j != i {
            sigma += a[[i, j]] * xj;
        }
    }
    sigma
}

/// Run a stationary iteration from `x0` (zero vector when `None`).
///
/// # Example
///
/// ```
/// use math_dense_solvers::{IterativeConfig, Scheme, iterate};
/// use ndarray::array;
///
/// let a = array![[4.0_f64, -1.0], [-1.0, 4.0]];
/// let b = array![2.0_f64, 2.0];
/// let solution = iterate(&a, &b, Scheme::GaussSeidel, None, IterativeConfig::default()).unwrap();
/// assert!(solution.converged);
/// ```
pub fn iterate<T: Scalar>(
    a: &Array2<T>,
    b: &Array1<T>,
    scheme: Scheme,
    x0: Option<&Array1<T>>,
    config: IterativeConfig<T>,
) -> Result<IterativeSolution<T>> {
    Ok(StationaryIterator::new(a, b, scheme, x0, config)?.run())
}

/// [`iterate`] with a diagnostics sink
pub fn iterate_with_diagnostics<T, S>(
    a: &Array2<T>,
    b: &Array1<T>,
    scheme: Scheme,
    x0: Option<&Array1<T>>,
    config: IterativeConfig<T>,
    sink: &mut S,
) -> Result<IterativeSolution<T>>
where
    T: Scalar,
    S: DiagnosticsSink<T> + ?Sized,
{
    Ok(StationaryIterator::new(a, b, scheme, x0, config)?.run_with_diagnostics(sink))
}
