//! Tridiagonal chase (Thomas algorithm)
//!
//! O(n) elimination for systems whose only non-zeros are the diagonal `a`, the
//! super-diagonal `b` and the sub-diagonal `c`:
//!
//! ```text
//! [ a0  b0                ] [x0]   [d0]
//! [ c0  a1  b1            ] [x1]   [d1]
//! [     c1  a2  b2        ] [x2] = [d2]
//! [         ..  ..  ..    ] [..]   [..]
//! [            c_n-2 a_n-1] [..]   [..]
//! ```
//!
//! No pivoting is possible without destroying the band, so any vanishing `alpha`
//! is a [`SolverError::ZeroPivot`].

use crate::diagnostics::{DiagnosticsSink, NoopSink, StepPhase, StepRecord};
use crate::error::{Result, SolverError};
use crate::traits::Scalar;
use ndarray::{Array1, Array2};

/// A tridiagonal system with its right-hand side.
#[derive(Debug, Clone)]
pub struct TridiagonalSystem<T: Scalar> {
    a: Array1<T>,
    b: Array1<T>,
    c: Array1<T>,
    d: Array1<T>,
}

impl<T: Scalar> TridiagonalSystem<T> {
    /// Build a system from diagonal `a` (n), super-diagonal `b` (n-1), sub-diagonal
    /// `c` (n-1) and right-hand side `d` (n).
    pub fn new(a: Array1<T>, b: Array1<T>, c: Array1<T>, d: Array1<T>) -> Result<Self> {
        let n = a.len();
        if n == 0 {
            return Err(SolverError::EmptySystem);
        }
        check_len("super-diagonal", n - 1, b.len())?;
        check_len("sub-diagonal", n - 1, c.len())?;
        check_len("right-hand side", n, d.len())?;
        Ok(Self { a, b, c, d })
    }

    /// Build from slices
    pub fn from_slices(a: &[T], b: &[T], c: &[T], d: &[T]) -> Result<Self> {
        Self::new(
            Array1::from(a.to_vec()),
            Array1::from(b.to_vec()),
            Array1::from(c.to_vec()),
            Array1::from(d.to_vec()),
        )
    }

    /// System order
    pub fn n(&self) -> usize {
        self.a.len()
    }

    /// Diagonal
    pub fn diagonal(&self) -> &Array1<T> {
        &self.a
    }

    /// Super-diagonal
    pub fn super_diagonal(&self) -> &Array1<T> {
        &self.b
    }

    /// Sub-diagonal
    pub fn sub_diagonal(&self) -> &Array1<T> {
        &self.c
    }

    /// Right-hand side
    pub fn rhs(&self) -> &Array1<T> {
        &self.d
    }

    /// Equivalent dense matrix and right-hand side
    pub fn to_dense(&self) -> (Array2<T>, Array1<T>) {
        let n = self.n();
        let mut m = Array2::zeros((n, n));
        for i in 0..n {
            m[[i, i]] = self.a[i];
            if i + 1 < n {
                m[[i, i + 1]] = self.b[i];
                m[[i + 1, i]] = self.c[i];
            }
        }
        (m, self.d.clone())
    }

    /// Solve with the chase algorithm; `|alpha_i| < tol` is a zero pivot.
    pub fn solve(&self, tol: T) -> Result<Array1<T>> {
        self.solve_with_diagnostics(tol, &mut NoopSink)
    }

    /// Solve, reporting one [`StepPhase::Chase`] record per forward step.
    ///
    /// Forward: `alpha[0] = a[0]`, and for `i >= 1`: `beta[i-1] = c[i-1] / alpha[i-1]`,
    /// `alpha[i] = a[i] - beta[i-1] b[i-1]`, `d'[i] = d[i] - beta[i-1] d'[i-1]`.
    /// Back: `x[n-1] = d'[n-1] / alpha[n-1]`, `x[i] = (d'[i] - b[i] x[i+1]) / alpha[i]`.
    pub fn solve_with_diagnostics<S>(&self, tol: T, sink: &mut S) -> Result<Array1<T>>
    where
        S: DiagnosticsSink<T> + ?Sized,
    {
        if tol < T::zero() || !tol.is_finite() {
            return Err(SolverError::InvalidTolerance);
        }
        let n = self.n();
        let mut alpha = Array1::<T>::zeros(n);
        let mut d_prime = Array1::<T>::zeros(n);

        alpha[0] = self.a[0];
        d_prime[0] = self.d[0];
        check_pivot(alpha[0], tol, 0)?;
        sink.record(&StepRecord::new(StepPhase::Chase, 0));

        for i in 1..n {
            let beta = self.c[i - 1] / alpha[i - 1];
            alpha[i] = self.a[i] - beta * self.b[i - 1];
            d_prime[i] = self.d[i] - beta * d_prime[i - 1];
            check_pivot(alpha[i], tol, i)?;

            let mut record = StepRecord::new(StepPhase::Chase, i);
            if sink.wants_snapshots() {
                record.matrix_snapshot = Some(self.chase_snapshot(&alpha, &d_prime, i));
            }
            sink.record(&record);
        }

        let mut x = Array1::<T>::zeros(n);
        x[n - 1] = d_prime[n - 1] / alpha[n - 1];
        for i in (0..n - 1).rev() {
            x[i] = (d_prime[i] - self.b[i] * x[i + 1]) / alpha[i];
        }
        Ok(x)
    }

    /// Augmented `[A | d]` with rows `0..=step` already chased.
    fn chase_snapshot(&self, alpha: &Array1<T>, d_prime: &Array1<T>, step: usize) -> Array2<T> {
        let n = self.n();
        let (dense, d) = self.to_dense();
        let mut aug = Array2::zeros((n, n + 1));
        for i in 0..n {
            for j in 0..n {
                aug[[i, j]] = dense[[i, j]];
            }
            aug[[i, n]] = d[i];
        }
        for i in 0..=step {
            aug[[i, i]] = alpha[i];
            aug[[i, n]] = d_prime[i];
            if i > 0 {
                aug[[i, i - 1]] = T::zero();
            }
        }
        aug
    }
}

/// Solve a tridiagonal system given as diagonal `a`, super-diagonal `b`, sub-diagonal
/// `c` and right-hand side `d`.
pub fn solve_tridiagonal<T: Scalar>(
    a: &[T],
    b: &[T],
    c: &[T],
    d: &[T],
    tol: T,
) -> Result<Array1<T>> {
    TridiagonalSystem::from_slices(a, b, c, d)?.solve(tol)
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(SolverError::DimensionMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

fn check_pivot<T: Scalar>(alpha: T, tol: T, step: usize) -> Result<()> {
    if alpha.norm() < tol || alpha.is_zero() {
        return Err(SolverError::ZeroPivot { step });
    }
    Ok(())
}
