//! A-priori convergence analysis of the stationary schemes
//!
//! Every scheme is a fixed-point iteration `x^(k+1) = T x^(k) + c` with `T = M⁻¹ N`,
//! `c = M⁻¹ b` and `A = M - N`. With the splitting `A = D - L - U`:
//!
//! | scheme        | `M`          | `N`                     |
//! |---------------|--------------|-------------------------|
//! | Jacobi        | `D`          | `L + U`                 |
//! | Gauss–Seidel  | `D - L`      | `U`                     |
//! | SOR(ω)        | `D / ω - L`  | `(1 / ω - 1) D + U`     |
//!
//! The iteration converges from every starting vector if and only if `ρ(T) < 1`.

use crate::dense::{check_system, to_f64_matrix};
use crate::direct::triangular::forward_substitution;
use crate::error::Result;
use crate::iterative::{Scheme, SplitMatrices, check_diagonal};
use crate::traits::Scalar;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::eigen::eigenvalues;

/// Outcome of [`analyze_convergence`]
#[derive(Debug, Clone)]
pub struct ConvergenceReport {
    /// Iteration matrix `T`
    pub iteration_matrix: Array2<f64>,
    /// Eigenvalues of `T`
    pub eigenvalues: Vec<Complex64>,
    /// `ρ(T) = max |λ|`
    pub spectral_radius: f64,
    /// `ρ(T) < 1`
    pub converges: bool,
}

/// Iteration matrix `T` of a scheme.
///
/// Fails with `ZeroPivot` on a zero diagonal entry and `InvalidRelaxation` for an SOR
/// factor outside `(0, 2)`.
pub fn iteration_matrix<T: Scalar>(a: &Array2<T>, scheme: Scheme) -> Result<Array2<T>> {
    let (m, n_part) = splitting(a, scheme)?;
    solve_lower_columns(&m, &n_part)
}

/// Iteration matrix `T` and constant vector `c` of `x^(k+1) = T x^(k) + c`.
pub fn affine_form<T: Scalar>(
    a: &Array2<T>,
    b: &Array1<T>,
    scheme: Scheme,
) -> Result<(Array2<T>, Array1<T>)> {
    check_system(a, b)?;
    let (m, n_part) = splitting(a, scheme)?;
    let t = solve_lower_columns(&m, &n_part)?;
    let c = forward_substitution(&m, b, false, T::zero())?;
    Ok((t, c))
}

/// Build the iteration matrix of `scheme` for `a`, compute its eigenvalues and decide
/// whether the scheme converges.
///
/// The verdict is advisory: `ρ(T) >= 1` is reported, not raised.
///
/// # Example
///
/// ```
/// use math_dense_solvers::{Scheme, analyze_convergence};
/// use ndarray::array;
///
/// let a = array![[4.0_f64, -1.0], [-1.0, 4.0]];
/// let report = analyze_convergence(&a, Scheme::Jacobi).unwrap();
/// assert!(report.converges);
/// assert!((report.spectral_radius - 0.25).abs() < 1e-12);
/// ```
pub fn analyze_convergence<T: Scalar>(a: &Array2<T>, scheme: Scheme) -> Result<ConvergenceReport> {
    let t = to_f64_matrix(&iteration_matrix(a, scheme)?);
    let eigenvalues = eigenvalues(&t)?;
    let spectral_radius = eigenvalues.iter().map(|z| z.norm()).fold(0.0, f64::max);
    log::debug!(
        "{} iteration matrix: spectral radius {:.6e}",
        scheme.name(),
        spectral_radius
    );

    Ok(ConvergenceReport {
        iteration_matrix: t,
        eigenvalues,
        spectral_radius,
        converges: spectral_radius < 1.0,
    })
}

/// `(M, N)` with `A = M - N`; `M` is lower triangular.
fn splitting<T: Scalar>(a: &Array2<T>, scheme: Scheme) -> Result<(Array2<T>, Array2<T>)> {
    let split = SplitMatrices::from_matrix(a)?;
    check_diagonal(a)?;
    let omega: T = scheme.relaxation()?;

    Ok(match scheme {
        Scheme::Jacobi => (split.d.clone(), &split.l + &split.u),
        Scheme::GaussSeidel | Scheme::Sor { .. } => {
            let inv_omega = omega.inv();
            let m = &split.d.mapv(|v| v * inv_omega) - &split.l;
            let n_part = &split.d.mapv(|v| v * (inv_omega - T::one())) + &split.u;
            (m, n_part)
        }
    })
}

/// `M⁻¹ N` column by column, `M` lower triangular with a non-zero diagonal.
fn solve_lower_columns<T: Scalar>(m: &Array2<T>, n_part: &Array2<T>) -> Result<Array2<T>> {
    let n = m.nrows();
    let mut t = Array2::zeros((n, n));
    for j in 0..n {
        let col = forward_substitution(m, &n_part.column(j).to_owned(), false, T::zero())?;
        t.column_mut(j).assign(&col);
    }
    Ok(t)
}
