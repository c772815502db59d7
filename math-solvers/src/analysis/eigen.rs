//! Eigenvalues of small dense real matrices
//!
//! Uses LAPACK (`geev` through ndarray-linalg) when the `ndarray-linalg` feature is
//! enabled, with a pure-Rust Hessenberg + shifted QR fallback. Only eigenvalues are
//! computed; complex pairs are returned as conjugates.

use crate::dense::check_square;
use crate::error::Result;
use ndarray::Array2;
use num_complex::Complex64;

#[cfg(feature = "ndarray-linalg")]
use ndarray_linalg::Eigvals;

#[cfg(not(feature = "ndarray-linalg"))]
use super::hessenberg::{hessenberg_in_place, hessenberg_qr};

/// All eigenvalues of a square real matrix, in no particular order.
///
/// Fails with [`EigenNoConvergence`](crate::SolverError::EigenNoConvergence) if the QR
/// iteration does not converge.
pub fn eigenvalues(a: &Array2<f64>) -> Result<Vec<Complex64>> {
    check_square(a)?;

    #[cfg(feature = "ndarray-linalg")]
    {
        a.eigvals().map(|values| values.to_vec()).map_err(|err| {
            log::warn!("LAPACK eigenvalue computation failed: {err}");
            crate::error::SolverError::EigenNoConvergence { iterations: 0 }
        })
    }

    #[cfg(not(feature = "ndarray-linalg"))]
    {
        let mut h = a.to_owned();
        hessenberg_in_place(&mut h);
        hessenberg_qr(&mut h)
    }
}

/// Largest eigenvalue modulus.
pub fn spectral_radius(a: &Array2<f64>) -> Result<f64> {
    Ok(eigenvalues(a)?
        .iter()
        .map(|z| z.norm())
        .fold(0.0, f64::max))
}
