//! Convergence analysis
//!
//! - [`analyze_convergence`]: iteration matrix, eigenvalues and spectral radius of a
//!   stationary scheme, without running it
//! - [`eigenvalues`] / [`spectral_radius`]: LAPACK with the `ndarray-linalg` feature,
//!   Hessenberg + shifted QR otherwise

mod convergence;
pub mod eigen;
#[cfg(not(feature = "ndarray-linalg"))]
mod hessenberg;

pub use convergence::{ConvergenceReport, affine_form, analyze_convergence, iteration_matrix};
pub use eigen::{eigenvalues, spectral_radius};
