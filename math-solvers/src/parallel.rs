//! Parallel utilities with feature-gated implementations
//!
//! Independent solves share no state, so a batch of systems can be mapped over a
//! thread pool (rayon, behind the `rayon` feature) with a sequential fallback.

use crate::direct::{DirectMethod, solve_direct};
use crate::error::Result;
use crate::traits::Scalar;
use ndarray::{Array1, Array2};

/// Parallel map over a slice
#[cfg(feature = "rayon")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Sequential map (fallback when parallel is not available)
#[cfg(not(feature = "rayon"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

/// Solve every `(A, b)` pair with the same direct method.
///
/// Results are returned in input order; one failing system does not affect the others.
pub fn solve_direct_batch<T: Scalar>(
    systems: &[(Array2<T>, Array1<T>)],
    method: DirectMethod,
) -> Vec<Result<Array1<T>>> {
    parallel_map(systems, |(a, b)| solve_direct(a, b, method))
}
