//! Vector and matrix norms
//!
//! Provides the norms used for stopping criteria and error analysis:
//!
//! | [`NormKind`]  | vector                 | matrix                          |
//! |---------------|------------------------|---------------------------------|
//! | `One`         | `Σ |x_i|`              | max column sum                  |
//! | `Two`         | `sqrt(Σ x_i²)`         | not supported                   |
//! | `Infinity`    | `max |x_i|`            | max row sum                     |
//! | `Frobenius`   | not supported          | `sqrt(Σ a_ij²)`                 |
//!
//! and the condition number `cond(A) = ‖A‖ ‖A⁻¹‖`.

use crate::dense::{check_square, check_system, residual};
use crate::direct::inverse;
use crate::error::{Result, SolverError};
use crate::traits::{Scalar, max_norm};
use ndarray::{Array1, Array2};

/// Norm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NormKind {
    /// 1-norm
    One,
    /// Euclidean norm
    Two,
    /// Max norm
    #[default]
    Infinity,
    /// Frobenius norm
    Frobenius,
}

impl NormKind {
    fn label(self) -> &'static str {
        match self {
            NormKind::One => "1",
            NormKind::Two => "2",
            NormKind::Infinity => "infinity",
            NormKind::Frobenius => "Frobenius",
        }
    }
}

/// Vector norm. `Frobenius` is rejected with [`SolverError::UnsupportedNorm`].
pub fn vector_norm<T: Scalar>(x: &Array1<T>, kind: NormKind) -> Result<T> {
    match kind {
        NormKind::One => Ok(x.iter().fold(T::zero(), |acc, v| acc + v.norm())),
        NormKind::Two => root(x.iter().fold(T::zero(), |acc, &v| acc + v * v), kind),
        NormKind::Infinity => Ok(max_norm(x.iter())),
        NormKind::Frobenius => Err(SolverError::UnsupportedNorm {
            norm: kind.label(),
            operand: "vectors",
        }),
    }
}

/// Matrix norm. The spectral norm (`Two`) is rejected with
/// [`SolverError::UnsupportedNorm`].
pub fn matrix_norm<T: Scalar>(a: &Array2<T>, kind: NormKind) -> Result<T> {
    match kind {
        NormKind::One => Ok(a
            .columns()
            .into_iter()
            .map(|col| col.iter().fold(T::zero(), |acc, v| acc + v.norm()))
            .fold(T::zero(), larger)),
        NormKind::Infinity => Ok(a
            .rows()
            .into_iter()
            .map(|row| row.iter().fold(T::zero(), |acc, v| acc + v.norm()))
            .fold(T::zero(), larger)),
        NormKind::Frobenius => root(a.iter().fold(T::zero(), |acc, &v| acc + v * v), kind),
        NormKind::Two => Err(SolverError::UnsupportedNorm {
            norm: kind.label(),
            operand: "matrices",
        }),
    }
}

/// `‖b - A x‖∞`
pub fn residual_norm<T: Scalar>(a: &Array2<T>, x: &Array1<T>, b: &Array1<T>) -> Result<T> {
    let n = check_system(a, b)?;
    if x.len() != n {
        return Err(SolverError::DimensionMismatch {
            what: "solution",
            expected: n,
            got: x.len(),
        });
    }
    Ok(max_norm(residual(a, x, b).iter()))
}

/// Condition number `‖A‖ ‖A⁻¹‖` in the given matrix norm.
///
/// Fails with [`SolverError::SingularMatrix`] when `A` has no inverse.
pub fn condition_number<T: Scalar>(a: &Array2<T>, kind: NormKind) -> Result<T> {
    check_square(a)?;
    let norm_a = matrix_norm(a, kind)?;
    let a_inv = inverse(a)?;
    Ok(norm_a * matrix_norm(&a_inv, kind)?)
}

fn larger<T: Scalar>(acc: T, v: T) -> T {
    if v > acc { v } else { acc }
}

/// Square root of a sum of squares; the domain may fail to represent it.
fn root<T: Scalar>(sum: T, kind: NormKind) -> Result<T> {
    sum.sqrt().ok_or(SolverError::UnsupportedNorm {
        norm: kind.label(),
        operand: "this scalar domain",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use num_rational::Rational64;

    #[test]
    fn test_vector_norms() {
        let x = array![1.0_f64, -1.0];
        assert_relative_eq!(vector_norm(&x, NormKind::One).unwrap(), 2.0);
        assert_relative_eq!(vector_norm(&x, NormKind::Infinity).unwrap(), 1.0);
        assert_relative_eq!(
            vector_norm(&x, NormKind::Two).unwrap(),
            std::f64::consts::SQRT_2
        );
        assert!(vector_norm(&x, NormKind::Frobenius).unwrap_err().is_config_error());
    }

    #[test]
    fn test_matrix_norms() {
        let a = array![[1.0_f64, 3.0], [-2.0, 4.0]];
        assert_relative_eq!(matrix_norm(&a, NormKind::One).unwrap(), 7.0);
        assert_relative_eq!(matrix_norm(&a, NormKind::Infinity).unwrap(), 6.0);
        assert_relative_eq!(
            matrix_norm(&a, NormKind::Frobenius).unwrap(),
            30.0_f64.sqrt()
        );
        assert_eq!(
            matrix_norm(&a, NormKind::Two).unwrap_err(),
            SolverError::UnsupportedNorm {
                norm: "2",
                operand: "matrices"
            }
        );
    }

    #[test]
    fn test_exact_norms() {
        let x = array![Rational64::new(3, 5), Rational64::new(-4, 5)];
        assert_eq!(
            vector_norm(&x, NormKind::Two).unwrap(),
            Rational64::from_integer(1)
        );
        assert_eq!(
            vector_norm(&x, NormKind::One).unwrap(),
            Rational64::new(7, 5)
        );
    }

    #[test]
    fn test_condition_number() {
        let a = array![[1.0_f64, 2.0], [3.0, 4.0]];
        assert_relative_eq!(
            condition_number(&a, NormKind::Infinity).unwrap(),
            21.0,
            epsilon = 1e-10
        );
        assert_relative_eq!(
            condition_number(&a, NormKind::One).unwrap(),
            21.0,
            epsilon = 1e-10
        );

        let singular = array![[1.0_f64, 2.0], [2.0, 4.0]];
        assert!(condition_number(&singular, NormKind::Infinity).unwrap_err().is_singular());
    }

    #[test]
    fn test_residual_norm() {
        let a = array![[1.0_f64, 3.0], [-2.0, 4.0]];
        let x = array![1.0_f64, -1.0];
        let b = array![-2.0_f64, -6.0];
        assert_eq!(residual_norm(&a, &x, &b).unwrap(), 0.0);
        assert_relative_eq!(
            residual_norm(&a, &x, &array![0.0_f64, 0.0]).unwrap(),
            6.0
        );
    }
}
