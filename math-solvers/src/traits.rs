//! Scalar domain for the solvers
//!
//! Every algorithm in this crate is written once against [`Scalar`], which abstracts
//! over floating point (`f64`, `f32`) and exact rational arithmetic
//! ([`Rational64`](num_rational::Rational64)). The trait provides field operations
//! (through [`LinalgScalar`] and [`NumAssign`]), ordering, absolute value and the few
//! conversions needed for thresholds and spectral analysis.

use ndarray::LinalgScalar;
use num_rational::Rational64;
use num_traits::{NumAssign, Signed, Zero};
use std::fmt::{Debug, Display};
use std::ops::Neg;

/// Trait for scalar types that can be used in the elimination and iteration kernels.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (default for numerical work)
/// - `f32`
/// - `Rational64` (exact arithmetic, machine epsilon is zero)
pub trait Scalar:
    LinalgScalar + NumAssign + PartialOrd + Neg<Output = Self> + Debug + Display + Send + Sync
{
    /// Magnitude |x|
    fn norm(&self) -> Self;

    /// Machine epsilon of the domain; zero for exact domains
    fn epsilon() -> Self;

    /// Square root, `None` for negative input.
    ///
    /// Exact domains return the exact root when numerator and denominator are perfect
    /// squares and otherwise the closest representable approximation of the `f64` root.
    fn sqrt(&self) -> Option<Self>;

    /// Convert from `f64`, `None` if the value is not representable
    fn from_f64(value: f64) -> Option<Self>;

    /// Lossy conversion to `f64`
    fn to_f64(&self) -> f64;

    /// Exact conversion of a small count
    fn from_usize(n: usize) -> Self;

    /// `false` for NaN and infinities
    fn is_finite(&self) -> bool {
        true
    }

    /// Multiplicative inverse (1/x)
    #[inline]
    fn inv(&self) -> Self {
        Self::one() / *self
    }

    /// Check if |x| <= tol
    #[inline]
    fn is_zero_approx(&self, tol: Self) -> bool {
        self.norm() <= tol
    }
}

impl Scalar for f64 {
    #[inline]
    fn norm(&self) -> Self {
        f64::abs(*self)
    }

    #[inline]
    fn epsilon() -> Self {
        f64::EPSILON
    }

    #[inline]
    fn sqrt(&self) -> Option<Self> {
        (*self >= 0.0).then(|| f64::sqrt(*self))
    }

    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        Some(value)
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        *self
    }

    #[inline]
    fn from_usize(n: usize) -> Self {
        n as f64
    }

    #[inline]
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl Scalar for f32 {
    #[inline]
    fn norm(&self) -> Self {
        f32::abs(*self)
    }

    #[inline]
    fn epsilon() -> Self {
        f32::EPSILON
    }

    #[inline]
    fn sqrt(&self) -> Option<Self> {
        (*self >= 0.0).then(|| f32::sqrt(*self))
    }

    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        Some(value as f32)
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        f64::from(*self)
    }

    #[inline]
    fn from_usize(n: usize) -> Self {
        n as f32
    }

    #[inline]
    fn is_finite(&self) -> bool {
        f32::is_finite(*self)
    }
}

impl Scalar for Rational64 {
    #[inline]
    fn norm(&self) -> Self {
        Signed::abs(self)
    }

    #[inline]
    fn epsilon() -> Self {
        Rational64::zero()
    }

    fn sqrt(&self) -> Option<Self> {
        if Signed::is_negative(self) {
            return None;
        }
        if let (Some(n), Some(d)) = (exact_isqrt(*self.numer()), exact_isqrt(*self.denom())) {
            return Some(Rational64::new(n, d));
        }
        Rational64::approximate_float(f64::sqrt(self.to_f64()))
    }

    #[inline]
    fn from_f64(value: f64) -> Option<Self> {
        Rational64::approximate_float(value)
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        *self.numer() as f64 / *self.denom() as f64
    }

    #[inline]
    fn from_usize(n: usize) -> Self {
        Rational64::from_integer(n as i64)
    }

    #[inline]
    fn inv(&self) -> Self {
        self.recip()
    }
}

/// Integer square root of `n` if `n` is a perfect square.
fn exact_isqrt(n: i64) -> Option<i64> {
    if n < 0 {
        return None;
    }
    let guess = (n as f64).sqrt().round() as i64;
    (guess.saturating_sub(1)..=guess.saturating_add(1))
        .filter(|r| *r >= 0)
        .find(|r| r.checked_mul(*r) == Some(n))
}

/// Largest magnitude of a sequence, zero when empty.
pub(crate) fn max_norm<'a, T: Scalar + 'a>(values: impl IntoIterator<Item = &'a T>) -> T {
    values.into_iter().fold(T::zero(), |acc, v| {
        let m = v.norm();
        if m > acc { m } else { acc }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_f64_scalar() {
        let x: f64 = -3.0;
        assert_relative_eq!(x.norm(), 3.0);
        assert_eq!(Scalar::sqrt(&x), None);
        assert_relative_eq!(Scalar::sqrt(&9.0_f64).unwrap(), 3.0);
        assert_relative_eq!(Scalar::inv(&4.0_f64), 0.25);
        assert!(!Scalar::is_finite(&f64::NAN));
        assert!(1e-20_f64.is_zero_approx(1e-12));
    }

    #[test]
    fn test_rational_exact_sqrt() {
        let x = Rational64::new(9, 4);
        assert_eq!(Scalar::sqrt(&x), Some(Rational64::new(3, 2)));
        assert_eq!(Scalar::sqrt(&Rational64::new(-1, 4)), None);
        assert_eq!(<Rational64 as Scalar>::epsilon(), Rational64::zero());
    }

    #[test]
    fn test_rational_approximate_sqrt() {
        let root = Scalar::sqrt(&Rational64::from_integer(2)).unwrap();
        assert_relative_eq!(root.to_f64(), std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_rational_conversions() {
        let r = <Rational64 as Scalar>::from_f64(0.75).unwrap();
        assert_eq!(r, Rational64::new(3, 4));
        assert_relative_eq!(Rational64::new(1, 8).to_f64(), 0.125);
        assert_eq!(
            <Rational64 as Scalar>::from_usize(5),
            Rational64::from_integer(5)
        );
        assert_eq!(Scalar::inv(&Rational64::new(2, 3)), Rational64::new(3, 2));
    }

    #[test]
    fn test_max_norm() {
        let v = [1.0_f64, -7.5, 3.0];
        assert_relative_eq!(max_norm(v.iter()), 7.5);
        let empty: [f64; 0] = [];
        assert_relative_eq!(max_norm(empty.iter()), 0.0);
    }
}
