//! Type definitions and aliases for preference matrix factorization.
//!
//! This module provides the scalar trait shared by every numeric routine,
//! the dense matrix alias, and the coordinate type used to address
//! observed entries.

use nalgebra::{Dyn, OMatrix, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Trait for scalar types used in factorization (f32 or f64).
///
/// This trait combines all the numeric traits required by the loss metrics,
/// the residual computation and the gradient-descent update.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Sum
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Default minimum improvement between two iterations before the
    /// optimizer declares stagnation.
    const DEFAULT_MIN_IMPROVEMENT: Self;

    /// Default learning rate.
    const DEFAULT_STEP_SIZE: Self;

    /// Convert from f64 (for constants).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_f64(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).expect("Failed to convert from f64")
    }

    /// Convert from usize (for element counts).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const DEFAULT_MIN_IMPROVEMENT: Self = 1e-3;
    const DEFAULT_STEP_SIZE: Self = 1e-2;
}

impl Scalar for f64 {
    const DEFAULT_MIN_IMPROVEMENT: Self = 1e-3;
    const DEFAULT_STEP_SIZE: Self = 1e-2;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// A `(row, column)` position in a preference matrix.
pub type Coordinate = (usize, usize);

/// A stored sparse entry: `(row, column, value)`.
pub type Triplet<T> = (usize, usize, T);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_conversions() {
        let val_f64 = 3.14159;
        let val_f32 = <f32 as Scalar>::from_f64(val_f64);
        assert_relative_eq!(val_f32 as f64, val_f64, epsilon = 1e-6);

        assert_eq!(<f64 as Scalar>::from_usize(12), 12.0);
    }

    #[test]
    fn test_defaults_are_positive() {
        assert!(f32::DEFAULT_MIN_IMPROVEMENT > 0.0);
        assert!(f64::DEFAULT_STEP_SIZE > 0.0);
        assert!(f64::DEFAULT_MIN_IMPROVEMENT < f64::DEFAULT_STEP_SIZE);
    }
}
