//! Error types for preference matrix factorization.
//!
//! This module defines the error types used throughout the library for
//! matrix operations, numerical computations, and optimizer configuration.

use thiserror::Error;

/// Errors that can occur during matrix operations.
#[derive(Debug, Clone, Error)]
pub enum MatrixError {
    /// Dimension mismatch between matrices.
    ///
    /// Raised whenever factor matrices are incompatible with the preference
    /// matrix. Shapes are never padded or truncated.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Input with no elements to average over.
    ///
    /// This error occurs when a loss would divide by a zero element count,
    /// for example a held-out fold with no observed entries.
    #[error("Degenerate input: {reason}")]
    DegenerateInput {
        /// Description of the degenerate input
        reason: String,
    },

    /// Index outside of the matrix bounds.
    #[error("Index {index} out of bounds (bound {bound})")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Exclusive upper bound
        bound: usize,
    },

    /// Numerical instability detected.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl MatrixError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a DegenerateInput error with a custom reason.
    pub fn degenerate_input<S: Into<String>>(reason: S) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    /// Create an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, bound: usize) -> Self {
        Self::IndexOutOfBounds { index, bound }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during optimization and validation.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Invalid optimizer or validator configuration.
    ///
    /// This error occurs when a run is configured with invalid parameters
    /// (e.g., zero latent factors, negative learning rate, fewer than two folds).
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// The optimization method exists as a variant but has no implementation.
    #[error("Optimization method not implemented: {method}")]
    NotImplemented {
        /// Name of the unimplemented method
        method: String,
    },

    /// Propagated matrix error.
    #[error("Matrix operation failed: {0}")]
    Matrix(#[from] MatrixError),
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a NotImplemented error for a specific method.
    pub fn not_implemented<S: Into<String>>(method: S) -> Self {
        Self::NotImplemented {
            method: method.into(),
        }
    }
}

/// Result type alias for operations that can produce MatrixError.
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MatrixError::dimension_mismatch("(3, 3)", "(4, 4)");
        assert!(matches!(err, MatrixError::DimensionMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected (3, 3), got (4, 4)"
        );

        let err = MatrixError::degenerate_input("test set is empty");
        assert_eq!(err.to_string(), "Degenerate input: test set is empty");

        let err = MatrixError::index_out_of_bounds(7, 3);
        assert_eq!(err.to_string(), "Index 7 out of bounds (bound 3)");
    }

    #[test]
    fn test_optimizer_error_creation() {
        let err = OptimizerError::invalid_configuration("must be at least 2", "folds", "1");
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("Invalid optimizer configuration"));

        let err = OptimizerError::not_implemented("Newton");
        assert_eq!(err.to_string(), "Optimization method not implemented: Newton");
    }

    #[test]
    fn test_matrix_error_propagation() {
        let matrix_err = MatrixError::dimension_mismatch("U with 2 rows", "U with 3 rows");
        let optimizer_err: OptimizerError = matrix_err.into();

        assert!(matches!(optimizer_err, OptimizerError::Matrix(_)));
        assert!(optimizer_err.to_string().contains("Matrix operation failed"));
        assert!(optimizer_err.to_string().contains("U with 3 rows"));
    }
}
