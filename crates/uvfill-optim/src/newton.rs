//! Newton-method factorization.
//!
//! Only the selection surface exists: both fits report
//! [`OptimizerError::NotImplemented`] so callers can dispatch on the method
//! name without silently falling back to gradient descent.

use uvfill_core::{
    callback::OptimizationCallback,
    error::{OptimizerError, OptimizerResult},
    factors::FactorPair,
    matrix::{CsrMatrix, DensePreference},
    optimizer::{FactorOptimizer, OptimizationResult},
    types::{DMatrix, Scalar},
};

/// Newton optimizer placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Newton;

impl Newton {
    /// Creates the optimizer.
    pub fn new() -> Self {
        Self
    }
}

impl<T: Scalar> FactorOptimizer<T> for Newton {
    fn name(&self) -> &str {
        "Newton"
    }

    fn fit_dense_with_callback(
        &mut self,
        _preference: &DensePreference<T>,
        _callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T, DMatrix<T>>> {
        Err(OptimizerError::not_implemented("Newton"))
    }

    fn fit_sparse_with_callback(
        &mut self,
        _preference: &CsrMatrix<T>,
        _callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T, FactorPair<T>>> {
        Err(OptimizerError::not_implemented("Newton"))
    }
}
