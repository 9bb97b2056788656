//! Core optimizer traits and types for preference matrix factorization.
//!
//! An optimizer refines a factor pair `(U, V)` so that `U · V` matches the
//! observed entries of a preference matrix. The same optimizer type serves
//! both storage kinds:
//!
//! - **Dense**: the run returns the filled estimate `U · V` of the best
//!   checkpoint, with every previously missing cell populated.
//! - **Sparse**: the run returns the best checkpointed factor pair; callers
//!   multiply the factors themselves when they need a full estimate.
//!
//! # Termination
//!
//! A run never fails for lack of convergence. Exhausting the iteration budget
//! is reported through [`TerminationReason::MaxIterations`] and
//! `converged == false`, and the best checkpoint is still returned.

use crate::{
    error::OptimizerResult,
    factors::FactorPair,
    matrix::{CsrMatrix, DensePreference},
    optimization::callback::{NoOpCallback, OptimizationCallback},
    types::{DMatrix, Scalar},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

/// Result of a factorization run.
///
/// `point` is the dense estimate for dense runs and the factor pair for
/// sparse runs.
#[derive(Debug, Clone)]
pub struct OptimizationResult<T, P>
where
    T: Scalar,
{
    /// The best checkpoint found by the optimizer
    pub point: P,

    /// Loss of the best checkpoint
    pub value: T,

    /// Loss of the initial factors
    pub initial_value: T,

    /// Number of iterations performed
    pub iterations: usize,

    /// Wall-clock time elapsed during optimization
    pub duration: Duration,

    /// Why the loop stopped
    pub termination_reason: TerminationReason,

    /// True if the run stopped on the stagnation threshold
    pub converged: bool,
}

impl<T, P> OptimizationResult<T, P>
where
    T: Scalar,
{
    /// Creates a new optimization result.
    pub fn new(
        point: P,
        value: T,
        initial_value: T,
        iterations: usize,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        Self {
            point,
            value,
            initial_value,
            iterations,
            duration,
            converged: termination_reason == TerminationReason::Converged,
            termination_reason,
        }
    }

    /// Maps the point while keeping the run metadata.
    pub fn map_point<Q, F: FnOnce(P) -> Q>(self, f: F) -> OptimizationResult<T, Q> {
        OptimizationResult {
            point: f(self.point),
            value: self.value,
            initial_value: self.initial_value,
            iterations: self.iterations,
            duration: self.duration,
            termination_reason: self.termination_reason,
            converged: self.converged,
        }
    }
}

/// Reasons for a factorization run to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TerminationReason {
    /// Loss changed by less than the minimum improvement between iterations
    Converged,
    /// Loss got worse than the previous iteration (sparse runs only)
    LossIncreased,
    /// Maximum iteration count exhausted
    MaxIterations,
    /// A callback requested early termination
    CallbackRequest,
}

/// Interface shared by all factorization strategies.
///
/// Implementations own their configuration and initializer. Each call runs a
/// complete, independent optimization; no state carries over between calls.
pub trait FactorOptimizer<T>: Debug
where
    T: Scalar,
{
    /// Returns a human-readable name identifying the optimization method.
    fn name(&self) -> &str;

    /// Fits a dense preference matrix and returns the filled estimate.
    fn fit_dense_with_callback(
        &mut self,
        preference: &DensePreference<T>,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T, DMatrix<T>>>;

    /// Fits a sparse preference matrix and returns the best factor pair.
    fn fit_sparse_with_callback(
        &mut self,
        preference: &CsrMatrix<T>,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T, FactorPair<T>>>;

    /// Fits a dense preference matrix without observation.
    fn fit_dense(
        &mut self,
        preference: &DensePreference<T>,
    ) -> OptimizerResult<OptimizationResult<T, DMatrix<T>>> {
        self.fit_dense_with_callback(preference, &mut NoOpCallback)
    }

    /// Fits a sparse preference matrix without observation.
    fn fit_sparse(
        &mut self,
        preference: &CsrMatrix<T>,
    ) -> OptimizerResult<OptimizationResult<T, FactorPair<T>>> {
        self.fit_sparse_with_callback(preference, &mut NoOpCallback)
    }
}
