//! Gradient-descent factorization of preference matrices.
//!
//! This module implements the UV-decomposition gradient descent for both
//! dense (masked) and sparse (CSR) preference matrices.
//!
//! # Algorithm Overview
//!
//! Each iteration, with residual `K = P - U·V` evaluated at observed cells:
//! 1. `U ← U + step · (K·Vᵀ − λ·U)`
//! 2. `V ← V + step · (Uᵀ·K − λ·V)`, using the freshly updated `U`
//! 3. Evaluate the RMSE and checkpoint `(U, V)` on strict improvement
//!
//! # Stopping rules
//!
//! The two storage kinds stop differently, and both rules are kept as-is:
//!
//! - **Dense**: stops when `|loss − previous| < min_improvement`.
//! - **Sparse**: stops on the same stagnation test, and additionally as soon
//!   as the loss gets worse than the previous iteration.
//!
//! Either run ends at `max_iterations` otherwise, returning the best
//! checkpoint with `converged == false`.

use num_traits::Float;
use std::time::Instant;
use tracing::{debug, info};
use uvfill_core::{
    callback::{IterationInfo, NoOpCallback, OptimizationCallback},
    error::{OptimizerError, OptimizerResult},
    factors::{FactorInitializer, FactorPair, MeanInitializer},
    matrix::{CsrMatrix, DensePreference},
    numerical::{dense_residual, rmse_from_residual, sparse_residual, sparse_rmse},
    optimizer::{FactorOptimizer, OptimizationResult, TerminationReason},
    optimizer_state::OptimizationState,
    types::{DMatrix, Scalar},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the gradient-descent optimizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradientDescentConfig<T>
where
    T: Scalar,
{
    /// Inner dimension `k` of the factor pair
    pub latent_factor: usize,

    /// Maximum number of iterations
    pub max_iterations: usize,

    /// Learning rate
    pub step_size: T,

    /// L2 regularization weight (lambda)
    pub regularization: T,

    /// Minimum change in loss between iterations before stopping
    pub min_improvement: T,

    /// Emit per-iteration losses at `info` level
    pub verbose: bool,
}

impl<T> Default for GradientDescentConfig<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self {
            latent_factor: 1,
            max_iterations: 100,
            step_size: T::DEFAULT_STEP_SIZE,
            regularization: T::zero(),
            min_improvement: T::DEFAULT_MIN_IMPROVEMENT,
            verbose: false,
        }
    }
}

impl<T> GradientDescentConfig<T>
where
    T: Scalar,
{
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the latent factor count.
    pub fn with_latent_factor(mut self, latent_factor: usize) -> Self {
        self.latent_factor = latent_factor;
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the learning rate.
    pub fn with_step_size(mut self, step_size: T) -> Self {
        self.step_size = step_size;
        self
    }

    /// Sets the L2 regularization weight.
    pub fn with_regularization(mut self, regularization: T) -> Self {
        self.regularization = regularization;
        self
    }

    /// Sets the minimum improvement threshold.
    pub fn with_min_improvement(mut self, min_improvement: T) -> Self {
        self.min_improvement = min_improvement;
        self
    }

    /// Enables or disables progress logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Checks every parameter before a run starts.
    pub fn validate(&self) -> OptimizerResult<()> {
        if self.latent_factor == 0 {
            return Err(OptimizerError::invalid_configuration(
                "must be at least 1",
                "latent_factor",
                "0",
            ));
        }
        if !Float::is_finite(self.step_size) || self.step_size <= T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "must be positive and finite",
                "step_size",
                self.step_size.to_string(),
            ));
        }
        if !Float::is_finite(self.regularization) || self.regularization < T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "must be non-negative and finite",
                "regularization",
                self.regularization.to_string(),
            ));
        }
        if Float::is_nan(self.min_improvement) || self.min_improvement < T::zero() {
            return Err(OptimizerError::invalid_configuration(
                "must be non-negative",
                "min_improvement",
                self.min_improvement.to_string(),
            ));
        }
        Ok(())
    }
}

/// Gradient-descent optimizer for dense and sparse preference matrices.
///
/// # Examples
///
/// ```rust
/// use uvfill_core::prelude::*;
/// use uvfill_optim::{GradientDescent, GradientDescentConfig};
///
/// let raw = DMatrix::from_row_slice(2, 2, &[5.0, f64::NAN, 4.0, 1.0]);
/// let preference = DensePreference::from_nan_marked(raw);
///
/// let mut optimizer = GradientDescent::new(
///     GradientDescentConfig::new()
///         .with_latent_factor(1)
///         .with_max_iterations(50),
/// );
/// let result = optimizer.fit_dense(&preference).unwrap();
/// assert_eq!(result.point.shape(), (2, 2));
/// ```
#[derive(Debug, Clone)]
pub struct GradientDescent<T, I = MeanInitializer>
where
    T: Scalar,
{
    config: GradientDescentConfig<T>,
    initializer: I,
}

impl<T> GradientDescent<T>
where
    T: Scalar,
{
    /// Creates an optimizer starting from the mean initializer.
    pub fn new(config: GradientDescentConfig<T>) -> Self {
        Self {
            config,
            initializer: MeanInitializer,
        }
    }
}

impl<T> Default for GradientDescent<T>
where
    T: Scalar,
{
    fn default() -> Self {
        Self::new(GradientDescentConfig::default())
    }
}

impl<T, I> GradientDescent<T, I>
where
    T: Scalar,
    I: FactorInitializer<T>,
{
    /// Replaces the initializer.
    pub fn with_initializer<J: FactorInitializer<T>>(
        self,
        initializer: J,
    ) -> GradientDescent<T, J> {
        GradientDescent {
            config: self.config,
            initializer,
        }
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &GradientDescentConfig<T> {
        &self.config
    }

    /// Returns the initializer.
    pub fn initializer(&self) -> &I {
        &self.initializer
    }

    /// `factor ← factor + step · (gradient − λ · factor)`
    fn regularized_step(&self, factor: &mut DMatrix<T>, gradient: DMatrix<T>) {
        let update = (gradient - &*factor * self.config.regularization) * self.config.step_size;
        *factor += update;
    }

    fn descend_dense(&self, pair: &mut FactorPair<T>, residual: &DMatrix<T>) {
        let grad_u = residual * pair.v.transpose();
        self.regularized_step(&mut pair.u, grad_u);
        let grad_v = pair.u.transpose() * residual;
        self.regularized_step(&mut pair.v, grad_v);
    }

    fn descend_sparse(
        &self,
        pair: &mut FactorPair<T>,
        residual: &CsrMatrix<T>,
    ) -> OptimizerResult<()> {
        let grad_u = residual.mul_dense(&pair.v.transpose())?;
        self.regularized_step(&mut pair.u, grad_u);
        let grad_v = residual.transpose_mul_dense(&pair.u)?.transpose();
        self.regularized_step(&mut pair.v, grad_v);
        Ok(())
    }

    fn report_iteration(&self, iteration: usize, loss: T) {
        if self.config.verbose {
            info!("rmse {}: {}", iteration, loss);
        }
    }

    /// Fits a dense preference matrix and returns the best factor pair
    /// instead of its product.
    pub fn fit_dense_factors(
        &self,
        preference: &DensePreference<T>,
    ) -> OptimizerResult<OptimizationResult<T, FactorPair<T>>> {
        self.run_dense(preference, &mut NoOpCallback)
    }

    /// Runs the dense loop.
    fn run_dense(
        &self,
        preference: &DensePreference<T>,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T, FactorPair<T>>> {
        self.config.validate()?;
        let start_time = Instant::now();

        let initial = self
            .initializer
            .dense_factors(preference, self.config.latent_factor)?;
        initial.check_shape(preference.shape())?;

        let mut residual = dense_residual(preference, &initial.u, &initial.v)?;
        let initial_loss = rmse_from_residual(&residual)?;
        let mut state = OptimizationState::new(initial, initial_loss);
        let mut last = initial_loss;
        let mut reason = TerminationReason::MaxIterations;

        callback.on_optimization_start()?;
        self.report_iteration(0, initial_loss);

        for iteration in 1..=self.config.max_iterations {
            self.descend_dense(&mut state.current, &residual);
            residual = dense_residual(preference, &state.current.u, &state.current.v)?;
            let loss = rmse_from_residual(&residual)?;
            state.next_iteration();
            self.report_iteration(iteration, loss);

            state.update_best(loss);
            let info = IterationInfo {
                iteration,
                loss,
                best_loss: state.best_loss,
                elapsed: start_time.elapsed(),
            };
            if !callback.on_iteration_end(&info)? {
                reason = TerminationReason::CallbackRequest;
                break;
            }

            if Float::abs(loss - last) < self.config.min_improvement {
                reason = TerminationReason::Converged;
                break;
            }
            last = loss;
        }

        callback.on_optimization_end(state.best_loss)?;
        debug!(
            iterations = state.iteration,
            reason = ?reason,
            "dense gradient descent finished with optimal loss {}",
            state.best_loss
        );

        let iterations = state.iteration;
        let (best, best_loss) = state.into_best();
        Ok(OptimizationResult::new(
            best,
            best_loss,
            initial_loss,
            iterations,
            start_time.elapsed(),
            reason,
        ))
    }

    /// Runs the sparse loop.
    fn run_sparse(
        &self,
        preference: &CsrMatrix<T>,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T, FactorPair<T>>> {
        self.config.validate()?;
        let start_time = Instant::now();

        if self.config.verbose {
            info!("# begin");
        }

        let initial = self
            .initializer
            .sparse_factors(preference, self.config.latent_factor)?;
        initial.check_shape(preference.shape())?;

        let mut residual = sparse_residual(preference, &initial.u, &initial.v)?;
        let initial_loss = sparse_rmse(&residual)?;
        let mut state = OptimizationState::new(initial, initial_loss);
        let mut last = <T as Float>::infinity();
        let mut reason = TerminationReason::MaxIterations;

        callback.on_optimization_start()?;

        for iteration in 0..self.config.max_iterations {
            let loss = sparse_rmse(&residual)?;
            self.report_iteration(iteration, loss);

            let stop = if Float::abs(loss - last) < self.config.min_improvement {
                Some(TerminationReason::Converged)
            } else if last - loss < T::zero() {
                Some(TerminationReason::LossIncreased)
            } else {
                None
            };

            // The iterate that triggers a stop is never checkpointed.
            if stop.is_none() {
                state.update_best(loss);
            }
            let info = IterationInfo {
                iteration,
                loss,
                best_loss: state.best_loss,
                elapsed: start_time.elapsed(),
            };
            let proceed = callback.on_iteration_end(&info)?;

            if let Some(stop) = stop {
                reason = stop;
                break;
            }
            if !proceed {
                reason = TerminationReason::CallbackRequest;
                break;
            }
            last = loss;

            self.descend_sparse(&mut state.current, &residual)?;
            residual = sparse_residual(preference, &state.current.u, &state.current.v)?;
            state.next_iteration();
        }

        callback.on_optimization_end(state.best_loss)?;
        if self.config.verbose {
            info!("# optimal loss : {}", state.best_loss);
        }
        debug!(
            iterations = state.iteration,
            reason = ?reason,
            "sparse gradient descent finished"
        );

        let iterations = state.iteration;
        let (best, best_loss) = state.into_best();
        Ok(OptimizationResult::new(
            best,
            best_loss,
            initial_loss,
            iterations,
            start_time.elapsed(),
            reason,
        ))
    }
}

impl<T, I> FactorOptimizer<T> for GradientDescent<T, I>
where
    T: Scalar,
    I: FactorInitializer<T>,
{
    fn name(&self) -> &str {
        "Gradient Descent"
    }

    fn fit_dense_with_callback(
        &mut self,
        preference: &DensePreference<T>,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T, DMatrix<T>>> {
        Ok(self
            .run_dense(preference, callback)?
            .map_point(|pair| pair.estimate()))
    }

    fn fit_sparse_with_callback(
        &mut self,
        preference: &CsrMatrix<T>,
        callback: &mut dyn OptimizationCallback<T>,
    ) -> OptimizerResult<OptimizationResult<T, FactorPair<T>>> {
        self.run_sparse(preference, callback)
    }
}
