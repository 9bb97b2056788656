//! Callback support for factorization runs.
//!
//! This module provides traits and types for implementing callbacks that can
//! monitor and control the optimization process.

use crate::error::OptimizerResult;
use crate::types::Scalar;
use std::time::Duration;

/// Information passed to callbacks after each iteration.
#[derive(Clone, Debug)]
pub struct IterationInfo<T: Scalar> {
    /// Iteration index (sparse runs count from 0, dense runs from 1)
    pub iteration: usize,

    /// Loss evaluated at this iteration
    pub loss: T,

    /// Best loss seen so far
    pub best_loss: T,

    /// Elapsed time since the run started
    pub elapsed: Duration,
}

/// Trait for optimization callbacks.
///
/// Callbacks allow monitoring and controlling the optimization process.
/// They can be used for logging, loss tracking, early stopping, etc.
pub trait OptimizationCallback<T: Scalar> {
    /// Called at the start of optimization.
    fn on_optimization_start(&mut self) -> OptimizerResult<()> {
        Ok(())
    }

    /// Called at the end of each iteration, including the one whose loss
    /// ends the run.
    ///
    /// Returns `true` to continue optimization, `false` to stop early.
    fn on_iteration_end(&mut self, info: &IterationInfo<T>) -> OptimizerResult<bool> {
        let _ = info;
        Ok(true)
    }

    /// Called at the end of optimization with the final best loss.
    fn on_optimization_end(&mut self, best_loss: T) -> OptimizerResult<()> {
        let _ = best_loss;
        Ok(())
    }
}

/// A no-op callback that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCallback;

impl<T: Scalar> OptimizationCallback<T> for NoOpCallback {}

/// Records the loss of every iteration.
#[derive(Debug, Clone)]
pub struct LossHistory<T: Scalar> {
    /// Per-iteration losses, in order
    pub losses: Vec<T>,
    /// Best loss after each iteration, in order
    pub best_losses: Vec<T>,
    /// Final best loss reported at the end of the run
    pub final_loss: Option<T>,
}

impl<T: Scalar> Default for LossHistory<T> {
    fn default() -> Self {
        Self {
            losses: Vec::new(),
            best_losses: Vec::new(),
            final_loss: None,
        }
    }
}

impl<T: Scalar> LossHistory<T> {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Scalar> OptimizationCallback<T> for LossHistory<T> {
    fn on_optimization_start(&mut self) -> OptimizerResult<()> {
        self.losses.clear();
        self.best_losses.clear();
        self.final_loss = None;
        Ok(())
    }

    fn on_iteration_end(&mut self, info: &IterationInfo<T>) -> OptimizerResult<bool> {
        self.losses.push(info.loss);
        self.best_losses.push(info.best_loss);
        Ok(true)
    }

    fn on_optimization_end(&mut self, best_loss: T) -> OptimizerResult<()> {
        self.final_loss = Some(best_loss);
        Ok(())
    }
}
