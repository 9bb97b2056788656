//! Core types for low-rank preference matrix completion.
//!
//! This crate provides the building blocks shared by every factorization
//! strategy: preference matrix storage, factor pairs and their initializers,
//! the RMSE losses, residual computation, and the optimizer interface.
//!
//! # Key Concepts
//!
//! - **Preference matrix**: users × items ratings, partially observed
//! - **Factor pair**: `U (rows × k)` and `V (k × cols)` with `U · V ≈ P`
//! - **Residual**: observed rating minus prediction, at observed cells only
//! - **Checkpoint**: the best-loss factor pair retained during a run
//!
//! # Modules
//!
//! - [`core`]: Scalar trait, type aliases and error types
//! - [`matrix`]: Dense (masked) and sparse (CSR) preference matrices
//! - [`factors`]: Factor pairs and initializers
//! - [`numerical`]: Loss metrics and residual computation
//! - [`optimization`]: Optimizer trait, run state, results and callbacks

pub mod core;
pub mod factors;
pub mod matrix;
pub mod numerical;
pub mod optimization;
pub mod utils;

// Re-export modules for convenient access
pub use crate::core::{error, types};
pub use optimization::{callback, optimizer, optimizer_state};

// Re-export commonly used items at the crate root
pub use error::{MatrixError, OptimizerError, OptimizerResult, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use uvfill_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::callback::{IterationInfo, LossHistory, NoOpCallback, OptimizationCallback};
    pub use crate::error::{MatrixError, OptimizerError, OptimizerResult, Result};
    pub use crate::factors::{FactorInitializer, FactorPair, MeanInitializer, RandomInitializer};
    pub use crate::matrix::{CsrMatrix, DensePreference};
    pub use crate::numerical::{
        dense_residual, rmse, rmse_from_residual, sparse_residual, sparse_rmse,
    };
    pub use crate::optimizer::{
        FactorOptimizer, OptimizationResult, TerminationReason,
    };
    pub use crate::optimizer_state::OptimizationState;
    pub use crate::types::{Coordinate, DMatrix, Scalar, Triplet};
}
