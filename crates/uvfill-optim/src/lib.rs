//! UVFill Optimization - factorization algorithms for preference matrices.
//!
//! This crate provides the concrete optimizers that fit a factor pair
//! `(U, V)` to the observed entries of a preference matrix.
//!
//! # Available Optimizers
//!
//! - **Gradient Descent**: regularized UV gradient descent for dense (masked)
//!   and sparse (CSR) preference matrices
//! - **Newton**: selectable by name, not yet implemented
//!
//! # Examples
//!
//! ```rust
//! use uvfill_core::prelude::*;
//! use uvfill_optim::{GradientDescent, GradientDescentConfig};
//!
//! let preference = CsrMatrix::from_triplets(2, 2, &[(0, 0, 5.0), (1, 1, 3.0)]).unwrap();
//!
//! let mut optimizer = GradientDescent::new(
//!     GradientDescentConfig::new()
//!         .with_latent_factor(1)
//!         .with_step_size(0.01)
//! );
//!
//! let result = optimizer.fit_sparse(&preference).unwrap();
//! assert!(result.value <= result.initial_value);
//! ```

pub mod gradient_descent;
pub mod newton;

// Re-export main optimizers for convenience
pub use gradient_descent::{GradientDescent, GradientDescentConfig};
pub use newton::Newton;

// Re-export commonly used items from core
pub use uvfill_core::{
    factors::{FactorInitializer, MeanInitializer, RandomInitializer},
    optimizer::{FactorOptimizer, OptimizationResult, TerminationReason},
};
