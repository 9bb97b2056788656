//! # UVFill
//!
//! Low-rank completion of partially observed preference matrices.
//!
//! A preference matrix `P` (users × items) is approximated by `U · V` with
//! `U` of shape `users × k` and `V` of shape `k × items`. The factors are fitted
//! by gradient descent on the observed entries only, and the fit can be scored
//! on held-out ratings with k-fold cross-validation.
//!
//! ## Crates
//!
//! - [`core`]: matrices, factor pairs, losses, residuals and the optimizer trait
//! - [`optim`]: the gradient-descent optimizer
//! - [`validation`]: fold sampling and the k-fold validator
//!
//! ## Example
//!
//! ```rust
//! use uvfill::prelude::*;
//!
//! let raw = DMatrix::from_row_slice(3, 3, &[
//!     5.0, 3.0, 1.0,
//!     4.0, f64::NAN, 1.0,
//!     1.0, 1.0, 5.0,
//! ]);
//! let preference = DensePreference::from_nan_marked(raw);
//!
//! let mut optimizer = GradientDescent::new(
//!     GradientDescentConfig::new()
//!         .with_latent_factor(1)
//!         .with_max_iterations(50),
//! );
//! let filled = optimizer.fit_dense(&preference).unwrap();
//! assert!(filled.point[(1, 1)].is_finite());
//! ```

pub use uvfill_core as core;
pub use uvfill_optim as optim;
pub use uvfill_validation as validation;

pub use nalgebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use uvfill_core::prelude::*;
    pub use uvfill_optim::{GradientDescent, GradientDescentConfig, Newton};
    pub use uvfill_validation::{
        sample_fold, FoldPartition, HeldOutLoss, KFoldValidator, ValidationReport,
    };
}
