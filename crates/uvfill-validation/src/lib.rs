//! UVFill Validation - held-out evaluation of preference matrix factorizations.
//!
//! This crate provides the deterministic [`sample_fold`] partitioner and the
//! [`KFoldValidator`], which scores a sparse optimizer on one user's ratings
//! by fitting on `k − 1` folds and evaluating on the remaining one.
//!
//! # Examples
//!
//! ```rust
//! use uvfill_core::prelude::*;
//! use uvfill_optim::{GradientDescent, GradientDescentConfig};
//! use uvfill_validation::{HeldOutLoss, KFoldValidator};
//!
//! let ratings = CsrMatrix::from_triplets(
//!     2,
//!     5,
//!     &[(0, 0, 4.0), (0, 1, 2.0), (0, 3, 5.0), (0, 4, 3.0), (1, 2, 1.0)],
//! )
//! .unwrap();
//!
//! let optimizer = GradientDescent::new(GradientDescentConfig::new().with_latent_factor(2));
//! let validator = KFoldValidator::new(optimizer, 2)
//!     .unwrap()
//!     .with_held_out_loss(HeldOutLoss::Rmse);
//!
//! let report = validator.validate_user(&ratings, 0).unwrap();
//! println!("mean held-out RMSE: {}", report.mean_loss);
//! ```

pub mod kfold;
pub mod sampler;

pub use kfold::{HeldOutLoss, KFoldValidator, ValidationReport, DEFAULT_FOLDS};
pub use sampler::{fold_bounds, sample_fold, FoldPartition};
