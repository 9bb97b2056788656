//! K-fold cross-validation of a factorization on one user's ratings.
//!
//! For each fold the user's stored ratings are split by [`sample_fold`]; the
//! training part is fitted with the sparse optimizer, the estimate `U · V` is
//! scored on the held-out part, and the per-fold losses are averaged.
//!
//! Folds share nothing but the read-only user row. With the `parallel`
//! feature they run on the rayon pool, each on its own copy of the optimizer;
//! losses are reported in fold order either way.

use crate::sampler::sample_fold;
use num_traits::Float;
use std::time::Duration;
use tracing::{debug, info};
use uvfill_core::{
    error::{MatrixError, OptimizerError, OptimizerResult, Result},
    matrix::CsrMatrix,
    optimizer::FactorOptimizer,
    types::{DMatrix, Scalar, Triplet},
};
use uvfill_optim::{GradientDescent, GradientDescentConfig};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fold count used by [`KFoldValidator::default`].
pub const DEFAULT_FOLDS: usize = 6;

/// Latent factor of the default validation optimizer.
pub const DEFAULT_LATENT_FACTOR: usize = 2;

/// Step size of the default validation optimizer.
pub const DEFAULT_STEP_SIZE: f64 = 0.0025;

/// Loss used to score the estimate on a held-out fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeldOutLoss {
    /// `sqrt(Σ (test − estimate)² / n)`
    #[default]
    Rmse,
    /// `(Σ (test − estimate))² / n`, the square of the summed residuals.
    ///
    /// Opposite-signed errors cancel, so this can report zero for a poor fit.
    /// Kept for reproducing historical scores.
    SquaredResidualSum,
}

impl HeldOutLoss {
    /// Scores `estimate` at the stored coordinates of `test`.
    pub fn evaluate<T: Scalar>(self, test: &CsrMatrix<T>, estimate: &DMatrix<T>) -> Result<T> {
        if test.nnz() == 0 {
            return Err(MatrixError::degenerate_input("held-out fold has no entries"));
        }
        if estimate.shape() != test.shape() {
            return Err(MatrixError::dimension_mismatch(
                format!("{:?}", test.shape()),
                format!("{:?}", estimate.shape()),
            ));
        }

        let n = <T as Scalar>::from_usize(test.nnz());
        let residuals = test.iter().map(|(i, j, value)| value - estimate[(i, j)]);
        let loss = match self {
            Self::Rmse => Float::sqrt(residuals.map(|r| r * r).sum::<T>() / n),
            Self::SquaredResidualSum => {
                let total: T = residuals.sum();
                total * total / n
            }
        };
        Ok(loss)
    }
}

/// Outcome of a k-fold validation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationReport<T: Scalar> {
    /// Held-out loss of each fold, in fold order
    pub fold_losses: Vec<T>,
    /// Optimizer run time of each fold, in fold order
    pub fold_durations: Vec<Duration>,
    /// Mean of `fold_losses`
    pub mean_loss: T,
}

/// Cross-validates a sparse optimizer on single users of a preference matrix.
///
/// # Examples
///
/// ```rust
/// use uvfill_core::prelude::*;
/// use uvfill_validation::KFoldValidator;
///
/// let ratings = CsrMatrix::from_triplets(
///     1,
///     6,
///     &[(0, 0, 5.0), (0, 1, 3.0), (0, 2, 4.0), (0, 4, 1.0)],
/// )
/// .unwrap();
///
/// let validator = KFoldValidator::<f64, _>::default().with_folds(2).unwrap();
/// let report = validator.validate_user(&ratings, 0).unwrap();
/// assert_eq!(report.fold_losses.len(), 2);
/// assert!(report.mean_loss.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct KFoldValidator<T, O>
where
    T: Scalar,
{
    optimizer: O,
    folds: usize,
    held_out_loss: HeldOutLoss,
    verbose: bool,
    _scalar: std::marker::PhantomData<T>,
}

impl<T> Default for KFoldValidator<T, GradientDescent<T>>
where
    T: Scalar,
{
    /// Six folds of gradient descent with latent factor 2 and step 0.0025.
    fn default() -> Self {
        let config = GradientDescentConfig::new()
            .with_latent_factor(DEFAULT_LATENT_FACTOR)
            .with_step_size(<T as Scalar>::from_f64(DEFAULT_STEP_SIZE));
        Self {
            optimizer: GradientDescent::new(config),
            folds: DEFAULT_FOLDS,
            held_out_loss: HeldOutLoss::default(),
            verbose: false,
            _scalar: std::marker::PhantomData,
        }
    }
}

impl<T, O> KFoldValidator<T, O>
where
    T: Scalar,
    O: FactorOptimizer<T> + Clone + Send + Sync,
{
    /// Creates a validator running `optimizer` over `folds` folds.
    ///
    /// Fewer than two folds is rejected.
    pub fn new(optimizer: O, folds: usize) -> OptimizerResult<Self> {
        Self::check_folds(folds)?;
        Ok(Self {
            optimizer,
            folds,
            held_out_loss: HeldOutLoss::default(),
            verbose: false,
            _scalar: std::marker::PhantomData,
        })
    }

    fn check_folds(folds: usize) -> OptimizerResult<()> {
        if folds < 2 {
            return Err(OptimizerError::invalid_configuration(
                "must be at least 2",
                "folds",
                folds.to_string(),
            ));
        }
        Ok(())
    }

    /// Changes the fold count.
    pub fn with_folds(mut self, folds: usize) -> OptimizerResult<Self> {
        Self::check_folds(folds)?;
        self.folds = folds;
        Ok(self)
    }

    /// Selects the held-out loss.
    pub fn with_held_out_loss(mut self, held_out_loss: HeldOutLoss) -> Self {
        self.held_out_loss = held_out_loss;
        self
    }

    /// Enables per-fold progress logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Number of folds.
    pub fn folds(&self) -> usize {
        self.folds
    }

    /// The held-out loss in use.
    pub fn held_out_loss(&self) -> HeldOutLoss {
        self.held_out_loss
    }

    /// The optimizer each fold starts from.
    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Runs k-fold validation on row `user` of `preference`.
    ///
    /// Every fold must hold out at least one rating; a user with fewer
    /// ratings than folds yields [`MatrixError::DegenerateInput`].
    pub fn validate_user(
        &self,
        preference: &CsrMatrix<T>,
        user: usize,
    ) -> OptimizerResult<ValidationReport<T>> {
        let row = preference.row(user)?;
        let entries: Vec<Triplet<T>> = row.iter().collect();
        debug!(user, ratings = entries.len(), folds = self.folds, "starting k-fold validation");

        #[cfg(feature = "parallel")]
        let outcomes: Vec<(T, Duration)> = (0..self.folds)
            .into_par_iter()
            .map(|fold| self.run_fold(&row, &entries, fold))
            .collect::<OptimizerResult<_>>()?;

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<(T, Duration)> = (0..self.folds)
            .map(|fold| self.run_fold(&row, &entries, fold))
            .collect::<OptimizerResult<_>>()?;

        let (fold_losses, fold_durations): (Vec<T>, Vec<Duration>) =
            outcomes.into_iter().unzip();
        let mean_loss =
            fold_losses.iter().copied().sum::<T>() / <T as Scalar>::from_usize(self.folds);

        if self.verbose {
            info!("# the Average RMSE: {}", mean_loss);
        }
        Ok(ValidationReport {
            fold_losses,
            fold_durations,
            mean_loss,
        })
    }

    /// Fits one fold and scores it, returning the loss and the fit time.
    fn run_fold(
        &self,
        row: &CsrMatrix<T>,
        entries: &[Triplet<T>],
        fold: usize,
    ) -> OptimizerResult<(T, Duration)> {
        let split = sample_fold(entries, fold, self.folds)?;
        let (nrows, ncols) = row.shape();
        let train = CsrMatrix::from_triplets(nrows, ncols, &split.train)?;
        let test = CsrMatrix::from_triplets(nrows, ncols, &split.test)?;

        let mut optimizer = self.optimizer.clone();
        let result = optimizer.fit_sparse(&train)?;
        let estimate = result.point.estimate();
        let loss = self.held_out_loss.evaluate(&test, &estimate)?;

        if self.verbose {
            info!("# RMSE of test set: {}", loss);
            info!("  calculating time: {:?}", result.duration);
        }
        debug!(fold, train = train.nnz(), test = test.nnz(), "fold scored");
        Ok((loss, result.duration))
    }
}
