//! Factor matrices and their initial construction.
//!
//! A [`FactorPair`] holds `U (rows × k)` and `V (k × cols)`. Optimizers obtain
//! their starting pair from a [`FactorInitializer`], then check the returned
//! shapes against the preference matrix before iterating.

use crate::{
    error::{MatrixError, Result},
    matrix::{CsrMatrix, DensePreference},
    numerical::check_factor_shapes,
    types::{DMatrix, Scalar},
};
use num_traits::Float;
use rand::{rngs::SmallRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::fmt::Debug;

/// The two low-rank factors whose product approximates a preference matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorPair<T: Scalar> {
    /// User factors, `rows × k`
    pub u: DMatrix<T>,
    /// Item factors, `k × cols`
    pub v: DMatrix<T>,
}

impl<T: Scalar> FactorPair<T> {
    /// Creates a factor pair, checking that the inner dimensions agree.
    pub fn new(u: DMatrix<T>, v: DMatrix<T>) -> Result<Self> {
        check_factor_shapes((u.nrows(), v.ncols()), &u, &v)?;
        Ok(Self { u, v })
    }

    /// Shared inner dimension `k`.
    #[inline]
    pub fn latent_factor(&self) -> usize {
        self.u.ncols()
    }

    /// Shape of the reconstructed matrix.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.u.nrows(), self.v.ncols())
    }

    /// Dense reconstruction `U · V`.
    pub fn estimate(&self) -> DMatrix<T> {
        &self.u * &self.v
    }

    /// Checks the pair against the shape of a preference matrix.
    pub fn check_shape(&self, shape: (usize, usize)) -> Result<()> {
        check_factor_shapes(shape, &self.u, &self.v)
    }
}

/// Produces the starting factors an optimizer iterates from.
pub trait FactorInitializer<T: Scalar>: Debug + Send + Sync {
    /// Initial factors for a dense preference matrix.
    fn dense_factors(&self, preference: &DensePreference<T>, latent_factor: usize)
        -> Result<FactorPair<T>>;

    /// Initial factors for a sparse preference matrix.
    fn sparse_factors(&self, preference: &CsrMatrix<T>, latent_factor: usize)
        -> Result<FactorPair<T>>;
}

fn sparse_mean<T: Scalar>(preference: &CsrMatrix<T>) -> T {
    if preference.nnz() == 0 {
        return T::zero();
    }
    let total: T = preference.values().iter().copied().sum();
    total / <T as Scalar>::from_usize(preference.nnz())
}

/// Cell value for which `U · V` reproduces `mean` everywhere.
fn mean_cell<T: Scalar>(mean: T, latent_factor: usize) -> T {
    Float::sqrt(Float::abs(mean) / <T as Scalar>::from_usize(latent_factor.max(1)))
}

fn constant_pair<T: Scalar>(shape: (usize, usize), latent_factor: usize, cell: T) -> FactorPair<T> {
    FactorPair {
        u: DMatrix::from_element(shape.0, latent_factor, cell),
        v: DMatrix::from_element(latent_factor, shape.1, cell),
    }
}

/// Fills every cell of `U` and `V` with `sqrt(|mean| / k)`, where `mean` is the
/// mean observed rating, so the first estimate predicts `|mean|` everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanInitializer;

impl<T: Scalar> FactorInitializer<T> for MeanInitializer {
    fn dense_factors(
        &self,
        preference: &DensePreference<T>,
        latent_factor: usize,
    ) -> Result<FactorPair<T>> {
        let cell = mean_cell(preference.observed_mean(), latent_factor);
        Ok(constant_pair(preference.shape(), latent_factor, cell))
    }

    fn sparse_factors(
        &self,
        preference: &CsrMatrix<T>,
        latent_factor: usize,
    ) -> Result<FactorPair<T>> {
        let cell = mean_cell(sparse_mean(preference), latent_factor);
        Ok(constant_pair(preference.shape(), latent_factor, cell))
    }
}

/// The mean start perturbed by seeded Gaussian noise.
///
/// A constant start makes every latent column identical, and gradient descent
/// keeps them identical; the perturbation breaks that symmetry when `k > 1`.
#[derive(Debug, Clone, Copy)]
pub struct RandomInitializer {
    /// Seed for the noise generator; equal seeds give equal factors.
    pub seed: u64,
    /// Standard deviation of the additive noise.
    pub noise: f64,
}

impl Default for RandomInitializer {
    fn default() -> Self {
        Self {
            seed: 42,
            noise: 0.1,
        }
    }
}

impl RandomInitializer {
    /// Creates a random initializer with the given seed and default noise.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Sets the noise standard deviation.
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    fn perturbed<T: Scalar>(
        &self,
        shape: (usize, usize),
        latent_factor: usize,
        mean: T,
    ) -> Result<FactorPair<T>> {
        let normal = Normal::new(0.0, self.noise.abs())
            .map_err(|e| MatrixError::numerical_error(format!("invalid noise level: {e}")))?;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let cell = mean_cell(mean, latent_factor);

        let mut pair = constant_pair(shape, latent_factor, cell);
        for x in pair.u.iter_mut().chain(pair.v.iter_mut()) {
            *x += <T as Scalar>::from_f64(normal.sample(&mut rng));
        }
        Ok(pair)
    }
}

impl<T: Scalar> FactorInitializer<T> for RandomInitializer {
    fn dense_factors(
        &self,
        preference: &DensePreference<T>,
        latent_factor: usize,
    ) -> Result<FactorPair<T>> {
        self.perturbed(preference.shape(), latent_factor, preference.observed_mean())
    }

    fn sparse_factors(
        &self,
        preference: &CsrMatrix<T>,
        latent_factor: usize,
    ) -> Result<FactorPair<T>> {
        self.perturbed(preference.shape(), latent_factor, sparse_mean(preference))
    }
}
