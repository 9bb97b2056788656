//! Shared fixtures for tests and benchmarks.

#![cfg(any(test, feature = "test-utils"))]

use crate::{
    matrix::{CsrMatrix, DensePreference},
    types::{DMatrix, Triplet},
};
use rand::prelude::*;

/// A small ratings matrix with a few missing cells (NaN-marked, 1–5 scale).
pub fn small_ratings() -> DMatrix<f64> {
    let nan = f64::NAN;
    DMatrix::from_row_slice(5, 4, &[
        5.0, 3.0, nan, 1.0,
        4.0, nan, nan, 1.0,
        1.0, 1.0, nan, 5.0,
        1.0, nan, nan, 4.0,
        nan, 1.0, 5.0, 4.0,
    ])
}

/// A `rows × cols` matrix of exact rank `rank` with positive entries.
pub fn low_rank_matrix(rows: usize, cols: usize, rank: usize, seed: u64) -> DMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let u = DMatrix::from_fn(rows, rank, |_, _| rng.gen_range(0.5..1.5));
    let v = DMatrix::from_fn(rank, cols, |_, _| rng.gen_range(0.5..1.5));
    u * v
}

/// Hides roughly `missing_fraction` of the cells of `full`.
///
/// At least one cell per row stays observed.
pub fn with_missing(full: &DMatrix<f64>, missing_fraction: f64, seed: u64) -> DensePreference<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut marked = full.clone();
    for i in 0..full.nrows() {
        let keep = rng.gen_range(0..full.ncols().max(1));
        for j in 0..full.ncols() {
            if j != keep && rng.gen::<f64>() < missing_fraction {
                marked[(i, j)] = f64::NAN;
            }
        }
    }
    DensePreference::from_nan_marked(marked)
}

/// Sparse copy of the observed cells of a dense preference matrix.
pub fn to_sparse(preference: &DensePreference<f64>) -> CsrMatrix<f64> {
    let triplets: Vec<Triplet<f64>> = preference
        .observed_coordinates()
        .iter()
        .map(|&(i, j)| (i, j, preference.values()[(i, j)]))
        .collect();
    CsrMatrix::from_triplets(preference.nrows(), preference.ncols(), &triplets)
        .expect("observed coordinates are in bounds")
}

/// A single-user sparse matrix with `ratings` stored at columns `0..n`.
pub fn single_user(ratings: &[f64], ncols: usize) -> CsrMatrix<f64> {
    let triplets: Vec<Triplet<f64>> = ratings
        .iter()
        .enumerate()
        .map(|(j, &r)| (0, j, r))
        .collect();
    CsrMatrix::from_triplets(1, ncols, &triplets).expect("ratings fit in the row")
}
