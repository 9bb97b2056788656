//! Property tests for residual computation and loss metrics.
//!
//! These verify that sparse residuals keep the preference matrix's sparsity
//! structure and that the dense and sparse losses agree on the same data.

use approx::assert_relative_eq;
use proptest::prelude::*;
use uvfill_core::prelude::*;

fn triplets(rows: usize, cols: usize) -> impl Strategy<Value = Vec<Triplet<f64>>> {
    prop::collection::vec((0..rows, 0..cols, 1.0f64..5.0), 0..(rows * cols))
}

fn factors(
    rows: usize,
    cols: usize,
    k: usize,
) -> impl Strategy<Value = (DMatrix<f64>, DMatrix<f64>)> {
    (
        prop::collection::vec(-2.0f64..2.0, rows * k),
        prop::collection::vec(-2.0f64..2.0, k * cols),
    )
        .prop_map(move |(u, v)| {
            (
                DMatrix::from_vec(rows, k, u),
                DMatrix::from_vec(k, cols, v),
            )
        })
}

proptest! {
    #[test]
    fn residual_never_introduces_coordinates(
        entries in triplets(4, 5),
        (u, v) in factors(4, 5, 2),
    ) {
        let preference = CsrMatrix::from_triplets(4, 5, &entries).unwrap();
        let delta = sparse_residual(&preference, &u, &v).unwrap();

        let stored = preference.coordinate_pairs();
        for coordinate in delta.coordinate_pairs() {
            prop_assert!(stored.contains(&coordinate));
        }
        prop_assert_eq!(delta.shape(), preference.shape());
    }

    #[test]
    fn sparse_and_dense_losses_agree(
        entries in triplets(3, 3),
        (u, v) in factors(3, 3, 1),
    ) {
        let sparse = CsrMatrix::from_triplets(3, 3, &entries).unwrap();
        let cells: Vec<Option<f64>> = (0..3)
            .flat_map(|i| (0..3).map(move |j| (i, j)))
            .map(|(i, j)| sparse.get(i, j))
            .collect();
        let dense = DensePreference::from_options(3, 3, cells).unwrap();

        let sparse_loss = sparse_rmse(&sparse_residual(&sparse, &u, &v).unwrap()).unwrap();
        let dense_loss = rmse_from_residual(&dense_residual(&dense, &u, &v).unwrap()).unwrap();
        prop_assert!((sparse_loss - dense_loss).abs() < 1e-9);
    }
}

#[test]
fn test_perfect_factors_have_zero_residual() {
    let u = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
    let v = DMatrix::from_row_slice(1, 2, &[3.0, 4.0]);
    let full = &u * &v;

    let preference = CsrMatrix::from_dense(&full, 0.0);
    let delta = sparse_residual(&preference, &u, &v).unwrap();
    assert_relative_eq!(sparse_rmse(&delta).unwrap(), 0.0);
    assert_relative_eq!(rmse(&full, &(&u * &v)).unwrap(), 0.0);
}

#[test]
fn test_full_size_denominator_understates_sparse_error() {
    // One stored residual of 3 in a 3x3 matrix: sqrt(9 / 9), not sqrt(9 / 1).
    let preference = CsrMatrix::from_triplets(3, 3, &[(1, 1, 3.0)]).unwrap();
    let u = DMatrix::zeros(3, 1);
    let v = DMatrix::zeros(1, 3);
    let delta = sparse_residual(&preference, &u, &v).unwrap();
    assert_relative_eq!(sparse_rmse(&delta).unwrap(), 1.0);
}
