//! Property tests for the best-checkpoint invariant of gradient descent.

use proptest::prelude::*;
use uvfill_core::prelude::*;
use uvfill_optim::{GradientDescent, GradientDescentConfig};

fn full_matrix() -> impl Strategy<Value = DMatrix<f64>> {
    (2usize..5, 2usize..5).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(1.0f64..5.0, rows * cols)
            .prop_map(move |values| DMatrix::from_vec(rows, cols, values))
    })
}

fn is_non_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] <= w[0])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn dense_checkpoint_never_regresses(full in full_matrix(), seed in 0u64..1000) {
        let latent = full.nrows().min(full.ncols());
        let preference = DensePreference::fully_observed(full);
        let mut optimizer = GradientDescent::new(
            GradientDescentConfig::new()
                .with_latent_factor(latent)
                .with_max_iterations(40),
        )
        .with_initializer(RandomInitializer::new(seed));

        let mut history = LossHistory::new();
        let result = optimizer.fit_dense_with_callback(&preference, &mut history).unwrap();

        prop_assert!(is_non_increasing(&history.best_losses));
        prop_assert!(result.value <= result.initial_value);
        for loss in &history.losses {
            prop_assert!(result.value <= *loss);
        }
    }

    #[test]
    fn sparse_checkpoint_never_regresses(full in full_matrix(), seed in 0u64..1000) {
        let latent = full.nrows().min(full.ncols());
        let preference = CsrMatrix::from_dense(&full, 0.0);
        let mut optimizer = GradientDescent::new(
            GradientDescentConfig::new()
                .with_latent_factor(latent)
                .with_max_iterations(40),
        )
        .with_initializer(RandomInitializer::new(seed));

        let mut history = LossHistory::new();
        let result = optimizer.fit_sparse_with_callback(&preference, &mut history).unwrap();

        prop_assert!(is_non_increasing(&history.best_losses));
        prop_assert!(result.value <= result.initial_value);
        let pair = &result.point;
        let residual = sparse_residual(&preference, &pair.u, &pair.v).unwrap();
        let recomputed = sparse_rmse(&residual).unwrap();
        prop_assert!((recomputed - result.value).abs() < 1e-9);
    }
}
