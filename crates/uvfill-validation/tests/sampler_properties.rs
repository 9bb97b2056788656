//! Partition and determinism properties of the fold sampler.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uvfill_validation::{fold_bounds, sample_fold};

#[test]
fn test_middle_fold_of_ten() {
    let data: Vec<usize> = (0..10).collect();
    let split = sample_fold(&data, 2, 5).unwrap();
    assert_eq!(split.test, vec![4, 5]);
    assert_eq!(split.train, vec![0, 1, 2, 3, 6, 7, 8, 9]);
}

#[test]
fn test_uneven_folds_drift() {
    let data: Vec<usize> = (0..7).collect();
    let sizes: Vec<usize> = (0..3)
        .map(|fold| sample_fold(&data, fold, 3).unwrap().test.len())
        .collect();
    assert_eq!(sizes, vec![3, 2, 2]);
}

proptest! {
    #[test]
    fn partition_preserves_every_entry(
        data in prop::collection::vec(any::<i32>(), 0..60),
        folds in 2usize..12,
        fold_seed in any::<usize>(),
    ) {
        let fold = fold_seed % folds;
        let split = sample_fold(&data, fold, folds).unwrap();
        let (left, right) = fold_bounds(data.len(), fold, folds).unwrap();

        prop_assert_eq!(split.train.len() + split.test.len(), data.len());
        prop_assert_eq!(&split.test[..], &data[left..right]);

        let mut rebuilt = split.train[..left].to_vec();
        rebuilt.extend_from_slice(&split.test);
        rebuilt.extend_from_slice(&split.train[left..]);
        prop_assert_eq!(rebuilt, data);
    }

    #[test]
    fn repeated_calls_agree(
        data in prop::collection::vec(any::<u16>(), 0..40),
        folds in 2usize..8,
    ) {
        for fold in 0..folds {
            prop_assert_eq!(
                sample_fold(&data, fold, folds).unwrap(),
                sample_fold(&data, fold, folds).unwrap()
            );
        }
    }

    #[test]
    fn held_out_slices_tile_the_data(len in 0usize..100, folds in 2usize..15) {
        let mut expected_left = 0;
        for fold in 0..folds {
            let (left, right) = fold_bounds(len, fold, folds).unwrap();
            prop_assert_eq!(left, expected_left);
            prop_assert!(right >= left);
            expected_left = right;
        }
        prop_assert_eq!(expected_left, len);
    }
}
