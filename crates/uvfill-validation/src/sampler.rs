//! Deterministic k-way partitioning of ordered data.
//!
//! Fold `f` of `k` holds out the contiguous slice `data[left..right]` with
//!
//! ```text
//! length = len / k            (real-valued)
//! left   = ceil(f * length)
//! right  = ceil(f * length + length)
//! ```
//!
//! When `len` is not a multiple of `k` the boundaries drift, so fold sizes
//! can differ by one. The ceilings are taken over the exact rationals
//! `f · len / k`, so adjacent folds always share a boundary and the folds
//! tile the data exactly.

use uvfill_core::error::{OptimizerError, OptimizerResult};

/// A train/test split of an ordered list.
///
/// `test` is a contiguous slice of the input and `train` is everything else,
/// both in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldPartition<I> {
    /// Entries kept for fitting
    pub train: Vec<I>,
    /// Held-out entries
    pub test: Vec<I>,
}

fn check_fold(fold: usize, folds: usize) -> OptimizerResult<()> {
    if folds < 2 {
        return Err(OptimizerError::invalid_configuration(
            "must be at least 2",
            "folds",
            folds.to_string(),
        ));
    }
    if fold >= folds {
        return Err(OptimizerError::invalid_configuration(
            format!("must be below the fold count {folds}"),
            "fold",
            fold.to_string(),
        ));
    }
    Ok(())
}

/// `ceil(fold · len / folds)`
fn boundary(len: usize, fold: usize, folds: usize) -> usize {
    (fold * len).div_ceil(folds)
}

/// Half-open bounds `[left, right)` of the held-out slice for `fold`.
pub fn fold_bounds(len: usize, fold: usize, folds: usize) -> OptimizerResult<(usize, usize)> {
    check_fold(fold, folds)?;
    Ok((boundary(len, fold, folds), boundary(len, fold + 1, folds)))
}

/// Splits `data` into the held-out slice for `fold` and the remainder.
///
/// # Examples
///
/// ```rust
/// use uvfill_validation::sample_fold;
///
/// let data: Vec<u32> = (0..10).collect();
/// let split = sample_fold(&data, 2, 5).unwrap();
/// assert_eq!(split.test, vec![4, 5]);
/// assert_eq!(split.train, vec![0, 1, 2, 3, 6, 7, 8, 9]);
/// ```
pub fn sample_fold<I: Clone>(
    data: &[I],
    fold: usize,
    folds: usize,
) -> OptimizerResult<FoldPartition<I>> {
    let (left, right) = fold_bounds(data.len(), fold, folds)?;
    let mut train = Vec::with_capacity(data.len() - (right - left));
    train.extend_from_slice(&data[..left]);
    train.extend_from_slice(&data[right..]);
    Ok(FoldPartition {
        train,
        test: data[left..right].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bounds_tile_the_data() {
        let bounds: Vec<_> = (0..4).map(|f| fold_bounds(10, f, 4).unwrap()).collect();
        assert_eq!(bounds, vec![(0, 3), (3, 5), (5, 8), (8, 10)]);
    }

    #[test]
    fn test_more_folds_than_entries() {
        let data = [7, 8];
        let sizes: Vec<usize> = (0..5)
            .map(|f| sample_fold(&data, f, 5).unwrap().test.len())
            .collect();
        assert_eq!(sizes.iter().sum::<usize>(), 2);
        assert!(sizes.contains(&0));
    }

    #[test]
    fn test_empty_data() {
        let split = sample_fold::<i32>(&[], 0, 3).unwrap();
        assert!(split.train.is_empty());
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_invalid_folds() {
        assert!(matches!(
            sample_fold(&[1, 2, 3], 0, 1),
            Err(OptimizerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            sample_fold(&[1, 2, 3], 3, 3),
            Err(OptimizerError::InvalidConfiguration { .. })
        ));
    }
}
