//! Root-mean-square error metrics.
//!
//! All three variants divide by the total element count of the matrix shape,
//! not by the number of observed entries. On sparse data this understates the
//! per-rating error as sparsity grows; the convention is kept so losses stay
//! comparable across dense and sparse runs.

use crate::{
    error::{MatrixError, Result},
    matrix::CsrMatrix,
    types::{DMatrix, Scalar},
};
use num_traits::Float;

fn element_count<T: Scalar>(size: usize) -> Result<T> {
    if size == 0 {
        return Err(MatrixError::degenerate_input(
            "root-mean-square error over a matrix with no elements",
        ));
    }
    Ok(<T as Scalar>::from_usize(size))
}

/// RMSE between two dense matrices over every element.
///
/// Both matrices must be free of missing markers; matrices with unobserved
/// cells go through [`rmse_from_residual`] instead.
pub fn rmse<T: Scalar>(observed: &DMatrix<T>, estimate: &DMatrix<T>) -> Result<T> {
    if observed.shape() != estimate.shape() {
        return Err(MatrixError::dimension_mismatch(
            format!("{:?}", observed.shape()),
            format!("{:?}", estimate.shape()),
        ));
    }
    let n = element_count::<T>(observed.len())?;
    let total: T = observed
        .iter()
        .zip(estimate.iter())
        .map(|(&a, &b)| (a - b) * (a - b))
        .sum();
    Ok(Float::sqrt(total / n))
}

/// RMSE of a dense residual matrix, averaged over its full size.
pub fn rmse_from_residual<T: Scalar>(delta: &DMatrix<T>) -> Result<T> {
    let n = element_count::<T>(delta.len())?;
    let total: T = delta.iter().map(|&d| d * d).sum();
    Ok(Float::sqrt(total / n))
}

/// RMSE of a sparse residual: squares are summed over stored entries only,
/// then divided by the shape-based element count.
pub fn sparse_rmse<T: Scalar>(delta: &CsrMatrix<T>) -> Result<T> {
    let n = element_count::<T>(delta.size())?;
    let total: T = delta.values().iter().map(|&d| d * d).sum();
    Ok(Float::sqrt(total / n))
}
