//! Residuals between observed ratings and the factor-model prediction.
//!
//! A residual is `observed - U[i,:] · V[:,j]`, evaluated only at observed
//! coordinates. The sparse variant keeps the preference matrix's sparsity
//! structure, so unobserved cells are never touched.

use crate::{
    error::{MatrixError, Result},
    matrix::{CsrMatrix, DensePreference},
    types::{DMatrix, Scalar},
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Prediction of cell `(i, j)` from the factor pair.
#[inline]
pub fn predict<T: Scalar>(u: &DMatrix<T>, v: &DMatrix<T>, i: usize, j: usize) -> T {
    (0..u.ncols()).map(|r| u[(i, r)] * v[(r, j)]).sum()
}

/// Verifies that `U (rows × k)` and `V (k × cols)` fit a `rows × cols` matrix.
pub fn check_factor_shapes<T: Scalar>(
    shape: (usize, usize),
    u: &DMatrix<T>,
    v: &DMatrix<T>,
) -> Result<()> {
    let (rows, cols) = shape;
    if u.nrows() != rows || v.ncols() != cols || u.ncols() != v.nrows() {
        return Err(MatrixError::dimension_mismatch(
            format!("U ({rows} x k) and V (k x {cols})"),
            format!(
                "U ({} x {}) and V ({} x {})",
                u.nrows(),
                u.ncols(),
                v.nrows(),
                v.ncols()
            ),
        ));
    }
    Ok(())
}

/// Sparse residual restricted to the stored coordinates of `preference`.
pub fn sparse_residual<T: Scalar>(
    preference: &CsrMatrix<T>,
    u: &DMatrix<T>,
    v: &DMatrix<T>,
) -> Result<CsrMatrix<T>> {
    check_factor_shapes(preference.shape(), u, v)?;

    #[cfg(feature = "parallel")]
    let values: Vec<T> = (0..preference.nrows())
        .into_par_iter()
        .flat_map_iter(|i| {
            preference
                .row_entries(i)
                .map(move |(j, p)| p - predict(u, v, i, j))
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let values: Vec<T> = preference
        .iter()
        .map(|(i, j, p)| p - predict(u, v, i, j))
        .collect();

    preference.with_values(values)
}

/// Dense residual: zero everywhere except at observed coordinates.
pub fn dense_residual<T: Scalar>(
    preference: &DensePreference<T>,
    u: &DMatrix<T>,
    v: &DMatrix<T>,
) -> Result<DMatrix<T>> {
    check_factor_shapes(preference.shape(), u, v)?;

    let mut delta = DMatrix::zeros(preference.nrows(), preference.ncols());
    let values = preference.values();
    for &(i, j) in preference.observed_coordinates() {
        delta[(i, j)] = values[(i, j)] - predict(u, v, i, j);
    }
    Ok(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sparse_residual_keeps_structure() {
        let pref = CsrMatrix::from_triplets(2, 3, &[(0, 0, 5.0), (1, 2, 3.0)]).unwrap();
        let u = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        let v = DMatrix::from_row_slice(1, 3, &[2.0, 7.0, 1.0]);

        let delta = sparse_residual(&pref, &u, &v).unwrap();
        assert_eq!(delta.coordinate_pairs(), pref.coordinate_pairs());
        assert_relative_eq!(delta.get(0, 0).unwrap(), 3.0);
        assert_relative_eq!(delta.get(1, 2).unwrap(), 1.0);
        assert_eq!(delta.get(0, 1), None);
    }

    #[test]
    fn test_dense_residual_ignores_missing_cells() {
        let raw = DMatrix::from_row_slice(2, 2, &[4.0, f64::NAN, 1.0, 2.0]);
        let pref = DensePreference::from_nan_marked(raw);
        let u = DMatrix::from_element(2, 1, 1.0);
        let v = DMatrix::from_element(1, 2, 1.0);

        let delta = dense_residual(&pref, &u, &v).unwrap();
        assert_eq!(delta, DMatrix::from_row_slice(2, 2, &[3.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_incompatible_factors_are_rejected() {
        let pref = CsrMatrix::from_triplets(2, 2, &[(0, 0, 1.0)]).unwrap();
        let u = DMatrix::<f64>::zeros(3, 1);
        let v = DMatrix::<f64>::zeros(1, 2);
        assert!(matches!(
            sparse_residual(&pref, &u, &v),
            Err(MatrixError::DimensionMismatch { .. })
        ));

        let u = DMatrix::<f64>::zeros(2, 2);
        assert!(sparse_residual(&pref, &u, &v).is_err());

        let dense = DensePreference::fully_observed(DMatrix::<f64>::zeros(2, 2));
        assert!(dense_residual(&dense, &u, &v).is_err());
    }
}
