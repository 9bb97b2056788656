//! Dense preference matrices with an explicit observed mask.
//!
//! Missing ratings are tracked by a boolean mask kept alongside the value
//! buffer, so no NaN ever enters the arithmetic of the optimizer. Matrices
//! carrying NaN sentinels are converted once through
//! [`DensePreference::from_nan_marked`].

use crate::{
    error::{MatrixError, Result},
    types::{Coordinate, DMatrix, Scalar},
};
use num_traits::Float;

/// A dense users × items rating matrix where some cells are unobserved.
#[derive(Debug, Clone, PartialEq)]
pub struct DensePreference<T: Scalar> {
    /// Ratings; unobserved cells hold zero.
    values: DMatrix<T>,
    /// `true` where a rating is known.
    mask: DMatrix<bool>,
    /// Observed coordinates in row-major order, derived once at construction.
    observed: Vec<Coordinate>,
}

impl<T: Scalar> DensePreference<T> {
    /// Builds a preference matrix from a buffer using NaN as the missing marker.
    pub fn from_nan_marked(mut values: DMatrix<T>) -> Self {
        let mask = values.map(|v| !Float::is_nan(v));
        for (cell, &known) in values.iter_mut().zip(mask.iter()) {
            if !known {
                *cell = T::zero();
            }
        }
        Self::assemble(values, mask)
    }

    /// Builds a preference matrix from row-major optional cells.
    pub fn from_options<I>(nrows: usize, ncols: usize, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let cells: Vec<Option<T>> = cells.into_iter().collect();
        if cells.len() != nrows * ncols {
            return Err(MatrixError::dimension_mismatch(
                format!("{} cells for a {nrows}x{ncols} matrix", nrows * ncols),
                format!("{} cells", cells.len()),
            ));
        }

        let values = DMatrix::from_row_iterator(
            nrows,
            ncols,
            cells.iter().map(|c| c.unwrap_or_else(T::zero)),
        );
        let mask = DMatrix::from_row_iterator(nrows, ncols, cells.iter().map(Option::is_some));
        Ok(Self::assemble(values, mask))
    }

    /// Builds a preference matrix in which every cell is observed.
    pub fn fully_observed(values: DMatrix<T>) -> Self {
        let mask = DMatrix::from_element(values.nrows(), values.ncols(), true);
        Self::assemble(values, mask)
    }

    fn assemble(values: DMatrix<T>, mask: DMatrix<bool>) -> Self {
        let mut observed = Vec::new();
        for i in 0..values.nrows() {
            for j in 0..values.ncols() {
                if mask[(i, j)] {
                    observed.push((i, j));
                }
            }
        }
        Self {
            values,
            mask,
            observed,
        }
    }

    /// Returns the number of rows (users).
    #[inline]
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Returns the number of columns (items).
    #[inline]
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Returns `(rows, columns)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Total number of cells, observed or not.
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Returns the rating at `(i, j)` if it is observed.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        match self.mask.get((i, j)) {
            Some(true) => Some(self.values[(i, j)]),
            _ => None,
        }
    }

    /// Whether the cell `(i, j)` holds a known rating.
    pub fn is_observed(&self, i: usize, j: usize) -> bool {
        self.mask.get((i, j)).copied().unwrap_or(false)
    }

    /// Observed coordinates in row-major order.
    #[inline]
    pub fn observed_coordinates(&self) -> &[Coordinate] {
        &self.observed
    }

    /// Number of observed cells.
    #[inline]
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// The value buffer; unobserved cells read as zero.
    #[inline]
    pub fn values(&self) -> &DMatrix<T> {
        &self.values
    }

    /// Mean of the observed ratings, or zero when nothing is observed.
    pub fn observed_mean(&self) -> T {
        if self.observed.is_empty() {
            return T::zero();
        }
        let total: T = self.observed.iter().map(|&c| self.values[c]).sum();
        total / <T as Scalar>::from_usize(self.observed.len())
    }

    /// Converts back to the NaN-marked representation.
    pub fn to_nan_marked(&self) -> DMatrix<T> {
        self.values
            .zip_map(&self.mask, |v, known| if known { v } else { <T as Float>::nan() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nan_cells_become_unobserved() {
        let raw = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, 3.0, 4.0]);
        let pref = DensePreference::from_nan_marked(raw);

        assert_eq!(pref.observed_coordinates(), &[(0, 0), (1, 0), (1, 1)]);
        assert_eq!(pref.get(0, 1), None);
        assert_eq!(pref.values()[(0, 1)], 0.0);
        assert!(pref.values().iter().all(|v| v.is_finite()));
        assert!(pref.to_nan_marked()[(0, 1)].is_nan());
    }

    #[test]
    fn test_from_options_checks_cell_count() {
        let err = DensePreference::<f64>::from_options(2, 2, vec![Some(1.0); 3]).unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { .. }));

        let pref = DensePreference::from_options(1, 3, vec![Some(2.0), None, Some(4.0)]).unwrap();
        assert_eq!(pref.observed_count(), 2);
        assert_relative_eq!(pref.observed_mean(), 3.0);
    }

    #[test]
    fn test_out_of_range_cells_are_unobserved() {
        let pref = DensePreference::fully_observed(DMatrix::<f64>::zeros(2, 2));
        assert!(pref.is_observed(1, 1));
        assert!(!pref.is_observed(2, 0));
        assert_eq!(pref.get(5, 5), None);
        assert_eq!(pref.size(), 4);
    }
}
