//! Compressed sparse row storage for preference matrices.
//!
//! Every explicitly stored entry counts as an observed rating, including a
//! stored zero. Cells without storage are unobserved and read as zero in
//! dense conversions.

use crate::{
    error::{MatrixError as Error, Result},
    types::{Coordinate, DMatrix, Scalar, Triplet},
};
use num_traits::Float;

/// Compressed Sparse Row (CSR) format matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T: Scalar> {
    /// Number of rows
    nrows: usize,
    /// Number of columns
    ncols: usize,
    /// Row pointers (length nrows + 1)
    row_ptr: Vec<usize>,
    /// Column indices (length nnz), ascending within each row
    col_idx: Vec<usize>,
    /// Stored values (length nnz)
    values: Vec<T>,
}

impl<T: Scalar> CsrMatrix<T> {
    /// Creates a new CSR matrix from raw data.
    pub fn new(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptr.len() != nrows + 1 {
            return Err(Error::dimension_mismatch(
                format!("row_ptr length {}", nrows + 1),
                format!("row_ptr length {}", row_ptr.len()),
            ));
        }

        if row_ptr[0] != 0 || row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::dimension_mismatch(
                "non-decreasing row_ptr starting at 0",
                format!("{row_ptr:?}"),
            ));
        }

        let nnz = row_ptr[nrows];
        if col_idx.len() != nnz {
            return Err(Error::dimension_mismatch(
                format!("col_idx length {nnz}"),
                format!("col_idx length {}", col_idx.len()),
            ));
        }

        if values.len() != nnz {
            return Err(Error::dimension_mismatch(
                format!("values length {nnz}"),
                format!("values length {}", values.len()),
            ));
        }

        if let Some(&j) = col_idx.iter().find(|&&j| j >= ncols) {
            return Err(Error::index_out_of_bounds(j, ncols));
        }

        for i in 0..nrows {
            let row = &col_idx[row_ptr[i]..row_ptr[i + 1]];
            if row.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::dimension_mismatch(
                    format!("strictly ascending column indices in row {i}"),
                    format!("{row:?}"),
                ));
            }
        }

        Ok(Self {
            nrows,
            ncols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Creates an empty matrix of the given shape.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            row_ptr: vec![0; nrows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a CSR matrix from `(row, col, value)` triplets.
    ///
    /// Triplets may come in any order. Duplicate coordinates are summed and
    /// explicit zeros are kept as stored entries.
    pub fn from_triplets(nrows: usize, ncols: usize, triplets: &[Triplet<T>]) -> Result<Self> {
        for &(r, c, _) in triplets {
            if r >= nrows {
                return Err(Error::index_out_of_bounds(r, nrows));
            }
            if c >= ncols {
                return Err(Error::index_out_of_bounds(c, ncols));
            }
        }

        let mut sorted = triplets.to_vec();
        sorted.sort_by_key(|&(r, c, _)| (r, c));

        let mut unique: Vec<Triplet<T>> = Vec::with_capacity(sorted.len());
        for (r, c, v) in sorted {
            if let Some(last) = unique.last_mut() {
                if last.0 == r && last.1 == c {
                    last.2 = last.2 + v;
                    continue;
                }
            }
            unique.push((r, c, v));
        }

        let mut row_ptr = vec![0; nrows + 1];
        for &(r, _, _) in &unique {
            row_ptr[r + 1] += 1;
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }

        Ok(Self {
            nrows,
            ncols,
            row_ptr,
            col_idx: unique.iter().map(|&(_, c, _)| c).collect(),
            values: unique.iter().map(|&(_, _, v)| v).collect(),
        })
    }

    /// Creates a CSR matrix from a dense matrix, storing entries whose
    /// magnitude exceeds `tolerance`.
    pub fn from_dense(dense: &DMatrix<T>, tolerance: T) -> Self {
        let mut row_ptr = vec![0];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        for i in 0..dense.nrows() {
            for j in 0..dense.ncols() {
                let val = dense[(i, j)];
                if Float::abs(val) > tolerance {
                    col_idx.push(j);
                    values.push(val);
                }
            }
            row_ptr.push(col_idx.len());
        }

        Self {
            nrows: dense.nrows(),
            ncols: dense.ncols(),
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Converts to a dense matrix; unstored cells become zero.
    pub fn to_dense(&self) -> DMatrix<T> {
        let mut dense = DMatrix::zeros(self.nrows, self.ncols);
        for (i, j, v) in self.iter() {
            dense[(i, j)] = v;
        }
        dense
    }

    /// Returns the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns `(rows, columns)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Total number of cells implied by the shape, stored or not.
    #[inline]
    pub fn size(&self) -> usize {
        self.nrows * self.ncols
    }

    /// Returns the number of stored elements.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored values in row-major order.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns the stored value at `(i, j)`, or `None` when the cell is unobserved.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i >= self.nrows {
            return None;
        }
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        self.col_idx[start..end]
            .binary_search(&j)
            .ok()
            .map(|k| self.values[start + k])
    }

    /// Extracts row `i` as a `1 × ncols` matrix.
    pub fn row(&self, i: usize) -> Result<Self> {
        if i >= self.nrows {
            return Err(Error::index_out_of_bounds(i, self.nrows));
        }
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        Ok(Self {
            nrows: 1,
            ncols: self.ncols,
            row_ptr: vec![0, end - start],
            col_idx: self.col_idx[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Iterates over stored entries as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Triplet<T>> + '_ {
        (0..self.nrows).flat_map(move |i| {
            (self.row_ptr[i]..self.row_ptr[i + 1])
                .map(move |k| (i, self.col_idx[k], self.values[k]))
        })
    }

    /// Iterates over the stored entries of row `i` as `(col, value)`.
    pub fn row_entries(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = if i < self.nrows {
            self.row_ptr[i]..self.row_ptr[i + 1]
        } else {
            0..0
        };
        range.map(move |k| (self.col_idx[k], self.values[k]))
    }

    /// Coordinates of the stored entries, as parallel row and column lists.
    pub fn coordinates(&self) -> (Vec<usize>, Vec<usize>) {
        self.iter().map(|(i, j, _)| (i, j)).unzip()
    }

    /// Coordinates of the stored entries as pairs.
    pub fn coordinate_pairs(&self) -> Vec<Coordinate> {
        self.iter().map(|(i, j, _)| (i, j)).collect()
    }

    /// Returns a matrix with the same sparsity structure and new values.
    pub fn with_values(&self, values: Vec<T>) -> Result<Self> {
        if values.len() != self.nnz() {
            return Err(Error::dimension_mismatch(
                format!("{} values", self.nnz()),
                format!("{} values", values.len()),
            ));
        }
        Ok(Self {
            values,
            ..self.clone()
        })
    }

    /// Sparse-dense product `A · B`.
    pub fn mul_dense(&self, rhs: &DMatrix<T>) -> Result<DMatrix<T>> {
        if rhs.nrows() != self.ncols {
            return Err(Error::dimension_mismatch(
                format!("right operand with {} rows", self.ncols),
                format!("right operand with {} rows", rhs.nrows()),
            ));
        }

        let mut out = DMatrix::zeros(self.nrows, rhs.ncols());
        for (i, j, v) in self.iter() {
            for c in 0..rhs.ncols() {
                out[(i, c)] += v * rhs[(j, c)];
            }
        }
        Ok(out)
    }

    /// Transposed sparse-dense product `Aᵀ · B`.
    pub fn transpose_mul_dense(&self, rhs: &DMatrix<T>) -> Result<DMatrix<T>> {
        if rhs.nrows() != self.nrows {
            return Err(Error::dimension_mismatch(
                format!("right operand with {} rows", self.nrows),
                format!("right operand with {} rows", rhs.nrows()),
            ));
        }

        let mut out = DMatrix::zeros(self.ncols, rhs.ncols());
        for (i, j, v) in self.iter() {
            for c in 0..rhs.ncols() {
                out[(j, c)] += v * rhs[(i, c)];
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn sample() -> CsrMatrix<f64> {
        CsrMatrix::from_triplets(
            3,
            3,
            &[(2, 2, 5.0), (0, 2, 2.0), (1, 1, 3.0), (0, 0, 1.0), (2, 0, 4.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_csr_from_dense() {
        let dense = DMatrix::from_row_slice(3, 3, &[
            1.0, 0.0, 2.0,
            0.0, 3.0, 0.0,
            4.0, 0.0, 5.0,
        ]);

        let csr = CsrMatrix::from_dense(&dense, 1e-10);
        assert_eq!(csr.nnz(), 5);
        assert_eq!(csr, sample());
        assert_eq!(csr.to_dense(), dense);
    }

    #[test]
    fn test_triplets_are_sorted_and_summed() {
        let csr = CsrMatrix::from_triplets(2, 3, &[(1, 2, 1.0), (0, 1, 2.0), (1, 2, 0.5)]).unwrap();
        assert_eq!(csr.nnz(), 2);
        assert_eq!(csr.get(1, 2), Some(1.5));
        assert_eq!(csr.iter().collect::<Vec<_>>(), vec![(0, 1, 2.0), (1, 2, 1.5)]);
    }

    #[test]
    fn test_stored_zero_is_observed() {
        let csr = CsrMatrix::from_triplets(1, 3, &[(0, 1, 0.0)]).unwrap();
        assert_eq!(csr.nnz(), 1);
        assert_eq!(csr.get(0, 1), Some(0.0));
        assert_eq!(csr.get(0, 0), None);
    }

    #[test]
    fn test_triplet_out_of_bounds() {
        let err = CsrMatrix::from_triplets(2, 2, &[(0, 2, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfBounds { index: 2, bound: 2 }));
    }

    #[test]
    fn test_new_validates_structure() {
        assert!(CsrMatrix::new(2, 2, vec![0, 1], vec![0], vec![1.0]).is_err());
        assert!(CsrMatrix::new(1, 2, vec![0, 2], vec![1, 0], vec![1.0, 2.0]).is_err());
        assert!(CsrMatrix::new(1, 2, vec![0, 1], vec![3], vec![1.0]).is_err());
        assert!(CsrMatrix::new(1, 2, vec![0, 2], vec![0, 1], vec![1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_row_extraction() {
        let row = sample().row(2).unwrap();
        assert_eq!(row.shape(), (1, 3));
        assert_eq!(row.coordinates(), (vec![0, 0], vec![0, 2]));
        assert_eq!(row.values(), &[4.0, 5.0]);
        assert!(sample().row(3).is_err());
    }

    #[test]
    fn test_products_match_dense() {
        let csr = sample();
        let dense = csr.to_dense();
        let rhs = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let product = csr.mul_dense(&rhs).unwrap();
        let expected = &dense * &rhs;
        for (a, b) in product.iter().zip(expected.iter()) {
            assert_relative_eq!(a, b);
        }

        let product = csr.transpose_mul_dense(&rhs).unwrap();
        let expected = dense.transpose() * &rhs;
        for (a, b) in product.iter().zip(expected.iter()) {
            assert_relative_eq!(a, b);
        }

        assert!(csr.mul_dense(&DMatrix::zeros(2, 2)).is_err());
    }
}
