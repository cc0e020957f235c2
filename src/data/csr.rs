//! Compressed Sparse Row (CSR) matrix for row-wise access.
//!
//! CSR is the natural layout for SAGA on sparse data: every inner step visits
//! one sample and needs only that sample's nonzero columns and values.

use super::dense::RowMatrix;
use super::traits::DataMatrix;
use crate::error::SagaError;

/// Compressed Sparse Row matrix.
///
/// # Structure
///
/// - `values`: Non-zero values, stored row by row
/// - `col_indices`: Column index for each value
/// - `row_ptrs`: Starting index in values/col_indices for each row
///
/// For row `i`, the values are `values[row_ptrs[i]..row_ptrs[i+1]]`
/// with corresponding columns `col_indices[row_ptrs[i]..row_ptrs[i+1]]`.
///
/// # Example
///
/// ```
/// use saga_rs::data::{CsrMatrix, RowMatrix};
///
/// let dense = RowMatrix::from_vec(vec![
///     1.0, 0.0, 2.0,
///     0.0, 3.0, 0.0,
/// ], 2, 3);
///
/// let csr = CsrMatrix::from_dense(&dense);
/// let row0 = csr.row(0);
/// assert_eq!(row0.indices, &[0, 2]);
/// assert_eq!(row0.values, &[1.0, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Non-zero values stored row by row.
    values: Box<[f64]>,
    /// Column index for each value.
    col_indices: Box<[u32]>,
    /// Row pointers: row_ptrs[i] is the start index for row i.
    /// Length is num_rows + 1, with row_ptrs[num_rows] = nnz.
    row_ptrs: Box<[u32]>,
    num_rows: usize,
    num_cols: usize,
}

/// Borrowed view of one CSR row.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    /// Column indices of the stored entries.
    pub indices: &'a [u32],
    /// Stored values, aligned with `indices`.
    pub values: &'a [f64],
}

impl SparseRow<'_> {
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate over (column, value) pairs.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices
            .iter()
            .zip(self.values)
            .map(|(&j, &v)| (j as usize, v))
    }
}

impl CsrMatrix {
    /// Create a CSR matrix from a dense matrix, dropping exact zeros.
    ///
    /// # Panics
    ///
    /// Panics if the column count or the number of nonzeros exceeds
    /// `u32::MAX`.
    pub fn from_dense(dense: &RowMatrix) -> Self {
        let num_rows = dense.num_rows();
        let num_cols = dense.num_cols();
        assert!(
            u32::try_from(num_cols).is_ok(),
            "{} columns do not fit in u32 column indices",
            num_cols
        );

        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0u32);

        for row in 0..num_rows {
            for (col, &val) in dense.row_slice(row).iter().enumerate() {
                if val != 0.0 {
                    values.push(val);
                    col_indices.push(col as u32);
                }
            }
            match u32::try_from(values.len()) {
                Ok(end) => row_ptrs.push(end),
                Err(_) => panic!("more than u32::MAX nonzeros at row {}", row),
            }
        }

        Self {
            values: values.into_boxed_slice(),
            col_indices: col_indices.into_boxed_slice(),
            row_ptrs: row_ptrs.into_boxed_slice(),
            num_rows,
            num_cols,
        }
    }

    /// Create from raw CSR arrays, validating their structure.
    ///
    /// Requirements:
    /// - `row_ptrs.len() == num_rows + 1` and `row_ptrs[0] == 0`
    /// - `row_ptrs` is non-decreasing and ends at `values.len()`
    /// - `col_indices.len() == values.len()`
    /// - every column index is `< num_cols`
    /// - no column index repeats within a row
    pub fn try_new(
        values: Vec<f64>,
        col_indices: Vec<u32>,
        row_ptrs: Vec<u32>,
        num_rows: usize,
        num_cols: usize,
    ) -> Result<Self, SagaError> {
        SagaError::check_len("CSR row pointers", num_rows + 1, row_ptrs.len())?;
        SagaError::check_len("CSR column indices", values.len(), col_indices.len())?;

        if row_ptrs[0] != 0 {
            return Err(SagaError::InvalidMatrix(format!(
                "first row pointer must be 0, got {}",
                row_ptrs[0]
            )));
        }
        if let Some(i) = row_ptrs.windows(2).position(|w| w[0] > w[1]) {
            return Err(SagaError::InvalidMatrix(format!(
                "row pointers decrease at row {i}"
            )));
        }
        let nnz = row_ptrs[num_rows] as usize;
        if nnz != values.len() {
            return Err(SagaError::InvalidMatrix(format!(
                "last row pointer is {nnz} but {} values are stored",
                values.len()
            )));
        }
        if let Some(&j) = col_indices.iter().find(|&&j| j as usize >= num_cols) {
            return Err(SagaError::InvalidMatrix(format!(
                "column index {j} out of range for {num_cols} columns"
            )));
        }
        // seen[j] = 1 + last row that stored column j
        let mut seen = vec![0usize; num_cols];
        for (i, w) in row_ptrs.windows(2).enumerate() {
            for &j in &col_indices[w[0] as usize..w[1] as usize] {
                let slot = &mut seen[j as usize];
                if *slot == i + 1 {
                    return Err(SagaError::InvalidMatrix(format!(
                        "column {j} stored twice in row {i}"
                    )));
                }
                *slot = i + 1;
            }
        }

        Ok(Self {
            values: values.into_boxed_slice(),
            col_indices: col_indices.into_boxed_slice(),
            row_ptrs: row_ptrs.into_boxed_slice(),
            num_rows,
            num_cols,
        })
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Number of stored (non-zero) elements.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Density: ratio of stored elements to total elements.
    pub fn density(&self) -> f64 {
        let total = self.num_rows * self.num_cols;
        if total == 0 {
            return 1.0;
        }
        self.nnz() as f64 / total as f64
    }

    /// View of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    #[inline]
    pub fn row(&self, row: usize) -> SparseRow<'_> {
        assert!(row < self.num_rows, "Row {} out of bounds", row);
        let start = self.row_ptrs[row] as usize;
        let end = self.row_ptrs[row + 1] as usize;
        SparseRow {
            indices: &self.col_indices[start..end],
            values: &self.values[start..end],
        }
    }

    /// Largest number of stored entries in any row.
    pub fn max_row_nnz(&self) -> usize {
        self.row_ptrs
            .windows(2)
            .map(|w| (w[1] - w[0]) as usize)
            .max()
            .unwrap_or(0)
    }

    /// Expand to a dense row-major matrix.
    pub fn to_dense(&self) -> RowMatrix {
        let mut data = vec![0.0; self.num_rows * self.num_cols];
        for i in 0..self.num_rows {
            for (j, v) in self.row(i).iter() {
                data[i * self.num_cols + j] += v;
            }
        }
        RowMatrix::from_vec(data, self.num_rows, self.num_cols)
    }
}

impl DataMatrix for CsrMatrix {
    #[inline]
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    fn num_features(&self) -> usize {
        self.num_cols
    }

    #[inline]
    fn row_norm_sq(&self, i: usize) -> f64 {
        self.row(i).values.iter().map(|v| v * v).sum()
    }
}
