//! Dense row-major design matrix.

use super::traits::DataMatrix;

/// Dense matrix with row-major storage.
///
/// Row `i` occupies `data[i * num_cols..(i + 1) * num_cols]`, so a sample is a
/// contiguous slice and the dense epoch engine can hand it straight to the
/// loss.
///
/// # Example
///
/// ```
/// use saga_rs::data::RowMatrix;
///
/// let m = RowMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
/// assert_eq!(m.row_slice(1), &[4.0, 5.0, 6.0]);
/// assert_eq!(m.get(0, 2), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RowMatrix {
    data: Box<[f64]>,
    num_rows: usize,
    num_cols: usize,
}

impl RowMatrix {
    /// Create a dense matrix from a Vec in row-major order, taking ownership.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != num_rows * num_cols`.
    pub fn from_vec(data: Vec<f64>, num_rows: usize, num_cols: usize) -> Self {
        assert_eq!(
            data.len(),
            num_rows * num_cols,
            "Data length {} does not match dimensions {}x{}",
            data.len(),
            num_rows,
            num_cols
        );
        Self {
            data: data.into_boxed_slice(),
            num_rows,
            num_cols,
        }
    }

    /// Build from a slice of equal-length rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        let num_cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * num_cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(
                row.len(),
                num_cols,
                "Row {} has length {}, expected {}",
                i,
                row.len(),
                num_cols
            );
            data.extend_from_slice(row);
        }
        Self::from_vec(data, rows.len(), num_cols)
    }

    /// Underlying row-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Element at (row, col), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.num_rows || col >= self.num_cols {
            return None;
        }
        Some(self.data[row * self.num_cols + col])
    }

    /// Contiguous slice of row `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= num_rows`.
    #[inline]
    pub fn row_slice(&self, row: usize) -> &[f64] {
        assert!(row < self.num_rows, "Row {} out of bounds", row);
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        // chunks_exact(0) panics, an empty matrix yields no rows
        let chunk = self.num_cols.max(1);
        let n = if self.num_cols == 0 { 0 } else { self.num_rows };
        self.data.chunks_exact(chunk).take(n)
    }

    /// `A·x`, one dot product per row.
    pub fn matvec(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(x.len(), self.num_cols, "Vector length does not match columns");
        (0..self.num_rows)
            .map(|i| crate::utils::dot(self.row_slice(i), x))
            .collect()
    }
}

impl DataMatrix for RowMatrix {
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
        self.row_slice(i).iter().map(|v| v * v).sum()
    }
}
