//! ndarray interop for design matrices.
//!
//! Arrays are interpreted as `[n_samples, n_features]`. Any memory order is
//! accepted; the data is copied into row-major storage.

use ::ndarray::{Array2, ArrayView2};

use super::csr::CsrMatrix;
use super::dense::RowMatrix;

impl From<ArrayView2<'_, f64>> for RowMatrix {
    fn from(view: ArrayView2<'_, f64>) -> Self {
        let (num_rows, num_cols) = view.dim();
        // iter() walks in logical (row-major) order regardless of strides
        let data: Vec<f64> = view.iter().copied().collect();
        RowMatrix::from_vec(data, num_rows, num_cols)
    }
}

impl From<&Array2<f64>> for RowMatrix {
    fn from(array: &Array2<f64>) -> Self {
        RowMatrix::from(array.view())
    }
}

impl From<ArrayView2<'_, f64>> for CsrMatrix {
    fn from(view: ArrayView2<'_, f64>) -> Self {
        CsrMatrix::from_dense(&RowMatrix::from(view))
    }
}

impl RowMatrix {
    /// Copy into an owned `[n_samples, n_features]` array.
    pub fn to_array(&self) -> Array2<f64> {
        let data = self.as_slice();
        let num_cols = self.num_cols();
        Array2::from_shape_fn((self.num_rows(), num_cols), |(i, j)| data[i * num_cols + j])
    }
}
