//! Per-feature debiasing weights for sparse data.

use crate::data::CsrMatrix;

/// Inverse observation frequency of every feature.
///
/// `d[j] = n_samples / (#rows with a stored entry in column j)`, or `0` for a
/// column with no stored entry. Multiplying a sparse update by `d` makes it
/// an unbiased estimate of the corresponding dense update.
///
/// ```
/// use saga_rs::data::{CsrMatrix, RowMatrix};
/// use saga_rs::debiasing_vector;
///
/// let a = CsrMatrix::from_dense(&RowMatrix::from_rows(&[
///     [1.0, 0.0, 0.0],
///     [2.0, 3.0, 0.0],
/// ]));
/// assert_eq!(debiasing_vector(&a), vec![1.0, 2.0, 0.0]);
/// ```
pub fn debiasing_vector(a: &CsrMatrix) -> Vec<f64> {
    let mut counts = vec![0usize; a.num_cols()];
    for i in 0..a.num_rows() {
        for &j in a.row(i).indices {
            counts[j as usize] += 1;
        }
    }
    let n_samples = a.num_rows() as f64;
    counts
        .into_iter()
        .map(|c| if c == 0 { 0.0 } else { n_samples / c as f64 })
        .collect()
}
