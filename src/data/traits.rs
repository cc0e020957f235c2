//! Core trait for design matrix access.

/// Shape and row statistics shared by dense and sparse design matrices.
pub trait DataMatrix {
    /// Number of rows (samples).
    fn num_rows(&self) -> usize;

    /// Number of columns (features).
    fn num_features(&self) -> usize;

    /// Squared Euclidean norm of row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= num_rows()`.
    fn row_norm_sq(&self, i: usize) -> f64;

    /// Largest squared row norm, `max_i ||a_i||²`.
    ///
    /// This bounds the Lipschitz constant of every per-sample squared loss.
    /// Returns `0.0` for a matrix without rows.
    fn max_row_norm_sq(&self) -> f64 {
        (0..self.num_rows())
            .map(|i| self.row_norm_sq(i))
            .fold(0.0, f64::max)
    }
}
