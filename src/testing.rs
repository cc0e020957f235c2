//! Synthetic problems for tests and benchmarks.
//!
//! Every generator takes an explicit seed and is fully deterministic.
//!
//! ```
//! use saga_rs::testing::{random_row_matrix, linear_targets};
//!
//! let a = random_row_matrix(50, 4, 1);
//! let b = linear_targets(&a, &[1.0, -1.0, 0.5, 0.0]);
//! assert_eq!(b.len(), 50);
//! ```

use rand::prelude::*;

use crate::data::{CsrMatrix, RowMatrix};

/// Dense matrix with entries uniform in `[-1, 1]`.
pub fn random_row_matrix(rows: usize, cols: usize, seed: u64) -> RowMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows * cols)
        .map(|_| rng.gen_range(-1.0..=1.0))
        .collect();
    RowMatrix::from_vec(data, rows, cols)
}

/// Sparse matrix where every entry is stored with probability `density`.
///
/// Stored values are uniform in `[0.5, 1.5]` with a random sign, so no stored
/// entry is zero.
pub fn random_csr_matrix(rows: usize, cols: usize, density: f64, seed: u64) -> CsrMatrix {
    assert!((0.0..=1.0).contains(&density));
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows * cols)
        .map(|_| {
            if rng.gen_bool(density) {
                let magnitude: f64 = rng.gen_range(0.5..=1.5);
                if rng.gen_bool(0.5) {
                    magnitude
                } else {
                    -magnitude
                }
            } else {
                0.0
            }
        })
        .collect();
    CsrMatrix::from_dense(&RowMatrix::from_vec(data, rows, cols))
}

/// Noise-free regression targets `b = A·w`.
pub fn linear_targets(a: &RowMatrix, weights: &[f64]) -> Vec<f64> {
    a.matvec(weights)
}

/// Labels in {−1, +1}: the sign of `A·w`, flipped with probability `flip`.
pub fn logistic_labels(a: &RowMatrix, weights: &[f64], flip: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    a.matvec(weights)
        .into_iter()
        .map(|margin| {
            let label = if margin >= 0.0 { 1.0 } else { -1.0 };
            if flip > 0.0 && rng.gen_bool(flip) {
                -label
            } else {
                label
            }
        })
        .collect()
}

/// Small well-conditioned least-squares problem with a known solution.
///
/// Returns `(A, b, x_star)` with `b = A·x_star` exactly representable.
pub fn least_squares_problem(rows: usize) -> (RowMatrix, Vec<f64>, Vec<f64>) {
    let data: Vec<[f64; 3]> = (0..rows)
        .map(|i| {
            [
                1.0,
                (i % 5) as f64 - 2.0,
                ((i * 3) % 7) as f64 / 3.0 - 1.0,
            ]
        })
        .collect();
    let a = RowMatrix::from_rows(&data);
    let x_star = vec![1.0, -2.0, 0.5];
    let b = a.matvec(&x_star);
    (a, b, x_star)
}
