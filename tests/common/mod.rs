//! Shared setup for integration tests.
//!
//! For data generators, use `saga_rs::testing`.

#![allow(dead_code)]

use saga_rs::{SagaParams, Verbosity};

/// Silent parameters with the given step size.
pub fn params(step_size: f64) -> SagaParams {
    SagaParams {
        step_size: Some(step_size),
        verbosity: Verbosity::Silent,
        ..Default::default()
    }
}

/// Largest absolute coordinate difference.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "length mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Assert two vectors agree coordinatewise within `tol`.
pub fn assert_vec_close(actual: &[f64], expected: &[f64], tol: f64) {
    let diff = max_abs_diff(actual, expected);
    assert!(
        diff <= tol,
        "vectors differ by {diff:.3e} (tol {tol:.1e})\n  actual:   {actual:?}\n  expected: {expected:?}"
    );
}
