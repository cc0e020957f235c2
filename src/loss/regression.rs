//! Regression losses.

use super::Loss;
use crate::utils::dot;

/// Squared error loss: `L = 0.5 · (y − a·w)²`.
///
/// Derivative with respect to the prediction: `−(y − a·w)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredLoss;

impl Loss for SquaredLoss {
    #[inline]
    fn value(&self, w: &[f64], a: &[f64], y: f64) -> f64 {
        let r = y - dot(w, a);
        0.5 * r * r
    }

    #[inline]
    fn derivative(&self, w: &[f64], a: &[f64], y: f64) -> f64 {
        -(y - dot(w, a))
    }

    fn name(&self) -> &'static str {
        "squared"
    }
}
