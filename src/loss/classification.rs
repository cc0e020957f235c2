//! Classification losses.

use super::Loss;
use crate::utils::dot;

/// Logistic loss for labels in {−1, +1}: `L = log(1 + exp(−y · a·w))`.
///
/// Derivative with respect to the prediction: `(σ(y · a·w) − 1) · y`.
/// Both are evaluated on the branch that keeps `exp` from overflowing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLoss;

impl Loss for LogisticLoss {
    #[inline]
    fn value(&self, w: &[f64], a: &[f64], y: f64) -> f64 {
        let margin = y * dot(w, a);
        if margin > 0.0 {
            (-margin).exp().ln_1p()
        } else {
            -margin + margin.exp().ln_1p()
        }
    }

    #[inline]
    fn derivative(&self, w: &[f64], a: &[f64], y: f64) -> f64 {
        let margin = y * dot(w, a);
        let phi = if margin > 0.0 {
            1.0 / (1.0 + (-margin).exp())
        } else {
            let e = margin.exp();
            e / (1.0 + e)
        };
        (phi - 1.0) * y
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}
