//! L1 (lasso) proximal operator.

use super::Prox;

/// Proximal operator of `||x||₁`: coordinatewise soft thresholding.
///
/// The regularization strength is carried by the step size; the solvers pass
/// `beta · step`.
#[derive(Debug, Clone, Copy, Default)]
pub struct L1;

impl Prox for L1 {
    #[inline]
    fn prox(&self, step_size: f64, x: &mut [f64]) {
        for v in x.iter_mut() {
            *v = soft_threshold(*v, step_size);
        }
    }

    fn name(&self) -> &'static str {
        "l1"
    }
}

/// Soft-thresholding operator.
///
/// S(x, λ) = sign(x) × max(|x| − λ, 0)
#[inline]
pub fn soft_threshold(x: f64, threshold: f64) -> f64 {
    if x > threshold {
        x - threshold
    } else if x < -threshold {
        x + threshold
    } else {
        0.0
    }
}
