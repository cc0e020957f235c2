//! Per-sample loss functions for linear models.
//!
//! A [`Loss`] evaluates one term of the finite sum
//!
//! ```text
//! f(x) = (1/n) Σ_i loss(a_i·x, b_i)
//! ```
//!
//! given the weights, one data row and its target. The epoch engines only call
//! [`Loss::derivative`] on the hot path; [`Loss::value`] is used for the
//! objective trace.
//!
//! The sparse engine passes the weights *gathered* at the row's nonzero
//! columns together with the row's stored values, so `w` and `a` always have
//! the same length and an implementation should only ever use them through
//! elementwise products.
//!
//! # Available Losses
//!
//! - [`SquaredLoss`]: `0.5 · (b − a·x)²`
//! - [`LogisticLoss`]: `log(1 + exp(−b · a·x))`, labels in {−1, +1}

mod classification;
mod regression;

use std::fmt;
use std::str::FromStr;

pub use classification::LogisticLoss;
pub use regression::SquaredLoss;

use crate::error::SagaError;

/// Scalar loss of a linear prediction.
///
/// `derivative` is the derivative of the loss with respect to the linear
/// prediction `a·w`; the gradient with respect to `w` is `derivative · a`.
pub trait Loss: Send + Sync {
    /// Loss value for one sample.
    fn value(&self, w: &[f64], a: &[f64], y: f64) -> f64;

    /// Derivative of the loss with respect to `a·w`.
    fn derivative(&self, w: &[f64], a: &[f64], y: f64) -> f64;

    /// Loss name for logging.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<L: Loss + ?Sized> Loss for &L {
    #[inline]
    fn value(&self, w: &[f64], a: &[f64], y: f64) -> f64 {
        (**self).value(w, a, y)
    }

    #[inline]
    fn derivative(&self, w: &[f64], a: &[f64], y: f64) -> f64 {
        (**self).derivative(w, a, y)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<L: Loss + ?Sized> Loss for Box<L> {
    #[inline]
    fn value(&self, w: &[f64], a: &[f64], y: f64) -> f64 {
        (**self).value(w, a, y)
    }

    #[inline]
    fn derivative(&self, w: &[f64], a: &[f64], y: f64) -> f64 {
        (**self).derivative(w, a, y)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// =============================================================================
// LossKind
// =============================================================================

/// Named loss families with a closed-form step size.
///
/// ```
/// use saga_rs::loss::LossKind;
///
/// let kind: LossKind = "logistic".parse().unwrap();
/// assert_eq!(kind, LossKind::Logistic);
/// assert!("hinge".parse::<LossKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossKind {
    Squared,
    Logistic,
}

impl LossKind {
    pub fn name(self) -> &'static str {
        match self {
            LossKind::Squared => "squared",
            LossKind::Logistic => "logistic",
        }
    }

    /// Loss implementation for this family.
    pub fn to_loss(self) -> Box<dyn Loss> {
        match self {
            LossKind::Squared => Box::new(SquaredLoss),
            LossKind::Logistic => Box::new(LogisticLoss),
        }
    }
}

impl FromStr for LossKind {
    type Err = SagaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "squared" => Ok(LossKind::Squared),
            "logistic" => Ok(LossKind::Logistic),
            other => Err(SagaError::LossNotImplemented(other.to_string())),
        }
    }
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
