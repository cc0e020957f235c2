//! Proximal operators.
//!
//! A proximal operator maps a step size `s` and a point `x` to
//!
//! ```text
//! prox(s, x) = argmin_z  g(z) + (1 / 2s) ||z − x||²
//! ```
//!
//! for some (possibly non-smooth) penalty `g`. Operators work in place on a
//! mutable slice.
//!
//! The sparse SAGA engine only ever updates one block of coordinates at a
//! time and calls [`Prox::prox_indexed`] with the block's feature indices. For
//! a block-separable penalty this is the penalty restricted to that block; the
//! default implementation simply applies [`Prox::prox`] to the gathered values,
//! which is correct for any coordinate-separable penalty.
//!
//! # Available Operators
//!
//! | Operator | Penalty | Separable |
//! |----------|---------|-----------|
//! | [`Identity`] | none | yes |
//! | [`L1`] | `||x||₁` | per coordinate |
//! | [`GroupL1`] | `Σ_g ||x_g||₂` | per block |
//! | [`Tv1d`] | `Σ_i |x_{i+1} − x_i|` | no |
//! | [`Tv2d`] | anisotropic 2-D total variation | no |

mod group;
mod l1;
mod tv;

use std::str::FromStr;

pub use group::GroupL1;
pub use l1::{soft_threshold, L1};
pub use tv::{tv1d_denoise, Tv1d, Tv2d};

use crate::error::SagaError;

/// A proximal operator acting in place.
pub trait Prox: Send + Sync {
    /// Replace `x` with `prox(step_size, x)`.
    fn prox(&self, step_size: f64, x: &mut [f64]);

    /// Proximal step restricted to the coordinates `indices` of the full vector.
    ///
    /// `x[k]` holds the current value of coordinate `indices[k]`.
    fn prox_indexed(&self, step_size: f64, x: &mut [f64], indices: &[usize]) {
        debug_assert_eq!(x.len(), indices.len());
        self.prox(step_size, x);
    }

    /// Operator name for logging.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<P: Prox + ?Sized> Prox for &P {
    #[inline]
    fn prox(&self, step_size: f64, x: &mut [f64]) {
        (**self).prox(step_size, x)
    }

    #[inline]
    fn prox_indexed(&self, step_size: f64, x: &mut [f64], indices: &[usize]) {
        (**self).prox_indexed(step_size, x, indices)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<P: Prox + ?Sized> Prox for Box<P> {
    #[inline]
    fn prox(&self, step_size: f64, x: &mut [f64]) {
        (**self).prox(step_size, x)
    }

    #[inline]
    fn prox_indexed(&self, step_size: f64, x: &mut [f64], indices: &[usize]) {
        (**self).prox_indexed(step_size, x, indices)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The proximal operator of the zero penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Prox for Identity {
    #[inline]
    fn prox(&self, _step_size: f64, _x: &mut [f64]) {}

    #[inline]
    fn prox_indexed(&self, _step_size: f64, _x: &mut [f64], _indices: &[usize]) {}

    fn name(&self) -> &'static str {
        "identity"
    }
}

// =============================================================================
// ProxKind
// =============================================================================

/// Operators that can be selected by name.
///
/// Operators needing extra configuration ([`GroupL1`], [`Tv2d`]) are built
/// directly instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxKind {
    Identity,
    L1,
    Tv1d,
}

impl ProxKind {
    pub fn into_prox(self) -> Box<dyn Prox> {
        match self {
            ProxKind::Identity => Box::new(Identity),
            ProxKind::L1 => Box::new(L1),
            ProxKind::Tv1d => Box::new(Tv1d),
        }
    }
}

impl FromStr for ProxKind {
    type Err = SagaError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "identity" | "none" => Ok(ProxKind::Identity),
            "l1" => Ok(ProxKind::L1),
            "tv1d" => Ok(ProxKind::Tv1d),
            other => Err(SagaError::UnsupportedProx(other.to_string())),
        }
    }
}
