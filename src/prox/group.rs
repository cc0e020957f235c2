//! Group lasso proximal operator.

use super::Prox;
use crate::error::SagaError;
use crate::solver::validate_blocks;
use crate::utils::norm;

/// Proximal operator of `Σ_g ||x_g||₂` over a block map.
///
/// `blocks[j]` is the block of feature `j`. Each block is shrunk towards zero
/// as a whole: `x_g ← x_g · max(0, 1 − step / ||x_g||)`.
///
/// When used with the sparse solver, pass the same block map to the solver so
/// that [`Prox::prox_indexed`] always receives exactly one whole block.
#[derive(Debug, Clone)]
pub struct GroupL1 {
    blocks: Vec<usize>,
    n_blocks: usize,
}

impl GroupL1 {
    /// Build from a contiguous zero-based block map.
    pub fn new(blocks: Vec<usize>) -> Result<Self, SagaError> {
        let n_blocks = validate_blocks(&blocks)?;
        Ok(Self { blocks, n_blocks })
    }

    pub fn blocks(&self) -> &[usize] {
        &self.blocks
    }

    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }
}

/// Factor applied to a group of norm `group_norm`.
#[inline]
fn group_scale(group_norm: f64, step_size: f64) -> f64 {
    if group_norm > step_size {
        1.0 - step_size / group_norm
    } else {
        0.0
    }
}

impl Prox for GroupL1 {
    fn prox(&self, step_size: f64, x: &mut [f64]) {
        assert_eq!(x.len(), self.blocks.len(), "point length does not match block map");
        let mut norms_sq = vec![0.0; self.n_blocks];
        for (&g, &v) in self.blocks.iter().zip(x.iter()) {
            norms_sq[g] += v * v;
        }
        let scales: Vec<f64> = norms_sq
            .iter()
            .map(|&n2| group_scale(n2.sqrt(), step_size))
            .collect();
        for (&g, v) in self.blocks.iter().zip(x.iter_mut()) {
            *v *= scales[g];
        }
    }

    /// The indexed call receives one block: the whole slice is one group.
    fn prox_indexed(&self, step_size: f64, x: &mut [f64], indices: &[usize]) {
        debug_assert!(indices
            .windows(2)
            .all(|w| self.blocks[w[0]] == self.blocks[w[1]]));
        let scale = group_scale(norm(x), step_size);
        for v in x.iter_mut() {
            *v *= scale;
        }
    }

    fn name(&self) -> &'static str {
        "group_l1"
    }
}
