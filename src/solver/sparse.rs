//! Sparse block-separable SAGA epoch.
//!
//! A sample step only touches the sample's nonzero columns and the blocks
//! they belong to. The control variate of a block is added only when the
//! block is touched, scaled by `d[g]` (see [`BlockSupport`]) so that the
//! gradient estimate stays unbiased.

use crate::data::CsrMatrix;
use crate::error::SagaError;
use crate::loss::Loss;
use crate::prox::Prox;

use super::blocks::BlockSupport;
use super::engine::{gradient_mapping_norm, EpochEngine, SagaState};

/// SAGA over a CSR design matrix with a block-separable penalty.
pub struct SparseBlockEpoch<'a, L, P> {
    a: &'a CsrMatrix,
    b: &'a [f64],
    loss: &'a L,
    prox: &'a P,
    beta: f64,
    support: BlockSupport,
}

/// Per-worker buffers for the sparse engine.
///
/// `acc` is the full-length gradient accumulator. It is all zeros between
/// samples; a sample step writes only its nonzero columns and clears every
/// entry again block by block.
#[derive(Debug)]
pub struct SparseScratch {
    acc: Vec<f64>,
    x_sub: Vec<f64>,
    block: Vec<f64>,
}

impl SparseScratch {
    pub fn new(n_features: usize, max_row_nnz: usize, max_block_len: usize) -> Self {
        Self {
            acc: vec![0.0; n_features],
            x_sub: Vec::with_capacity(max_row_nnz),
            block: Vec::with_capacity(max_block_len),
        }
    }

    /// `true` when the accumulator holds no leftover entries.
    pub fn is_clean(&self) -> bool {
        self.acc.iter().all(|&v| v == 0.0)
    }
}

impl<'a, L: Loss, P: Prox> SparseBlockEpoch<'a, L, P> {
    pub fn new(
        a: &'a CsrMatrix,
        b: &'a [f64],
        loss: &'a L,
        prox: &'a P,
        beta: f64,
        support: BlockSupport,
    ) -> Result<Self, SagaError> {
        SagaError::check_len("targets", a.num_rows(), b.len())?;
        SagaError::check_len("block support samples", a.num_rows(), support.n_samples())?;
        SagaError::check_len("block support features", a.num_cols(), support.n_features())?;
        Ok(Self {
            a,
            b,
            loss,
            prox,
            beta,
            support,
        })
    }

    pub fn support(&self) -> &BlockSupport {
        &self.support
    }

    pub fn scratch(&self) -> SparseScratch {
        SparseScratch::new(
            self.a.num_cols(),
            self.a.max_row_nnz(),
            self.support.max_block_len(),
        )
    }

    /// One SAGA step on sample `i`, restricted to the blocks it touches.
    pub fn process_sample(
        &self,
        state: &SagaState,
        i: usize,
        step_size: f64,
        scratch: &mut SparseScratch,
    ) {
        let row = self.a.row(i);
        let inv_n = 1.0 / self.a.num_rows() as f64;
        let d = self.support.correction();

        scratch.x_sub.clear();
        scratch
            .x_sub
            .extend(row.indices.iter().map(|&j| state.x.get(j as usize)));
        let grad = self.loss.derivative(&scratch.x_sub, row.values, self.b[i]);
        let delta = grad - state.memory_gradient.get(i);

        for (j, v) in row.iter() {
            scratch.acc[j] = delta * v;
        }

        for &g in self.support.blocks_of(i) {
            let features = self.support.features_of(g);
            scratch.block.clear();
            for &j in features {
                let estimate = scratch.acc[j] + state.gradient_average.get(j) * d[g];
                scratch.block.push(state.x.get(j) - step_size * estimate);
                scratch.acc[j] = 0.0;
            }
            self.prox
                .prox_indexed(step_size * self.beta * d[g], &mut scratch.block, features);
            for (&j, &v) in features.iter().zip(&scratch.block) {
                state.x.set(j, v);
            }
        }

        for (j, v) in row.iter() {
            state.gradient_average.add(j, delta * v * inv_n);
        }
        state.memory_gradient.set(i, grad);
    }
}

impl<L: Loss, P: Prox> EpochEngine for SparseBlockEpoch<'_, L, P> {
    fn n_samples(&self) -> usize {
        self.a.num_rows()
    }

    fn n_features(&self) -> usize {
        self.a.num_cols()
    }

    fn run_epoch(&self, state: &SagaState, sample_indices: &[usize], step_size: f64) {
        let mut scratch = self.scratch();
        for &i in sample_indices {
            self.process_sample(state, i, step_size, &mut scratch);
        }
    }

    fn full_loss(&self, x: &[f64]) -> f64 {
        let n = self.a.num_rows() as f64;
        let mut x_sub = Vec::with_capacity(self.a.max_row_nnz());
        let mut total = 0.0;
        for (i, &y) in self.b.iter().enumerate() {
            let row = self.a.row(i);
            x_sub.clear();
            x_sub.extend(row.indices.iter().map(|&j| x[j as usize]));
            total += self.loss.value(&x_sub, row.values, y) / n;
        }
        total
    }

    fn criterion(&self, state: &SagaState, step_size: f64) -> f64 {
        gradient_mapping_norm(self.prox, self.beta, state, step_size)
    }
}
