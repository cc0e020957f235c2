//! Dense SAGA epoch.
//!
//! Every sample step touches every coordinate: the proximal operator is
//! applied to the full weight vector after each sample.

use crate::data::RowMatrix;
use crate::error::SagaError;
use crate::loss::Loss;
use crate::prox::Prox;

use super::engine::{gradient_mapping_norm, EpochEngine, SagaState};

/// SAGA over a dense row-major design matrix.
pub struct DenseEpoch<'a, L, P> {
    a: &'a RowMatrix,
    b: &'a [f64],
    loss: &'a L,
    prox: &'a P,
    beta: f64,
}

/// Per-worker buffers, reused across the samples of one epoch.
#[derive(Debug)]
pub struct DenseScratch {
    x: Vec<f64>,
    incr: Vec<f64>,
}

impl DenseScratch {
    pub fn new(n_features: usize) -> Self {
        Self {
            x: vec![0.0; n_features],
            incr: vec![0.0; n_features],
        }
    }
}

impl<'a, L: Loss, P: Prox> DenseEpoch<'a, L, P> {
    /// Fails if `b` does not hold one target per row of `a`.
    pub fn new(
        a: &'a RowMatrix,
        b: &'a [f64],
        loss: &'a L,
        prox: &'a P,
        beta: f64,
    ) -> Result<Self, SagaError> {
        SagaError::check_len("targets", a.num_rows(), b.len())?;
        Ok(Self {
            a,
            b,
            loss,
            prox,
            beta,
        })
    }

    /// One SAGA step on sample `i`.
    pub fn process_sample(
        &self,
        state: &SagaState,
        i: usize,
        step_size: f64,
        scratch: &mut DenseScratch,
    ) {
        let row = self.a.row_slice(i);
        let inv_n = 1.0 / self.a.num_rows() as f64;

        state.x.load_into(&mut scratch.x);
        let grad = self.loss.derivative(&scratch.x, row, self.b[i]);
        let delta = grad - state.memory_gradient.get(i);

        for (j, (&a_ij, (xj, incr))) in row
            .iter()
            .zip(scratch.x.iter_mut().zip(scratch.incr.iter_mut()))
            .enumerate()
        {
            *incr = delta * a_ij;
            *xj -= step_size * (*incr + state.gradient_average.get(j));
        }
        self.prox.prox(self.beta * step_size, &mut scratch.x);
        state.x.store_from(&scratch.x);

        for (j, &incr) in scratch.incr.iter().enumerate() {
            state.gradient_average.add(j, incr * inv_n);
        }
        state.memory_gradient.set(i, grad);
    }
}

impl<L: Loss, P: Prox> EpochEngine for DenseEpoch<'_, L, P> {
    fn n_samples(&self) -> usize {
        self.a.num_rows()
    }

    fn n_features(&self) -> usize {
        self.a.num_cols()
    }

    fn run_epoch(&self, state: &SagaState, sample_indices: &[usize], step_size: f64) {
        let mut scratch = DenseScratch::new(self.n_features());
        for &i in sample_indices {
            self.process_sample(state, i, step_size, &mut scratch);
        }
    }

    fn full_loss(&self, x: &[f64]) -> f64 {
        let n = self.a.num_rows() as f64;
        self.a
            .rows()
            .zip(self.b)
            .map(|(row, &y)| self.loss.value(x, row, y) / n)
            .sum()
    }

    fn criterion(&self, state: &SagaState, step_size: f64) -> f64 {
        gradient_mapping_norm(self.prox, self.beta, state, step_size)
    }
}
