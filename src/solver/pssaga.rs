//! Primal-dual splitting SAGA (PSSAGA) epoch.
//!
//! Handles two penalties `g` and `h` that need not be separable. The engine
//! iterates on an auxiliary variable `y` (stored in [`SagaState::x`]); the
//! primal weights are recovered as `x = prox_g(step, y)`.

use crate::data::RowMatrix;
use crate::error::SagaError;
use crate::loss::Loss;
use crate::prox::Prox;
use crate::utils::norm;

use super::engine::{EpochEngine, SagaState};

// splitting weights of the g and h proximal steps
const BETA: f64 = 1.0;
const GAMMA: f64 = 1.0;

/// PSSAGA over a dense row-major design matrix.
pub struct PssagaEpoch<'a, L, G, H> {
    a: &'a RowMatrix,
    b: &'a [f64],
    loss: &'a L,
    prox_g: &'a G,
    prox_h: &'a H,
}

impl<'a, L: Loss, G: Prox, H: Prox> PssagaEpoch<'a, L, G, H> {
    pub fn new(
        a: &'a RowMatrix,
        b: &'a [f64],
        loss: &'a L,
        prox_g: &'a G,
        prox_h: &'a H,
    ) -> Result<Self, SagaError> {
        SagaError::check_len("targets", a.num_rows(), b.len())?;
        Ok(Self {
            a,
            b,
            loss,
            prox_g,
            prox_h,
        })
    }

    /// `prox_g(beta·step, y)`.
    pub fn recover_primal(&self, y: &[f64], step_size: f64) -> Vec<f64> {
        let mut x = y.to_vec();
        self.prox_g.prox(BETA * step_size, &mut x);
        x
    }
}

impl<L: Loss, G: Prox, H: Prox> EpochEngine for PssagaEpoch<'_, L, G, H> {
    fn n_samples(&self) -> usize {
        self.a.num_rows()
    }

    fn n_features(&self) -> usize {
        self.a.num_cols()
    }

    fn run_epoch(&self, state: &SagaState, sample_indices: &[usize], step_size: f64) {
        let n_features = self.n_features();
        let inv_n = 1.0 / self.n_samples() as f64;
        let mut y = vec![0.0; n_features];
        let mut x = vec![0.0; n_features];
        let mut z = vec![0.0; n_features];
        let mut incr = vec![0.0; n_features];

        for &i in sample_indices {
            let row = self.a.row_slice(i);

            state.x.load_into(&mut y);
            x.copy_from_slice(&y);
            self.prox_g.prox(BETA * step_size, &mut x);

            let grad = self.loss.derivative(&x, row, self.b[i]);
            let delta = grad - state.memory_gradient.get(i);
            for j in 0..n_features {
                incr[j] = delta * row[j];
                z[j] = 2.0 * x[j] - y[j]
                    - step_size * (incr[j] + state.gradient_average.get(j));
            }
            self.prox_h.prox(GAMMA * step_size, &mut z);

            for j in 0..n_features {
                y[j] -= x[j] - z[j];
            }
            state.x.store_from(&y);

            for (j, &inc) in incr.iter().enumerate() {
                state.gradient_average.add(j, inc * inv_n);
            }
            state.memory_gradient.set(i, grad);
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

    fn primal(&self, state: &SagaState, step_size: f64) -> Vec<f64> {
        self.recover_primal(&state.x.to_vec(), step_size)
    }

    /// Norm of the gradient average.
    fn criterion(&self, state: &SagaState, _step_size: f64) -> f64 {
        norm(&state.gradient_average.to_vec())
    }
}
