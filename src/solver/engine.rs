//! Shared optimization state and the epoch engine abstraction.

use crate::prox::Prox;
use crate::shared::SharedVec;
use crate::utils::norm;

/// Mutable state of one optimization run.
///
/// Every worker of an epoch group holds a shared reference to the same state
/// and mutates it without locks (see [`SharedVec`]).
#[derive(Debug)]
pub struct SagaState {
    /// The iterate. For the primal-dual engine this is the auxiliary `y`.
    pub x: SharedVec,
    /// Last derivative seen per sample.
    pub memory_gradient: SharedVec,
    /// Running `(1/n) Σ_i memory_gradient[i] · a_i`.
    pub gradient_average: SharedVec,
}

impl SagaState {
    /// Fresh state starting at `x0` with zero memory.
    pub fn new(x0: &[f64], n_samples: usize) -> Self {
        Self {
            x: SharedVec::from_slice(x0),
            memory_gradient: SharedVec::zeros(n_samples),
            gradient_average: SharedVec::zeros(x0.len()),
        }
    }
}

/// One full pass over the data for a given problem.
///
/// An engine bundles the design matrix, targets, loss and proximal
/// operator(s) once per problem and is then reused by every epoch of every
/// worker. `run_epoch` must be callable from several threads at once on the
/// same state.
pub trait EpochEngine: Sync {
    fn n_samples(&self) -> usize;

    fn n_features(&self) -> usize;

    /// Visit every index of `sample_indices` once, in order.
    ///
    /// # Panics
    ///
    /// Panics if `state` was not built with `n_features()` weights and
    /// `n_samples()` memory slots, or if an index is out of range.
    fn run_epoch(&self, state: &SagaState, sample_indices: &[usize], step_size: f64);

    /// Average loss over the whole dataset at `x`.
    fn full_loss(&self, x: &[f64]) -> f64;

    /// Weights reported to callbacks, traces and the final result.
    fn primal(&self, state: &SagaState, _step_size: f64) -> Vec<f64> {
        state.x.to_vec()
    }

    /// Convergence quantity checked against the tolerance after each group.
    fn criterion(&self, state: &SagaState, step_size: f64) -> f64;
}

/// Norm of the gradient mapping `x − prox(beta·step, x − step·ga)`.
pub(crate) fn gradient_mapping_norm<P: Prox>(
    prox: &P,
    beta: f64,
    state: &SagaState,
    step_size: f64,
) -> f64 {
    let x = state.x.to_vec();
    let mut mapped: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(j, &xj)| xj - step_size * state.gradient_average.get(j))
        .collect();
    prox.prox(beta * step_size, &mut mapped);
    for (m, &xj) in mapped.iter_mut().zip(&x) {
        *m = xj - *m;
    }
    norm(&mapped)
}
