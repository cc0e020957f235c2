//! Solver entry points.

use crate::data::{CsrMatrix, RowMatrix};
use crate::error::SagaError;
use crate::logger::SolverLogger;
use crate::loss::Loss;
use crate::prox::{Identity, Prox};
use crate::utils::WorkerPool;

use super::blocks::BlockSupport;
use super::dense::DenseEpoch;
use super::driver::{self, DriverConfig};
use super::engine::{EpochEngine, SagaState};
use super::params::SagaParams;
use super::pssaga::PssagaEpoch;
use super::result::OptimizeResult;
use super::sparse::SparseBlockEpoch;

/// Check targets and start point against the matrix shape.
fn check_problem(
    n_samples: usize,
    n_features: usize,
    b: &[f64],
    x0: &[f64],
) -> Result<(), SagaError> {
    SagaError::check_len("initial weights", n_features, x0.len())?;
    SagaError::check_len("targets", n_samples, b.len())?;
    Ok(())
}

/// SAGA for `(1/n) Σ_i loss(a_i·x, b_i) + beta · g(x)`.
///
/// `g` is given by the proximal operator `P` (none by default).
///
/// # Example
///
/// ```
/// use saga_rs::data::RowMatrix;
/// use saga_rs::loss::SquaredLoss;
/// use saga_rs::solver::{SagaParams, SagaSolver};
/// use saga_rs::compute_step_size;
///
/// let a = RowMatrix::from_rows(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
/// let b = vec![1.0, 2.0, 3.0];
/// let params = SagaParams {
///     step_size: Some(compute_step_size("squared", &a, 4.0).unwrap()),
///     tol: 1e-8,
///     ..Default::default()
/// };
/// let result = SagaSolver::new(SquaredLoss, params)
///     .minimize_dense(&a, &b, &[0.0, 0.0], None)
///     .unwrap();
/// assert!(result.success);
/// assert!((result.x[0] - 1.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct SagaSolver<L, P = Identity> {
    loss: L,
    prox: P,
    params: SagaParams,
}

impl<L: Loss> SagaSolver<L, Identity> {
    pub fn new(loss: L, params: SagaParams) -> Self {
        Self {
            loss,
            prox: Identity,
            params,
        }
    }
}

impl<L: Loss, P: Prox> SagaSolver<L, P> {
    /// Replace the proximal operator.
    pub fn with_prox<Q: Prox>(self, prox: Q) -> SagaSolver<L, Q> {
        SagaSolver {
            loss: self.loss,
            prox,
            params: self.params,
        }
    }

    pub fn params(&self) -> &SagaParams {
        &self.params
    }

    /// Minimize over a dense design matrix.
    ///
    /// Every sample step applies the proximal operator to the full vector.
    pub fn minimize_dense(
        &self,
        a: &RowMatrix,
        b: &[f64],
        x0: &[f64],
        callback: Option<&mut dyn FnMut(&[f64])>,
    ) -> Result<OptimizeResult, SagaError> {
        let step_size = self.params.validate()?;
        check_problem(a.num_rows(), a.num_cols(), b, x0)?;

        let engine = DenseEpoch::new(a, b, &self.loss, &self.prox, self.params.beta)?;
        self.drive("saga", &engine, x0, step_size, callback)
    }

    /// Minimize over a sparse design matrix.
    ///
    /// `blocks[j]` is the block of feature `j`; `None` puts every feature in
    /// its own block. The proximal operator must be separable over these
    /// blocks.
    pub fn minimize_sparse(
        &self,
        a: &CsrMatrix,
        b: &[f64],
        x0: &[f64],
        blocks: Option<&[usize]>,
        callback: Option<&mut dyn FnMut(&[f64])>,
    ) -> Result<OptimizeResult, SagaError> {
        let step_size = self.params.validate()?;
        check_problem(a.num_rows(), a.num_cols(), b, x0)?;
        let support = match blocks {
            Some(blocks) => BlockSupport::new(a, blocks)?,
            None => BlockSupport::per_feature(a),
        };

        let engine =
            SparseBlockEpoch::new(a, b, &self.loss, &self.prox, self.params.beta, support)?;
        self.drive("sparse saga", &engine, x0, step_size, callback)
    }

    fn drive<E: EpochEngine>(
        &self,
        name: &str,
        engine: &E,
        x0: &[f64],
        step_size: f64,
        callback: Option<&mut dyn FnMut(&[f64])>,
    ) -> Result<OptimizeResult, SagaError> {
        let pool = WorkerPool::new(self.params.n_jobs)?;
        let logger = SolverLogger::new(self.params.verbosity);
        logger.start(
            name,
            engine.n_samples(),
            engine.n_features(),
            pool.n_workers(),
            step_size,
        );
        let config = DriverConfig {
            step_size,
            max_iter: self.params.max_iter,
            tol: self.params.tol,
            seed: self.params.seed,
            trace: self.params.trace,
            n_workers: pool.n_workers(),
        };
        let state = SagaState::new(x0, engine.n_samples());
        Ok(driver::run(engine, state, &config, &pool, &logger, callback))
    }
}

/// Primal-dual splitting SAGA for `(1/n) Σ_i loss(a_i·x, b_i) + g(x) + h(x)`.
///
/// Neither penalty needs to be separable. Each outer iteration runs a single
/// epoch; `n_jobs` only parallelizes the trace evaluation. Convergence is
/// measured by the norm of the gradient average.
#[derive(Debug, Clone)]
pub struct PssagaSolver<L, G = Identity, H = Identity> {
    loss: L,
    prox_g: G,
    prox_h: H,
    params: SagaParams,
}

impl<L: Loss> PssagaSolver<L, Identity, Identity> {
    pub fn new(loss: L, params: SagaParams) -> Self {
        Self {
            loss,
            prox_g: Identity,
            prox_h: Identity,
            params,
        }
    }
}

impl<L: Loss, G: Prox, H: Prox> PssagaSolver<L, G, H> {
    /// Replace the first penalty, the one whose prox recovers the weights.
    pub fn with_prox_g<Q: Prox>(self, prox_g: Q) -> PssagaSolver<L, Q, H> {
        PssagaSolver {
            loss: self.loss,
            prox_g,
            prox_h: self.prox_h,
            params: self.params,
        }
    }

    /// Replace the second penalty.
    pub fn with_prox_h<Q: Prox>(self, prox_h: Q) -> PssagaSolver<L, G, Q> {
        PssagaSolver {
            loss: self.loss,
            prox_g: self.prox_g,
            prox_h,
            params: self.params,
        }
    }

    pub fn params(&self) -> &SagaParams {
        &self.params
    }

    /// Minimize over a dense design matrix.
    ///
    /// Callbacks, trace snapshots and the result all report
    /// `x = prox_g(step, y)`.
    pub fn minimize(
        &self,
        a: &RowMatrix,
        b: &[f64],
        x0: &[f64],
        callback: Option<&mut dyn FnMut(&[f64])>,
    ) -> Result<OptimizeResult, SagaError> {
        let step_size = self.params.validate()?;
        check_problem(a.num_rows(), a.num_cols(), b, x0)?;

        let engine = PssagaEpoch::new(a, b, &self.loss, &self.prox_g, &self.prox_h)?;
        let pool = WorkerPool::new(self.params.n_jobs)?;
        let logger = SolverLogger::new(self.params.verbosity);
        logger.start("pssaga", a.num_rows(), a.num_cols(), 1, step_size);

        let config = DriverConfig {
            step_size,
            max_iter: self.params.max_iter,
            tol: self.params.tol,
            seed: self.params.seed,
            trace: self.params.trace,
            n_workers: 1,
        };
        let state = SagaState::new(x0, a.num_rows());
        Ok(driver::run(&engine, state, &config, &pool, &logger, callback))
    }
}
