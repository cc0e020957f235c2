//! Outer optimization loop.
//!
//! One outer iteration is an epoch group: every worker shuffles its own
//! permutation of the samples and runs one epoch on the shared state. The
//! group ends when all workers have returned from the rayon join, which also
//! makes every worker's writes visible to the convergence check.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::logger::SolverLogger;
use crate::utils::WorkerPool;

use super::engine::{EpochEngine, SagaState};
use super::result::{OptimizeResult, TerminationReason, Trace};

/// Loop settings resolved from [`SagaParams`](super::SagaParams).
#[derive(Debug, Clone)]
pub(crate) struct DriverConfig {
    pub step_size: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub seed: u64,
    pub trace: bool,
    /// Epochs per group.
    pub n_workers: usize,
}

/// One RNG per worker, seeded `seed + w`.
pub(crate) fn worker_rngs(seed: u64, n_workers: usize) -> Vec<Xoshiro256PlusPlus> {
    (0..n_workers)
        .map(|w| Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(w as u64)))
        .collect()
}

/// Run epoch groups until convergence or until the budget is spent.
pub(crate) fn run<E: EpochEngine>(
    engine: &E,
    state: SagaState,
    config: &DriverConfig,
    pool: &WorkerPool,
    logger: &SolverLogger,
    mut callback: Option<&mut dyn FnMut(&[f64])>,
) -> OptimizeResult {
    let n_samples = engine.n_samples();
    let step_size = config.step_size;
    let mut rngs = worker_rngs(config.seed, config.n_workers);

    let start = Instant::now();
    let mut snapshots: Vec<Vec<f64>> = Vec::new();
    let mut elapsed: Vec<f64> = Vec::new();

    let mut termination = TerminationReason::MaxIterations;
    let mut iterations = 0;
    let mut criterion = f64::INFINITY;

    for it in 0..config.max_iter {
        let group_start = Instant::now();
        pool.install(|parallelism| {
            parallelism.maybe_par_for_each_mut(&mut rngs, |_, rng| {
                let mut permutation: Vec<usize> = (0..n_samples).collect();
                permutation.shuffle(rng);
                engine.run_epoch(&state, &permutation, step_size);
            })
        });
        iterations = it + 1;

        if callback.is_some() || config.trace {
            let x = engine.primal(&state, step_size);
            if let Some(cb) = callback.as_mut() {
                cb(&x);
            }
            if config.trace {
                snapshots.push(x);
                elapsed.push(start.elapsed().as_secs_f64());
            }
        }

        criterion = engine.criterion(&state, step_size);
        logger.log_iteration(it, criterion, group_start.elapsed());
        if criterion < config.tol {
            termination = TerminationReason::Converged;
            break;
        }
    }

    match termination {
        TerminationReason::Converged => logger.log_converged(iterations, criterion),
        TerminationReason::MaxIterations => logger.log_exhausted(config.max_iter, criterion),
    }

    let trace = config.trace.then(|| {
        logger.log_trace(snapshots.len());
        let objective =
            pool.install(|parallelism| parallelism.maybe_par_map(&snapshots, |x| engine.full_loss(x)));
        Trace { objective, elapsed }
    });

    OptimizeResult {
        x: engine.primal(&state, step_size),
        success: termination == TerminationReason::Converged,
        iterations,
        termination,
        criterion,
        trace,
    }
}
