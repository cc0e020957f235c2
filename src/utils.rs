//! Common utilities used across the crate.
//!
//! Vector helpers and the parallelism configuration shared by the driver and
//! the trace evaluation.

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::SagaError;

// =============================================================================
// Vector Utilities
// =============================================================================

/// Euclidean norm of a vector.
#[inline]
pub fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Dot product of two equal-length vectors.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// When `true`, components may use `rayon` parallel iterators.
/// When `false`, they run on the calling thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from worker count semantics.
    ///
    /// - 0 = auto (parallel if the machine has more than one core)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map over a slice, in parallel when allowed. Output order matches input order.
    #[inline]
    pub fn maybe_par_map<T, B, F>(self, items: &[T], f: F) -> Vec<B>
    where
        T: Sync,
        B: Send,
        F: Fn(&T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            items.par_iter().map(f).collect()
        } else {
            items.iter().map(f).collect()
        }
    }

    /// Run `f` on every element, in parallel when allowed.
    ///
    /// Returns only after every call has finished.
    #[inline]
    pub fn maybe_par_for_each_mut<T, F>(self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync + Send,
    {
        if self.is_parallel() {
            items
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, item)| f(i, item));
        } else {
            items.iter_mut().enumerate().for_each(|(i, item)| f(i, item));
        }
    }
}

// =============================================================================
// Worker Pool
// =============================================================================

/// Worker pool kept alive for a whole optimization run.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool, the caller's thread does the work)
/// - `n > 1` = exactly `n` threads
pub struct WorkerPool {
    pool: Option<ThreadPool>,
    n_workers: usize,
}

impl WorkerPool {
    pub fn new(n_threads: usize) -> Result<Self, SagaError> {
        match Parallelism::from_threads(n_threads) {
            Parallelism::Sequential => Ok(Self {
                pool: None,
                n_workers: 1,
            }),
            Parallelism::Parallel => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n_threads)
                    .build()?;
                let n_workers = pool.current_num_threads();
                Ok(Self {
                    pool: Some(pool),
                    n_workers,
                })
            }
        }
    }

    /// Number of concurrent workers in an epoch group.
    #[inline]
    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    #[inline]
    pub fn parallelism(&self) -> Parallelism {
        if self.pool.is_some() {
            Parallelism::Parallel
        } else {
            Parallelism::Sequential
        }
    }

    /// Run a closure inside the pool (or inline when sequential).
    pub fn install<T: Send>(&self, f: impl FnOnce(Parallelism) -> T + Send) -> T {
        match &self.pool {
            Some(pool) => pool.install(|| f(Parallelism::Parallel)),
            None => f(Parallelism::Sequential),
        }
    }
}
