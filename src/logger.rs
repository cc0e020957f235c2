//! Solver progress logging.
//!
//! Messages go through the [`log`] facade. Nothing is printed unless the
//! application installs a logger, and [`Verbosity`] filters on top of the
//! logger's own level so a silent solver stays silent under `RUST_LOG=debug`.

use std::time::Duration;

/// Verbosity level for solver output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Verbosity {
    /// No output at all.
    Silent,
    /// Only budget exhaustion and numerical warnings.
    #[default]
    Warning,
    /// One line per outer iteration.
    Info,
    /// Per-iteration timings on top of `Info`.
    Debug,
}

impl Verbosity {
    /// Map a plain `verbose` flag onto a level.
    pub fn from_flag(verbose: bool) -> Self {
        if verbose {
            Verbosity::Info
        } else {
            Verbosity::Warning
        }
    }
}

/// Logger for the outer optimization loop.
#[derive(Debug, Clone)]
pub struct SolverLogger {
    verbosity: Verbosity,
}

impl SolverLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn start(
        &self,
        solver: &str,
        n_samples: usize,
        n_features: usize,
        n_workers: usize,
        step_size: f64,
    ) {
        if self.verbosity >= Verbosity::Info {
            log::info!(
                "{solver}: {n_samples} samples, {n_features} features, {n_workers} worker(s), step size {step_size:.6e}"
            );
        }
    }

    pub fn log_iteration(&self, iteration: usize, criterion: f64, elapsed: Duration) {
        if self.verbosity >= Verbosity::Info {
            log::info!("iteration {iteration}, convergence criterion {criterion:.6e}");
        }
        if self.verbosity >= Verbosity::Debug {
            log::debug!("iteration {iteration} finished after {:.3}s", elapsed.as_secs_f64());
        }
    }

    pub fn log_converged(&self, iterations: usize, criterion: f64) {
        if self.verbosity >= Verbosity::Info {
            log::info!("converged after {iterations} iteration(s), criterion {criterion:.6e}");
        }
    }

    pub fn log_exhausted(&self, max_iter: usize, criterion: f64) {
        if self.verbosity >= Verbosity::Warning {
            log::warn!(
                "did not converge within {max_iter} iteration(s), last criterion {criterion:.6e}"
            );
        }
    }

    pub fn log_trace(&self, n_snapshots: usize) {
        if self.verbosity >= Verbosity::Info {
            log::info!("computing trace objective for {n_snapshots} snapshot(s)");
        }
    }
}

impl Default for SolverLogger {
    fn default() -> Self {
        Self::new(Verbosity::default())
    }
}
