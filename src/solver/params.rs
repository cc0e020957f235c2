//! Solver parameters.

use crate::error::SagaError;
use crate::logger::Verbosity;

/// Parameters shared by the SAGA and PSSAGA solvers.
///
/// # Example
///
/// ```
/// use saga_rs::solver::SagaParams;
///
/// let params = SagaParams {
///     step_size: Some(0.05),
///     n_jobs: 4,
///     ..Default::default()
/// };
/// assert_eq!(params.validate().unwrap(), 0.05);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SagaParams {
    /// Step size. Must be set; see [`compute_step_size`](crate::compute_step_size).
    pub step_size: Option<f64>,
    /// Weight of the penalty. Ignored by PSSAGA, whose splitting weights are fixed at 1.
    pub beta: f64,
    /// Concurrent epochs per outer iteration. `0` = one per available core.
    pub n_jobs: usize,
    /// Maximum number of outer iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the solver's criterion.
    pub tol: f64,
    /// Base seed. Worker `w` draws its permutations from `seed + w`.
    pub seed: u64,
    /// Record objective value and elapsed time per outer iteration.
    pub trace: bool,
    pub verbosity: Verbosity,
}

impl Default for SagaParams {
    fn default() -> Self {
        Self {
            step_size: None,
            beta: 1.0,
            n_jobs: 1,
            max_iter: 1000,
            tol: 1e-6,
            seed: 42,
            trace: false,
            verbosity: Verbosity::default(),
        }
    }
}

impl SagaParams {
    /// Check the configuration and return the step size.
    pub fn validate(&self) -> Result<f64, SagaError> {
        match self.step_size {
            Some(step) if step.is_finite() && step >= 0.0 => Ok(step),
            other => Err(SagaError::InvalidStepSize(other)),
        }
    }
}
