//! Error types for solver setup and the standalone helpers.

/// Errors raised before or while setting up an optimization run.
///
/// Every variant is detected before the first epoch starts. Once the outer loop
/// is running the solver has no failure path of its own: running out of
/// iterations is reported through [`OptimizeResult::success`](crate::solver::OptimizeResult).
#[derive(Debug, thiserror::Error)]
pub enum SagaError {
    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid step size {0:?}: must be set, finite and non-negative")]
    InvalidStepSize(Option<f64>),

    #[error("loss {0} is not implemented")]
    LossNotImplemented(String),

    #[error("unsupported proximal operator: {0}")]
    UnsupportedProx(String),

    #[error("invalid block map: {0}")]
    InvalidBlocks(String),

    #[error("invalid sparse matrix: {0}")]
    InvalidMatrix(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SagaError {
    pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), Self> {
        if expected == got {
            Ok(())
        } else {
            Err(SagaError::DimensionMismatch {
                what,
                expected,
                got,
            })
        }
    }
}
