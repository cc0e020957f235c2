//! SAGA-family solvers.
//!
//! # Solvers
//!
//! | Solver | Data | Penalty | Criterion |
//! |--------|------|---------|-----------|
//! | [`SagaSolver::minimize_dense`] | [`RowMatrix`](crate::data::RowMatrix) | any prox | gradient mapping |
//! | [`SagaSolver::minimize_sparse`] | [`CsrMatrix`](crate::data::CsrMatrix) | block-separable prox | gradient mapping |
//! | [`PssagaSolver::minimize`] | [`RowMatrix`](crate::data::RowMatrix) | two proxes | `‖gradient average‖` |
//!
//! Each solver wraps an [`EpochEngine`] that performs one pass over the data
//! and a shared outer loop that runs epoch groups until the criterion drops
//! below `tol` or `max_iter` groups have run.
//!
//! # Concurrency
//!
//! With `n_jobs > 1` every outer iteration runs `n_jobs` epochs at once, all
//! writing to the same weights and memory buffers without locks. The buffers
//! are [`SharedVec`](crate::shared::SharedVec)s, so these races are well
//! defined: individual element reads and writes are atomic, but a worker may
//! see a mix of old and new coordinates. With `n_jobs == 1` and a fixed seed a
//! run is fully deterministic.

mod blocks;
mod dense;
mod driver;
mod engine;
mod params;
mod pssaga;
mod result;
mod saga;
mod sparse;

pub use blocks::{validate_blocks, BlockSupport};
pub use dense::{DenseEpoch, DenseScratch};
pub use engine::{EpochEngine, SagaState};
pub use params::SagaParams;
pub use pssaga::PssagaEpoch;
pub use result::{OptimizeResult, TerminationReason, Trace};
pub use saga::{PssagaSolver, SagaSolver};
pub use sparse::{SparseBlockEpoch, SparseScratch};
