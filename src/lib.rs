//! saga-rs: SAGA-family stochastic proximal-gradient solvers.
//!
//! This crate minimizes finite sums of per-sample losses of a linear model
//! plus a (possibly non-smooth) penalty,
//!
//! ```text
//! min_x  (1/n) Σ_i loss(a_i·x, b_i) + beta · g(x)
//! ```
//!
//! over dense or sparse design matrices, with variance-reduced stochastic
//! gradients (SAGA), a sparse block-separable variant that only touches each
//! sample's support, and a primal-dual splitting variant (PSSAGA) for two
//! penalties. Several epochs can run concurrently on the same iterate without
//! locks.
//!
//! # Example
//!
//! ```
//! use saga_rs::data::RowMatrix;
//! use saga_rs::loss::SquaredLoss;
//! use saga_rs::prox::L1;
//! use saga_rs::solver::{SagaParams, SagaSolver};
//! use saga_rs::compute_step_size;
//!
//! let a = RowMatrix::from_rows(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 0.0]]);
//! let b = vec![1.0, 0.0, 1.0, 2.0];
//!
//! let params = SagaParams {
//!     step_size: Some(compute_step_size("squared", &a, 4.0)?),
//!     beta: 0.01,
//!     ..Default::default()
//! };
//! let result = SagaSolver::new(SquaredLoss, params)
//!     .with_prox(L1)
//!     .minimize_dense(&a, &b, &[0.0, 0.0], None)?;
//! assert!(result.success);
//! # Ok::<(), saga_rs::SagaError>(())
//! ```

pub mod data;
pub mod debias;
pub mod error;
pub mod logger;
pub mod loss;
pub mod prox;
pub mod shared;
pub mod solver;
pub mod step_size;
pub mod testing;
pub mod utils;

pub use debias::debiasing_vector;
pub use error::SagaError;
pub use logger::Verbosity;
pub use solver::{OptimizeResult, PssagaSolver, SagaParams, SagaSolver, TerminationReason, Trace};
pub use step_size::compute_step_size;
