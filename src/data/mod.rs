//! Design matrix storage.
//!
//! - [`RowMatrix`]: dense, row-major. Each sample is one contiguous row.
//! - [`CsrMatrix`]: compressed sparse row. Each sample stores only its nonzeros.
//!
//! Both implement [`DataMatrix`], which exposes the shape and the per-row
//! squared norms that the step-size helper needs. Matrices are immutable once
//! built and are shared read-only by every epoch worker.

mod csr;
mod dense;
mod ndarray;
mod traits;

pub use csr::{CsrMatrix, SparseRow};
pub use dense::RowMatrix;
pub use traits::DataMatrix;
