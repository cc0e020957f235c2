//! Closed-form step sizes for the built-in loss families.

use crate::data::DataMatrix;
use crate::error::SagaError;
use crate::loss::LossKind;

/// Conservative SAGA step size for a named loss.
///
/// With `L = max_i ||a_i||²`:
///
/// - `"logistic"`: `4 / (L · factor)`
/// - `"squared"`: `1 / (L · factor)`
///
/// `factor = 4` gives the theoretical `1 / (4 L_f)` step; smaller factors are
/// more aggressive. Any other loss name returns
/// [`SagaError::LossNotImplemented`]; a matrix whose rows are all zero (or that
/// has no rows) returns [`SagaError::InvalidMatrix`].
///
/// ```
/// use saga_rs::compute_step_size;
/// use saga_rs::data::RowMatrix;
///
/// let a = RowMatrix::from_rows(&[[3.0, 4.0], [1.0, 0.0]]);
/// assert_eq!(compute_step_size("squared", &a, 4.0).unwrap(), 0.01);
/// assert!(compute_step_size("hinge", &a, 4.0).is_err());
/// ```
pub fn compute_step_size<M: DataMatrix + ?Sized>(
    loss: &str,
    a: &M,
    factor: f64,
) -> Result<f64, SagaError> {
    let kind: LossKind = loss.parse()?;
    let max_norm_sq = a.max_row_norm_sq();
    if !(max_norm_sq > 0.0 && max_norm_sq.is_finite()) {
        return Err(SagaError::InvalidMatrix(format!(
            "max squared row norm is {max_norm_sq}, step size is undefined"
        )));
    }
    let numerator = match kind {
        LossKind::Logistic => 4.0,
        LossKind::Squared => 1.0,
    };
    Ok(numerator / (max_norm_sq * factor))
}
