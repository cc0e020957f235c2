//! Standalone helpers: step size, debiasing vector and name lookups.

use approx::assert_relative_eq;
use rstest::rstest;
use saga_rs::data::{CsrMatrix, DataMatrix, RowMatrix};
use saga_rs::loss::LossKind;
use saga_rs::prox::ProxKind;
use saga_rs::testing::random_csr_matrix;
use saga_rs::{compute_step_size, debiasing_vector, SagaError};

#[rstest]
#[case("squared", 4.0, 1.0 / 36.0)]
#[case("squared", 1.0, 1.0 / 9.0)]
#[case("logistic", 4.0, 1.0 / 9.0)]
#[case("logistic", 2.0, 2.0 / 9.0)]
fn step_size_from_max_row_norm(#[case] loss: &str, #[case] factor: f64, #[case] expected: f64) {
    // max squared row norm is 9
    let a = RowMatrix::from_rows(&[[1.0, 2.0, 2.0], [0.0, 1.0, 0.0]]);
    assert_relative_eq!(compute_step_size(loss, &a, factor).unwrap(), expected);
}

#[rstest]
#[case("hinge")]
#[case("Squared")]
#[case("")]
fn step_size_unknown_loss(#[case] loss: &str) {
    let a = RowMatrix::from_rows(&[[1.0]]);
    let err = compute_step_size(loss, &a, 4.0).unwrap_err();
    assert!(matches!(err, SagaError::LossNotImplemented(ref name) if name == loss));
}

#[test]
fn debiasing_vector_counts_rows_per_feature() {
    let a = random_csr_matrix(40, 12, 0.25, 17);
    let dense = a.to_dense();
    let d = debiasing_vector(&a);
    assert_eq!(d.len(), 12);

    for j in 0..12 {
        let count = (0..dense.num_rows())
            .filter(|&i| dense.get(i, j) != Some(0.0))
            .count();
        let expected = if count == 0 { 0.0 } else { 40.0 / count as f64 };
        assert_eq!(d[j], expected, "feature {j}");
    }
}

#[test]
fn debiasing_vector_exact_counts() {
    // feature 0 in 4 of 8 rows, feature 1 in all rows, feature 2 in none
    let rows: Vec<[f64; 3]> = (0..8)
        .map(|i| [if i % 2 == 0 { 1.0 } else { 0.0 }, 2.0, 0.0])
        .collect();
    let a = CsrMatrix::from_dense(&RowMatrix::from_rows(&rows));
    assert_eq!(debiasing_vector(&a), vec![2.0, 1.0, 0.0]);
}

#[test]
fn sparse_and_dense_row_norms_agree() {
    let a = random_csr_matrix(30, 7, 0.5, 3);
    let dense = a.to_dense();
    assert_relative_eq!(a.max_row_norm_sq(), dense.max_row_norm_sq());
}

#[test]
fn names_resolve_to_kinds() {
    assert_eq!("squared".parse::<LossKind>().unwrap(), LossKind::Squared);
    assert_eq!("l1".parse::<ProxKind>().unwrap(), ProxKind::L1);
    assert!(matches!(
        "group".parse::<ProxKind>(),
        Err(SagaError::UnsupportedProx(_))
    ));
}
