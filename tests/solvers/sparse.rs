//! Sparse block SAGA: agreement with the dense solver, block penalties and the
//! accumulator invariant.

use rstest::rstest;
use saga_rs::compute_step_size;
use saga_rs::data::CsrMatrix;
use saga_rs::loss::{LogisticLoss, SquaredLoss};
use saga_rs::prox::{GroupL1, Identity, L1};
use saga_rs::solver::{
    BlockSupport, EpochEngine, SagaParams, SagaSolver, SagaState, SparseBlockEpoch,
};
use saga_rs::testing::{least_squares_problem, random_csr_matrix};
use saga_rs::SagaError;

use crate::common::{assert_vec_close, params};

#[rstest]
#[case::per_feature(None)]
#[case::grouped(Some(vec![0, 1, 1]))]
fn least_squares_converges_to_solution(#[case] blocks: Option<Vec<usize>>) {
    let (dense, b, x_star) = least_squares_problem(35);
    let a = CsrMatrix::from_dense(&dense);
    assert!(a.nnz() < 3 * 35);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        tol: 1e-8,
        ..params(step)
    };

    let result = SagaSolver::new(SquaredLoss, params)
        .minimize_sparse(&a, &b, &[0.0; 3], blocks.as_deref(), None)
        .unwrap();

    assert!(result.success, "criterion {}", result.criterion);
    assert_vec_close(&result.x, &x_star, 1e-4);
}

#[test]
fn sparse_and_dense_reach_the_same_solution() {
    let (dense, b, _) = least_squares_problem(70);
    let a = CsrMatrix::from_dense(&dense);
    let step = compute_step_size("squared", &dense, 4.0).unwrap();
    let params = SagaParams {
        tol: 1e-9,
        ..params(step)
    };
    let solver = SagaSolver::new(SquaredLoss, params);

    let from_dense = solver.minimize_dense(&dense, &b, &[0.0; 3], None).unwrap();
    let from_sparse = solver
        .minimize_sparse(&a, &b, &[0.0; 3], None, None)
        .unwrap();
    assert!(from_dense.success && from_sparse.success);
    assert_vec_close(&from_sparse.x, &from_dense.x, 1e-5);
}

#[test]
fn large_group_penalty_zeroes_every_block() {
    let a = random_csr_matrix(60, 6, 0.4, 21);
    let b: Vec<f64> = (0..60).map(|i| if i % 3 == 0 { 1.0 } else { -1.0 }).collect();
    let blocks = vec![0, 0, 1, 1, 2, 2];
    let step = compute_step_size("logistic", &a, 4.0).unwrap();
    let params = SagaParams {
        beta: 100.0,
        ..params(step)
    };

    let result = SagaSolver::new(LogisticLoss, params)
        .with_prox(GroupL1::new(blocks.clone()).unwrap())
        .minimize_sparse(&a, &b, &[0.0; 6], Some(&blocks), None)
        .unwrap();

    assert!(result.success);
    assert!(result.x.iter().all(|&v| v == 0.0));
}

#[rstest]
#[case(0.1, 1)]
#[case(0.3, 2)]
#[case(0.8, 3)]
fn accumulator_is_zero_around_every_sample(#[case] density: f64, #[case] seed: u64) {
    let a = random_csr_matrix(25, 8, density, seed);
    let b: Vec<f64> = (0..25).map(|i| (i as f64 * 0.37).sin()).collect();
    let blocks = [0, 0, 0, 1, 2, 2, 3, 3];
    let prox = GroupL1::new(blocks.to_vec()).unwrap();
    let support = BlockSupport::new(&a, &blocks).unwrap();
    let engine = SparseBlockEpoch::new(&a, &b, &SquaredLoss, &prox, 0.05, support).unwrap();

    let state = SagaState::new(&[0.1; 8], 25);
    let mut scratch = engine.scratch();
    for epoch in 0..3 {
        for k in 0..25 {
            let i = (k * 11 + epoch * 5) % 25;
            assert!(scratch.is_clean());
            engine.process_sample(&state, i, 0.1, &mut scratch);
            assert!(scratch.is_clean(), "accumulator dirty after sample {i}");
        }
    }
}

#[test]
fn zero_step_converges_immediately_without_moving() {
    let a = random_csr_matrix(30, 5, 0.5, 4);
    let b = vec![1.0; 30];
    let x0 = [0.5, -0.5, 0.25, 0.0, 1.0];

    let result = SagaSolver::new(SquaredLoss, params(0.0))
        .with_prox(L1)
        .minimize_sparse(&a, &b, &x0, None, None)
        .unwrap();

    assert!(result.success);
    assert_eq!(result.x, x0.to_vec());
}

#[test]
fn fixed_seed_single_worker_is_deterministic() {
    let a = random_csr_matrix(50, 10, 0.2, 6);
    let b: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
    let step = compute_step_size("logistic", &a, 4.0).unwrap();
    let params = SagaParams {
        max_iter: 4,
        ..params(step)
    };
    let solver = SagaSolver::new(LogisticLoss, params).with_prox(Identity);

    let first = solver.minimize_sparse(&a, &b, &[0.0; 10], None, None).unwrap();
    let second = solver.minimize_sparse(&a, &b, &[0.0; 10], None, None).unwrap();
    assert_eq!(first.x, second.x);
    assert_eq!(first.iterations, second.iterations);
}

#[test]
fn block_map_must_cover_every_feature() {
    let a = random_csr_matrix(10, 4, 0.5, 1);
    let b = vec![0.0; 10];
    let err = SagaSolver::new(SquaredLoss, params(0.1))
        .minimize_sparse(&a, &b, &[0.0; 4], Some(&[0, 1, 2]), None)
        .unwrap_err();
    assert!(matches!(err, SagaError::DimensionMismatch { what: "block map", .. }));
}

#[test]
fn block_map_must_be_contiguous() {
    let a = random_csr_matrix(10, 4, 0.5, 1);
    let b = vec![0.0; 10];
    let err = SagaSolver::new(SquaredLoss, params(0.1))
        .minimize_sparse(&a, &b, &[0.0; 4], Some(&[0, 0, 2, 2]), None)
        .unwrap_err();
    assert!(matches!(err, SagaError::InvalidBlocks(_)));
}

#[test]
fn parallel_workers_reduce_the_objective() {
    let (dense, b, _) = least_squares_problem(210);
    let a = CsrMatrix::from_dense(&dense);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        n_jobs: 4,
        max_iter: 20,
        tol: 0.0,
        trace: true,
        ..params(step)
    };

    let result = SagaSolver::new(SquaredLoss, params)
        .minimize_sparse(&a, &b, &[0.0; 3], Some(&[0, 1, 1]), None)
        .unwrap();

    assert_eq!(result.iterations, 20);
    assert!(result.x.iter().all(|v| v.is_finite()));
    let engine =
        SparseBlockEpoch::new(&a, &b, &SquaredLoss, &Identity, 1.0, BlockSupport::per_feature(&a))
            .unwrap();
    let start = engine.full_loss(&[0.0; 3]);
    let objective = result.trace.unwrap().objective;
    assert_eq!(objective.len(), 20);
    assert!(*objective.last().unwrap() < 0.1 * start);
}
