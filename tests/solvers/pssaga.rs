//! Primal-dual splitting SAGA.

use approx::assert_abs_diff_eq;
use saga_rs::compute_step_size;
use saga_rs::loss::SquaredLoss;
use saga_rs::prox::{Identity, Tv1d, L1};
use saga_rs::solver::{PssagaSolver, SagaParams, SagaSolver, TerminationReason};
use saga_rs::testing::least_squares_problem;

use crate::common::{assert_vec_close, params};

#[test]
fn identity_penalties_solve_least_squares() {
    let (a, b, x_star) = least_squares_problem(35);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        tol: 1e-8,
        ..params(step)
    };

    let result = PssagaSolver::new(SquaredLoss, params)
        .minimize(&a, &b, &[0.0; 3], None)
        .unwrap();

    assert!(result.success, "criterion {}", result.criterion);
    assert!(result.criterion < 1e-8);
    assert_vec_close(&result.x, &x_star, 1e-4);
}

#[test]
fn identity_penalties_match_saga_iterates() {
    // with g = h = 0 one PSSAGA step is exactly one SAGA step
    let (a, b, _) = least_squares_problem(35);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        max_iter: 3,
        tol: 0.0,
        ..params(step)
    };

    let saga = SagaSolver::new(SquaredLoss, params.clone())
        .minimize_dense(&a, &b, &[0.0; 3], None)
        .unwrap();
    let pssaga = PssagaSolver::new(SquaredLoss, params)
        .minimize(&a, &b, &[0.0; 3], None)
        .unwrap();
    assert_vec_close(&pssaga.x, &saga.x, 1e-12);
}

#[test]
fn l1_on_small_targets_recovers_zero() {
    // |Aᵀb / n| < 1 everywhere, so x = 0 minimizes f + ||x||₁; the gradient
    // average stays away from zero and the run exhausts its budget
    let (a, b, _) = least_squares_problem(35);
    let b: Vec<f64> = b.iter().map(|v| 0.1 * v).collect();
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        max_iter: 300,
        ..params(step)
    };

    let mut last = Vec::new();
    let mut record = |x: &[f64]| last = x.to_vec();
    let result = PssagaSolver::new(SquaredLoss, params)
        .with_prox_g(L1)
        .minimize(&a, &b, &[0.0; 3], Some(&mut record))
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.termination, TerminationReason::MaxIterations);
    assert_eq!(result.iterations, 300);
    assert!(result.criterion > 0.1);
    for &v in &result.x {
        assert_abs_diff_eq!(v, 0.0, epsilon = 1e-6);
    }
    assert_eq!(last, result.x);
}

#[test]
fn worker_count_does_not_change_the_iterates() {
    let (a, b, _) = least_squares_problem(35);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let run = |n_jobs: usize| {
        let params = SagaParams {
            max_iter: 5,
            tol: 0.0,
            n_jobs,
            trace: true,
            ..params(step)
        };
        PssagaSolver::new(SquaredLoss, params)
            .with_prox_g(Identity)
            .with_prox_h(Tv1d)
            .minimize(&a, &b, &[0.0; 3], None)
            .unwrap()
    };

    let single = run(1);
    let pooled = run(3);
    assert_eq!(single.x, pooled.x);
    assert_eq!(
        single.trace.unwrap().objective,
        pooled.trace.unwrap().objective
    );
}
