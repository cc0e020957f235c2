//! Dense SAGA: convergence, determinism and the epoch invariants.

use approx::assert_abs_diff_eq;
use saga_rs::compute_step_size;
use saga_rs::data::RowMatrix;
use saga_rs::loss::{LogisticLoss, Loss, SquaredLoss};
use saga_rs::prox::{Identity, L1};
use saga_rs::solver::{DenseEpoch, EpochEngine, SagaParams, SagaSolver, SagaState, TerminationReason};
use saga_rs::testing::{least_squares_problem, logistic_labels, random_row_matrix};

use crate::common::{assert_vec_close, params};

#[test]
fn least_squares_converges_to_solution() {
    let (a, b, x_star) = least_squares_problem(35);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        tol: 1e-8,
        ..params(step)
    };

    let result = SagaSolver::new(SquaredLoss, params)
        .minimize_dense(&a, &b, &[0.0; 3], None)
        .unwrap();

    assert!(result.success, "criterion {}", result.criterion);
    assert_eq!(result.termination, TerminationReason::Converged);
    assert!(result.iterations <= 1000);
    assert!(result.criterion < 1e-8);
    assert_vec_close(&result.x, &x_star, 1e-4);
}

#[test]
fn zero_step_converges_immediately_without_moving() {
    let a = random_row_matrix(20, 4, 1);
    let b = logistic_labels(&a, &[1.0, -1.0, 0.5, 0.0], 0.1, 2);
    let x0 = [0.3, -0.2, 0.1, 0.7];

    let result = SagaSolver::new(LogisticLoss, params(0.0))
        .with_prox(L1)
        .minimize_dense(&a, &b, &x0, None)
        .unwrap();

    assert!(result.success);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.x, x0.to_vec());
}

#[test]
fn fixed_seed_single_worker_is_deterministic() {
    let a = random_row_matrix(40, 5, 3);
    let b = logistic_labels(&a, &[1.0, 0.0, -2.0, 0.5, 1.0], 0.05, 4);
    let step = compute_step_size("logistic", &a, 4.0).unwrap();
    let params = SagaParams {
        max_iter: 5,
        seed: 11,
        ..params(step)
    };

    let run = |params: SagaParams| {
        SagaSolver::new(LogisticLoss, params)
            .minimize_dense(&a, &b, &[0.0; 5], None)
            .unwrap()
            .x
    };

    let first = run(params.clone());
    let second = run(params.clone());
    assert_eq!(first, second);

    let other_seed = run(SagaParams {
        seed: 12,
        ..params
    });
    assert_ne!(first, other_seed);
}

#[test]
fn large_l1_penalty_gives_zero_solution() {
    let a = random_row_matrix(100, 5, 5);
    let b = a.matvec(&[1.0, 0.0, 0.0, -1.0, 0.0]);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        beta: 10.0,
        ..params(step)
    };

    let result = SagaSolver::new(SquaredLoss, params)
        .with_prox(L1)
        .minimize_dense(&a, &b, &[0.0; 5], None)
        .unwrap();

    assert!(result.success);
    assert!(result.x.iter().all(|&v| v == 0.0));
}

#[test]
fn trace_has_one_entry_per_iteration() {
    let (a, b, _) = least_squares_problem(35);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        max_iter: 10,
        tol: 0.0,
        trace: true,
        ..params(step)
    };

    let mut calls = 0;
    let mut count = |_: &[f64]| calls += 1;
    let result = SagaSolver::new(SquaredLoss, params)
        .minimize_dense(&a, &b, &[0.0; 3], Some(&mut count))
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.termination, TerminationReason::MaxIterations);
    assert_eq!(result.iterations, 10);
    assert_eq!(calls, 10);

    let trace = result.trace.unwrap();
    assert_eq!(trace.len(), 10);
    assert_eq!(trace.elapsed.len(), 10);
    assert!(trace.elapsed.windows(2).all(|w| w[0] <= w[1]));

    let engine = DenseEpoch::new(&a, &b, &SquaredLoss, &Identity, 1.0).unwrap();
    let start = engine.full_loss(&[0.0; 3]);
    assert!(trace.objective[9] < 0.1 * start);
    assert_abs_diff_eq!(trace.objective[9], engine.full_loss(&result.x), epsilon = 1e-12);
}

#[test]
fn gradient_average_matches_memory_after_one_epoch() {
    let a = random_row_matrix(30, 4, 8);
    let b = logistic_labels(&a, &[0.5, -1.0, 1.0, 0.0], 0.1, 9);
    let engine = DenseEpoch::new(&a, &b, &LogisticLoss, &L1, 0.1).unwrap();
    let state = SagaState::new(&[0.0; 4], a.num_rows());

    let permutation: Vec<usize> = (0..30).map(|i| (i * 7) % 30).collect();
    engine.run_epoch(&state, &permutation, 0.2);

    let memory = state.memory_gradient.to_vec();
    let average = state.gradient_average.to_vec();
    for j in 0..4 {
        let expected: f64 = (0..30)
            .map(|i| memory[i] * a.row_slice(i)[j])
            .sum::<f64>()
            / 30.0;
        assert_abs_diff_eq!(average[j], expected, epsilon = 1e-12);
    }
}

#[test]
fn memory_holds_derivative_at_visit_time() {
    let a = RowMatrix::from_rows(&[[1.0, 2.0], [0.5, -1.0], [2.0, 0.0]]);
    let b = vec![1.0, 0.0, -1.0];
    let engine = DenseEpoch::new(&a, &b, &SquaredLoss, &Identity, 1.0).unwrap();
    let state = SagaState::new(&[0.0, 0.0], 3);

    let mut scratch = saga_rs::solver::DenseScratch::new(2);
    for i in [2, 0, 1] {
        let before = state.x.to_vec();
        engine.process_sample(&state, i, 0.05, &mut scratch);
        let expected = SquaredLoss.derivative(&before, a.row_slice(i), b[i]);
        assert_eq!(state.memory_gradient.get(i), expected);
    }
}

#[test]
fn parallel_workers_reduce_the_objective() {
    let (a, b, _) = least_squares_problem(210);
    let step = compute_step_size("squared", &a, 4.0).unwrap();
    let params = SagaParams {
        n_jobs: 2,
        max_iter: 20,
        tol: 0.0,
        trace: true,
        ..params(step)
    };

    let result = SagaSolver::new(SquaredLoss, params)
        .minimize_dense(&a, &b, &[0.0; 3], None)
        .unwrap();

    assert_eq!(result.iterations, 20);
    assert!(result.x.iter().all(|v| v.is_finite()));
    let engine = DenseEpoch::new(&a, &b, &SquaredLoss, &Identity, 1.0).unwrap();
    let start = engine.full_loss(&[0.0; 3]);
    let objective = result.trace.unwrap().objective;
    assert!(*objective.last().unwrap() < 0.1 * start);
}
