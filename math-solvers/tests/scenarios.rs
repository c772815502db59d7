//! End-to-end scenarios across the direct, iterative and analysis APIs

use approx::assert_relative_eq;
use math_dense_solvers::{
    DirectMethod, FactorMethod, IterationStatus, IterativeConfig, NormKind, Pivoting,
    RecordingSink, Scheme, SolverError, StepPhase, StopCriterion, TridiagonalSystem,
    analyze_convergence, condition_number, factorize, iterate, residual_norm, solve_direct,
    solve_direct_with_diagnostics, solve_tridiagonal,
};
use ndarray::{Array1, Array2, array};
use num_rational::Rational64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Strictly diagonally dominant random system
fn dominant_system(rng: &mut StdRng, n: usize) -> (Array2<f64>, Array1<f64>) {
    let mut a: Array2<f64> = Array2::from_shape_fn((n, n), |_| rng.random_range(-1.0..1.0));
    for i in 0..n {
        let off: f64 = (0..n).filter(|&j| j != i).map(|j| a[[i, j]].abs()).sum();
        a[[i, i]] = off + rng.random_range(0.5..2.0);
    }
    let b = Array1::from_shape_fn(n, |_| rng.random_range(-10.0..10.0));
    (a, b)
}

fn assert_close(x: &Array1<f64>, y: &Array1<f64>, epsilon: f64) {
    assert_eq!(x.len(), y.len());
    for (xi, yi) in x.iter().zip(y.iter()) {
        assert_relative_eq!(*xi, *yi, epsilon = epsilon);
    }
}

#[test]
fn test_diagonally_dominant_two_by_two_iterations() {
    let a = array![[4.0_f64, -1.0], [-1.0, 4.0]];
    let b = array![2.0_f64, 2.0];
    let config = IterativeConfig {
        max_iterations: 50,
        tolerance: 1e-5,
        ..Default::default()
    };

    for scheme in [Scheme::Jacobi, Scheme::GaussSeidel] {
        let solution = iterate(&a, &b, scheme, None, config.clone()).unwrap();
        assert!(solution.converged, "{} should converge", scheme.name());
        assert!(solution.iterations < 50);
        assert_relative_eq!(solution.x[0], 2.0 / 3.0, epsilon = 1e-5);
        assert_relative_eq!(solution.x[1], 2.0 / 3.0, epsilon = 1e-5);
        assert!(solution.residual < 1e-4);
    }
}

#[test]
fn test_tridiagonal_matches_dense_elimination() {
    let diag = [4.0_f64; 5];
    let off = [-1.0_f64; 4];
    let d = [100.0_f64, 200.0, 200.0, 200.0, 100.0];

    let x = solve_tridiagonal(&diag, &off, &off, &d, 1e-12).unwrap();

    let system = TridiagonalSystem::from_slices(&diag, &off, &off, &d).unwrap();
    let (dense, rhs) = system.to_dense();
    let reference = solve_direct(&dense, &rhs, DirectMethod::Gauss(Pivoting::Partial)).unwrap();

    assert_close(&x, &reference, 1e-9);
    assert_relative_eq!(x[0], 600.0 / 13.0, epsilon = 1e-9);
    assert_relative_eq!(x[1], 1100.0 / 13.0, epsilon = 1e-9);
    assert_relative_eq!(x[2], 1200.0 / 13.0, epsilon = 1e-9);
}

#[test]
fn test_singular_system_has_no_answer() {
    let a = array![[1.0_f64, 2.0], [2.0, 4.0]];
    let b = array![3.0_f64, 6.0];

    for pivoting in [Pivoting::Partial, Pivoting::Full] {
        let err = solve_direct(&a, &b, DirectMethod::Gauss(pivoting)).unwrap_err();
        assert!(matches!(err, SolverError::SingularMatrix { .. }), "{err}");
    }
    // the factorizations cannot pivot and report the vanishing pivot instead
    let err = solve_direct(&a, &b, DirectMethod::Doolittle).unwrap_err();
    assert_eq!(err, SolverError::ZeroPivot { step: 1 });
}

#[test]
fn test_badly_scaled_diagonal_solves_with_every_method() {
    let a = array![[1e20_f64, 0.0], [0.0, 1.0]];
    let b = array![1e20_f64, 1.0];

    for method in [
        DirectMethod::Gauss(Pivoting::None),
        DirectMethod::Gauss(Pivoting::Partial),
        DirectMethod::Gauss(Pivoting::Full),
        DirectMethod::Doolittle,
        DirectMethod::Crout,
        DirectMethod::Cholesky,
    ] {
        let x = solve_direct(&a, &b, method).unwrap_or_else(|e| panic!("{method:?}: {e}"));
        assert_eq!(x, array![1.0, 1.0], "{method:?}");
    }
}

#[test]
fn test_cholesky_matches_gauss() {
    let a = array![[4.0_f64, 2.0, -2.0], [2.0, 2.0, -3.0], [-2.0, -3.0, 14.0]];
    let b = array![10.0_f64, 5.0, 4.0];

    let chol = solve_direct(&a, &b, DirectMethod::Cholesky).unwrap();
    let gauss = solve_direct(&a, &b, DirectMethod::Gauss(Pivoting::Partial)).unwrap();

    assert_close(&chol, &gauss, 1e-9);
    assert_close(&chol, &array![2.0, 2.0, 1.0], 1e-9);
}

#[test]
fn test_partial_pivoting_residual_is_small() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in 1..=8 {
        for _ in 0..5 {
            let a: Array2<f64> = Array2::from_shape_fn((n, n), |_| rng.random_range(-5.0..5.0));
            let b = Array1::from_shape_fn(n, |_| rng.random_range(-5.0..5.0));
            let Ok(x) = solve_direct(&a, &b, DirectMethod::Gauss(Pivoting::Partial)) else {
                continue;
            };
            let scale = condition_number(&a, NormKind::Infinity).unwrap_or(1.0).max(1.0);
            let r = residual_norm(&a, &x, &b).unwrap();
            assert!(r < 1e-12 * scale * 10.0, "n = {n}: residual {r}");
        }
    }
}

#[test]
fn test_direct_methods_agree() {
    let mut rng = StdRng::seed_from_u64(11);
    for n in 2..=7 {
        let (a, b) = dominant_system(&mut rng, n);
        let reference = solve_direct(&a, &b, DirectMethod::Gauss(Pivoting::Full)).unwrap();
        for method in [
            DirectMethod::Gauss(Pivoting::None),
            DirectMethod::Gauss(Pivoting::Partial),
            DirectMethod::Doolittle,
            DirectMethod::Crout,
        ] {
            let x = solve_direct(&a, &b, method).unwrap();
            assert_close(&x, &reference, 1e-9);
        }

        let spd = a.t().dot(&a);
        let chol = solve_direct(&spd, &b, DirectMethod::Cholesky).unwrap();
        let gauss = solve_direct(&spd, &b, DirectMethod::default()).unwrap();
        assert_close(&chol, &gauss, 1e-8);
    }
}

#[test]
fn test_factors_reconstruct_input() {
    let mut rng = StdRng::seed_from_u64(3);
    let (a, _) = dominant_system(&mut rng, 6);
    for method in [FactorMethod::Doolittle, FactorMethod::Crout] {
        let lu = factorize(&a, method).unwrap().reconstruct();
        for ((i, j), v) in lu.indexed_iter() {
            assert_relative_eq!(*v, a[[i, j]], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_convergent_analysis_implies_iteration_converges() {
    let mut rng = StdRng::seed_from_u64(23);
    let config = IterativeConfig {
        max_iterations: 5000,
        tolerance: 1e-10,
        stop_criterion: StopCriterion::ResidualNorm,
        print_interval: 0,
    };
    for n in 2..=8 {
        let (a, b) = dominant_system(&mut rng, n);
        let exact = solve_direct(&a, &b, DirectMethod::default()).unwrap();
        for scheme in [Scheme::Jacobi, Scheme::GaussSeidel, Scheme::Sor { omega: 1.1 }] {
            let report = analyze_convergence(&a, scheme).unwrap();
            if !report.converges {
                continue;
            }
            let x0 = Array1::from_shape_fn(n, |_| rng.random_range(-100.0..100.0));
            let first = iterate(&a, &b, scheme, Some(&x0), config.clone()).unwrap();
            let second = iterate(&a, &b, scheme, Some(&x0), config.clone()).unwrap();
            assert_eq!(first.status, IterationStatus::Converged);
            assert_eq!(first.iterations, second.iterations);
            assert_close(&first.x, &exact, 1e-8);
        }
    }
}

#[test]
fn test_sor_unit_relaxation_is_bitwise_gauss_seidel() {
    let mut rng = StdRng::seed_from_u64(5);
    let config = IterativeConfig {
        max_iterations: 40,
        tolerance: 0.0,
        ..Default::default()
    };
    for n in [3, 5, 9] {
        let (a, b) = dominant_system(&mut rng, n);
        let gs = iterate(&a, &b, Scheme::GaussSeidel, None, config.clone()).unwrap();
        let sor = iterate(&a, &b, Scheme::Sor { omega: 1.0 }, None, config.clone()).unwrap();
        assert_eq!(gs.iterations, sor.iterations);
        assert_eq!(gs.status, sor.status);
        for (x, y) in gs.x.iter().zip(sor.x.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}

#[test]
fn test_diagnostics_do_not_change_results() {
    let mut rng = StdRng::seed_from_u64(17);
    let (a, b) = dominant_system(&mut rng, 5);
    for method in [
        DirectMethod::Gauss(Pivoting::None),
        DirectMethod::Gauss(Pivoting::Partial),
        DirectMethod::Gauss(Pivoting::Full),
        DirectMethod::Doolittle,
        DirectMethod::Crout,
    ] {
        let quiet = solve_direct(&a, &b, method).unwrap();
        let mut sink = RecordingSink::default();
        let observed = solve_direct_with_diagnostics(&a, &b, method, &mut sink).unwrap();
        assert_eq!(quiet, observed);
        assert!(!sink.records.is_empty());
    }

    let mut pivots = Vec::new();
    let mut sink = |record: &math_dense_solvers::StepRecord<f64>| {
        if record.phase == StepPhase::Elimination {
            pivots.push(record.pivot);
        }
    };
    solve_direct_with_diagnostics(&a, &b, DirectMethod::Gauss(Pivoting::Partial), &mut sink)
        .unwrap();
    assert_eq!(pivots.len(), 5);
}

#[test]
fn test_exact_rational_pipeline() {
    let r = |n: i64| Rational64::from_integer(n);
    let a = array![[r(2), r(1), r(-1)], [r(-3), r(-1), r(2)], [r(-2), r(1), r(2)]];
    let b = array![r(8), r(-11), r(-3)];
    let expected = array![r(2), r(3), r(-1)];

    for method in [
        DirectMethod::Gauss(Pivoting::None),
        DirectMethod::Gauss(Pivoting::Partial),
        DirectMethod::Gauss(Pivoting::Full),
        DirectMethod::Doolittle,
        DirectMethod::Crout,
    ] {
        assert_eq!(solve_direct(&a, &b, method).unwrap(), expected);
    }
}

#[test]
fn test_budget_exhaustion_returns_last_iterate() {
    let a = array![[4.0_f64, -1.0], [-1.0, 4.0]];
    let b = array![2.0_f64, 2.0];
    let config = IterativeConfig {
        max_iterations: 2,
        tolerance: 1e-12,
        ..Default::default()
    };
    let solution = iterate(&a, &b, Scheme::Jacobi, None, config).unwrap();
    assert_eq!(solution.status, IterationStatus::BudgetExhausted);
    assert_eq!(solution.iterations, 2);
    // x1 = [0.5, 0.5], x2 = [0.625, 0.625]
    assert_close(&solution.x, &array![0.625, 0.625], 1e-15);
    assert_relative_eq!(solution.residual, 0.125, epsilon = 1e-15);
}

#[cfg(feature = "serde")]
#[test]
fn test_config_round_trips_through_json() {
    let config = IterativeConfig {
        max_iterations: 250,
        tolerance: 1e-8,
        stop_criterion: StopCriterion::ResidualNorm,
        print_interval: 10,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"residual_norm\""));
    let back: IterativeConfig<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.max_iterations, 250);
    assert_eq!(back.stop_criterion, StopCriterion::ResidualNorm);

    let scheme: Scheme = serde_json::from_str(r#"{"sor":{"omega":1.25}}"#).unwrap();
    assert_eq!(scheme, Scheme::Sor { omega: 1.25 });
    let method: DirectMethod = serde_json::from_str(r#"{"gauss":"full"}"#).unwrap();
    assert_eq!(method, DirectMethod::Gauss(Pivoting::Full));
}
