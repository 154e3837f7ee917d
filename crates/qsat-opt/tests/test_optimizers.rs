//! Behaviour shared by every optimiser.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;

use qsat_opt::{Bfgs, CmaEs, NelderMead, OptError, OptimiserConfig, Optimizer};

fn shifted_bowl(center: Vec<f64>) -> impl FnMut(&[f64]) -> Result<f64, OptError> {
    move |x: &[f64]| {
        Ok(x.iter()
            .zip(&center)
            .enumerate()
            .map(|(i, (v, c))| (i as f64 + 1.0) * (v - c).powi(2))
            .sum())
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn best_value_is_the_history_minimum(
        center in prop::collection::vec(-2.0f64..2.0, 1..4),
        tag in prop::sample::select(vec!["nelder-mead", "cma-es", "bfgs"]),
    ) {
        let n = center.len();
        let config = OptimiserConfig::from_parts(
            tag,
            serde_json::json!({"budget": 80, "seed": 5}).as_object().map(|m| {
                let mut m = m.clone();
                if tag != "cma-es" {
                    m.remove("seed");
                }
                serde_json::Value::Object(m)
            }).unwrap(),
        ).unwrap();
        let result = config.minimize(shifted_bowl(center), vec![0.0; n]).unwrap();

        let min = result.history.iter().cloned().fold(f64::INFINITY, f64::min);
        prop_assert_eq!(result.optimal_value, min);
        prop_assert_eq!(result.history.len(), result.num_evaluations);
        prop_assert_eq!(result.optimal_params.len(), n);
    }
}

#[test]
fn deterministic_optimisers_find_a_shifted_minimum() {
    let center = vec![0.7, -1.3, 0.2];
    let nm = NelderMead::new()
        .with_tolerance(1e-10)
        .with_max_evaluations(5000)
        .with_max_iterations(5000);
    let bfgs = Bfgs::new();

    for result in [
        nm.minimize(shifted_bowl(center.clone()), vec![0.0; 3]).unwrap(),
        bfgs.minimize(shifted_bowl(center.clone()), vec![0.0; 3]).unwrap(),
    ] {
        for (x, c) in result.optimal_params.iter().zip(&center) {
            assert_abs_diff_eq!(*x, *c, epsilon = 1e-3);
        }
    }
}

#[test]
fn cma_es_ignores_the_start_point_location() {
    // Two starts with the same spread give the same seeded run.
    let opt = CmaEs::new().with_seed(9).with_budget(50);
    let a = opt.minimize(shifted_bowl(vec![0.5, 0.5]), vec![0.0, 1.0]).unwrap();
    let b = opt.minimize(shifted_bowl(vec![0.5, 0.5]), vec![10.0, 11.0]).unwrap();
    assert_eq!(a.history, b.history);
}

#[test]
fn objective_errors_propagate() {
    #[derive(Debug)]
    enum RunError {
        Opt,
        Sim,
    }
    impl From<OptError> for RunError {
        fn from(_: OptError) -> Self {
            RunError::Opt
        }
    }

    let failing = |_: &[f64]| Err::<f64, _>(RunError::Sim);
    for result in [
        NelderMead::new().minimize(failing, vec![0.0]),
        CmaEs::new().with_seed(1).minimize(failing, vec![0.0]),
        Bfgs::new().minimize(failing, vec![0.0]),
    ] {
        assert!(matches!(result, Err(RunError::Sim)));
    }

    assert!(matches!(
        Bfgs::new().minimize(failing, vec![]),
        Err(RunError::Opt)
    ));
}
