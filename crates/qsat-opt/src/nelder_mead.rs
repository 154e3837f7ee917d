//! Nelder-Mead simplex optimizer.
//!
//! A derivative-free direct search that keeps `n + 1` vertices and moves the
//! worst one by reflection, expansion or contraction, shrinking the whole
//! simplex towards the best vertex when none of those improve it. Robust to
//! noisy or non-smooth objectives, which is why it is the default for
//! variational circuits.
//!
//! With `adaptive` set, the coefficients scale with dimension (Gao & Han,
//! 2012), which helps once `n` grows past a handful of parameters.

use tracing::{debug, info, warn};

use crate::error::OptError;
use crate::tracked::Tracked;
use crate::{OptimizationResult, Optimizer};

/// Nelder-Mead optimizer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMead {
    /// Convergence tolerance on both the simplex diameter and the value spread.
    pub tolerance: f64,
    /// Use dimension-dependent coefficients.
    pub adaptive: bool,
    /// Offset used to build the initial simplex around a zero coordinate.
    pub initial_step: f64,
    /// Iteration guard. Defaults to `200 · n`.
    pub max_iterations: Option<usize>,
    /// Evaluation guard. Defaults to `200 · n`.
    pub max_evaluations: Option<usize>,
    /// Log progress at info level.
    pub verbose: bool,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            adaptive: false,
            initial_step: 0.1,
            max_iterations: None,
            max_evaluations: None,
            verbose: false,
        }
    }
}

/// Reflection, expansion, contraction and shrink coefficients.
#[derive(Debug, Clone, Copy)]
struct Coefficients {
    rho: f64,
    chi: f64,
    psi: f64,
    sigma: f64,
}

impl Coefficients {
    fn for_dimension(n: usize, adaptive: bool) -> Self {
        if adaptive {
            let dim = n as f64;
            Self {
                rho: 1.0,
                chi: 1.0 + 2.0 / dim,
                psi: 0.75 - 1.0 / (2.0 * dim),
                sigma: 1.0 - 1.0 / dim,
            }
        } else {
            Self {
                rho: 1.0,
                chi: 2.0,
                psi: 0.5,
                sigma: 0.5,
            }
        }
    }
}

impl NelderMead {
    /// Create a new Nelder-Mead optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Enable dimension-adaptive coefficients.
    #[must_use]
    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    /// Set the initial simplex step.
    #[must_use]
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = Some(max_iter);
        self
    }

    /// Set maximum objective evaluations.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evals: usize) -> Self {
        self.max_evaluations = Some(max_evals);
        self
    }

    /// Log progress at info level.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn initial_simplex(&self, center: &[f64]) -> Vec<Vec<f64>> {
        let mut simplex = vec![center.to_vec()];
        for i in 0..center.len() {
            let mut vertex = center.to_vec();
            let delta = if center[i].abs() < 1e-10 {
                self.initial_step
            } else {
                self.initial_step * center[i].abs()
            };
            vertex[i] += delta;
            simplex.push(vertex);
        }
        simplex
    }

    fn check_convergence(&self, simplex: &[Vec<f64>], costs: &[f64]) -> bool {
        let spread = costs[costs.len() - 1] - costs[0];
        if spread.abs() < self.tolerance {
            return true;
        }
        let diameter = simplex[1..]
            .iter()
            .map(|v| {
                v.iter()
                    .zip(&simplex[0])
                    .map(|(a, b)| (a - b).abs())
                    .fold(0.0, f64::max)
            })
            .fold(0.0, f64::max);
        diameter < self.tolerance
    }
}

/// Sort vertices by cost, best first.
fn sort_simplex(simplex: &mut Vec<Vec<f64>>, costs: &mut Vec<f64>) {
    let mut indices: Vec<usize> = (0..simplex.len()).collect();
    indices.sort_by(|&a, &b| costs[a].total_cmp(&costs[b]));
    *simplex = indices.iter().map(|&i| simplex[i].clone()).collect();
    *costs = indices.iter().map(|&i| costs[i]).collect();
}

/// Centroid of all vertices except the worst.
fn centroid(simplex: &[Vec<f64>]) -> Vec<f64> {
    let n = simplex.len() - 1;
    let mut center = vec![0.0; simplex[0].len()];
    for vertex in &simplex[..n] {
        for (c, &v) in center.iter_mut().zip(vertex) {
            *c += v;
        }
    }
    for c in &mut center {
        *c /= n as f64;
    }
    center
}

/// `centroid + t · (centroid − worst)`.
fn along(centroid: &[f64], worst: &[f64], t: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(worst)
        .map(|(&c, &w)| c + t * (c - w))
        .collect()
}

impl Optimizer for NelderMead {
    fn name(&self) -> &'static str {
        "nelder-mead"
    }

    fn minimize<F, E>(&self, objective: F, initial_params: Vec<f64>) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        E: From<OptError>,
    {
        let n = initial_params.len();
        if n == 0 {
            return Err(OptError::EmptyParameters.into());
        }
        let max_iterations = self.max_iterations.unwrap_or(200 * n);
        let max_evaluations = self.max_evaluations.unwrap_or(200 * n);
        let Coefficients {
            rho,
            chi,
            psi,
            sigma,
        } = Coefficients::for_dimension(n, self.adaptive);

        let mut f = Tracked::new(objective, Some(max_evaluations));
        let mut simplex = self.initial_simplex(&initial_params);
        let mut costs = Vec::with_capacity(n + 1);
        for vertex in &simplex {
            costs.push(f.call(vertex)?);
        }

        let mut iteration = 0;
        let mut converged = false;

        while iteration < max_iterations && !f.exhausted() {
            sort_simplex(&mut simplex, &mut costs);
            if self.check_convergence(&simplex, &costs) {
                converged = true;
                break;
            }

            let c = centroid(&simplex);
            let reflected = along(&c, &simplex[n], rho);
            let f_reflected = f.call(&reflected)?;

            let mut shrink = false;
            if f_reflected < costs[0] {
                let expanded = along(&c, &simplex[n], rho * chi);
                let f_expanded = f.call(&expanded)?;
                if f_expanded < f_reflected {
                    simplex[n] = expanded;
                    costs[n] = f_expanded;
                } else {
                    simplex[n] = reflected;
                    costs[n] = f_reflected;
                }
            } else if f_reflected < costs[n - 1] {
                simplex[n] = reflected;
                costs[n] = f_reflected;
            } else if f_reflected < costs[n] {
                // Outside contraction.
                let contracted = along(&c, &simplex[n], psi * rho);
                let f_contracted = f.call(&contracted)?;
                if f_contracted <= f_reflected {
                    simplex[n] = contracted;
                    costs[n] = f_contracted;
                } else {
                    shrink = true;
                }
            } else {
                // Inside contraction.
                let contracted = along(&c, &simplex[n], -psi);
                let f_contracted = f.call(&contracted)?;
                if f_contracted < costs[n] {
                    simplex[n] = contracted;
                    costs[n] = f_contracted;
                } else {
                    shrink = true;
                }
            }

            if shrink {
                for j in 1..=n {
                    let shrunk: Vec<f64> = simplex[0]
                        .iter()
                        .zip(&simplex[j])
                        .map(|(&b, &x)| b + sigma * (x - b))
                        .collect();
                    costs[j] = f.call(&shrunk)?;
                    simplex[j] = shrunk;
                }
            }

            iteration += 1;
            if self.verbose {
                info!(iteration, best = costs[0], evaluations = f.evaluations(), "nelder-mead");
            } else {
                debug!(iteration, best = costs[0], evaluations = f.evaluations(), "nelder-mead");
            }
        }

        if !converged {
            sort_simplex(&mut simplex, &mut costs);
            if self.check_convergence(&simplex, &costs) {
                converged = true;
            } else {
                warn!(
                    iterations = iteration,
                    evaluations = f.evaluations(),
                    "nelder-mead stopped on its iteration/evaluation guard before converging"
                );
            }
        }

        Ok(f.finish(initial_params, iteration, converged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rosenbrock(x: &[f64]) -> Result<f64, OptError> {
        Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2))
    }

    #[test]
    fn test_nelder_mead_creation() {
        let opt = NelderMead::new()
            .with_tolerance(1e-6)
            .with_adaptive(true)
            .with_max_iterations(50);
        assert_eq!(opt.tolerance, 1e-6);
        assert!(opt.adaptive);
        assert_eq!(opt.max_iterations, Some(50));
        assert_eq!(opt.name(), "nelder-mead");
    }

    #[test]
    fn test_nelder_mead_quadratic() {
        let opt = NelderMead::new().with_tolerance(1e-8);
        let res = opt
            .minimize(|x: &[f64]| Ok::<_, OptError>(x[0] * x[0]), vec![2.0])
            .unwrap();
        assert!(res.optimal_value < 1e-6);
        assert!(res.converged);
        assert_eq!(res.num_evaluations, res.history.len());
    }

    #[test]
    fn test_nelder_mead_rosenbrock() {
        let opt = NelderMead::new()
            .with_tolerance(1e-10)
            .with_max_iterations(2000)
            .with_max_evaluations(4000);
        let res = opt.minimize(rosenbrock, vec![-1.2, 1.0]).unwrap();
        assert!((res.optimal_params[0] - 1.0).abs() < 1e-3, "{:?}", res.optimal_params);
        assert!((res.optimal_params[1] - 1.0).abs() < 1e-3, "{:?}", res.optimal_params);
    }

    #[test]
    fn test_adaptive_coefficients() {
        let c = Coefficients::for_dimension(4, true);
        assert_eq!(c.chi, 1.5);
        assert_eq!(c.psi, 0.625);
        assert_eq!(c.sigma, 0.75);
        let s = Coefficients::for_dimension(4, false);
        assert_eq!((s.rho, s.chi, s.psi, s.sigma), (1.0, 2.0, 0.5, 0.5));
    }

    #[test]
    fn test_evaluation_guard() {
        let opt = NelderMead::new().with_tolerance(0.0).with_max_evaluations(20);
        let res = opt.minimize(rosenbrock, vec![-1.2, 1.0]).unwrap();
        assert!(!res.converged);
        // One iteration may overshoot the guard by at most n + 1 evaluations.
        assert!(res.num_evaluations <= 20 + 3);
    }

    #[test]
    fn test_initial_simplex() {
        let opt = NelderMead::new().with_initial_step(0.2);
        let simplex = opt.initial_simplex(&[0.0, 2.0]);
        assert_eq!(simplex, vec![vec![0.0, 2.0], vec![0.2, 2.0], vec![0.0, 2.4]]);
    }

    #[test]
    fn test_empty_parameters() {
        let res = NelderMead::new().minimize(rosenbrock, vec![]);
        assert!(matches!(res, Err(OptError::EmptyParameters)));
    }

    #[test]
    fn test_objective_error_aborts() {
        let mut calls = 0;
        let res = NelderMead::new().minimize(
            |_: &[f64]| {
                calls += 1;
                if calls > 3 {
                    Err(OptError::EmptyParameters)
                } else {
                    Ok(f64::from(calls))
                }
            },
            vec![0.0, 0.0],
        );
        assert!(res.is_err());
        assert_eq!(calls, 4);
    }
}
