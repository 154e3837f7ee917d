//! BFGS quasi-Newton optimizer with forward-difference gradients.

use tracing::{debug, warn};

use crate::error::OptError;
use crate::tracked::Tracked;
use crate::{OptimizationResult, Optimizer};

const ARMIJO_C1: f64 = 1e-4;
const BACKTRACK: f64 = 0.5;
const MAX_LINE_SEARCH: usize = 30;

/// BFGS optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Bfgs {
    /// Stop when the largest gradient component falls below this.
    pub gtol: f64,
    /// Relative finite-difference step.
    pub epsilon: f64,
    /// Maximum iterations. Defaults to `200 n`.
    pub max_iterations: Option<usize>,
    /// Maximum objective evaluations, finite-difference evaluations included.
    pub max_evaluations: Option<usize>,
}

impl Default for Bfgs {
    fn default() -> Self {
        Self {
            gtol: 1e-5,
            epsilon: f64::EPSILON.sqrt(),
            max_iterations: None,
            max_evaluations: None,
        }
    }
}

impl Bfgs {
    /// Create a new BFGS optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gradient tolerance.
    #[must_use]
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    /// Set the finite-difference step.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = Some(max_iter);
        self
    }

    /// Set maximum evaluations.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evals: usize) -> Self {
        self.max_evaluations = Some(max_evals);
        self
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn mat_vec(h: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    h.iter().map(|row| dot(row, v)).collect()
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Inverse-Hessian update `H ← (I - ρ s yᵀ) H (I - ρ y sᵀ) + ρ s sᵀ`.
fn update_inverse_hessian(h: &mut [Vec<f64>], s: &[f64], y: &[f64], rho: f64) {
    let n = s.len();
    let hy = mat_vec(h, y);
    let yhy = dot(y, &hy);
    for i in 0..n {
        for j in 0..n {
            h[i][j] += -rho * (hy[i] * s[j] + s[i] * hy[j]) + (rho * rho * yhy + rho) * s[i] * s[j];
        }
    }
}

impl Bfgs {
    fn gradient<F, E>(&self, f: &mut Tracked<F>, x: &[f64], fx: f64) -> Result<Option<Vec<f64>>, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let mut grad = Vec::with_capacity(x.len());
        let mut shifted = x.to_vec();
        for i in 0..x.len() {
            if f.exhausted() {
                return Ok(None);
            }
            let h = self.epsilon * x[i].abs().max(1.0);
            shifted[i] = x[i] + h;
            let fp = f.call(&shifted)?;
            shifted[i] = x[i];
            grad.push((fp - fx) / h);
        }
        Ok(Some(grad))
    }
}

impl Optimizer for Bfgs {
    fn name(&self) -> &'static str {
        "bfgs"
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
        let mut f = Tracked::new(objective, self.max_evaluations);

        let mut x = initial_params;
        let mut fx = f.call(&x)?;
        let Some(mut g) = self.gradient(&mut f, &x, fx)? else {
            return Ok(f.finish(x, 0, false));
        };
        let mut h = identity(n);
        let mut iteration = 0;
        let mut converged = false;

        while iteration < max_iterations {
            let gnorm = g.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            if gnorm < self.gtol {
                converged = true;
                break;
            }
            iteration += 1;

            let mut p: Vec<f64> = mat_vec(&h, &g).iter().map(|v| -v).collect();
            let mut slope = dot(&g, &p);
            if slope >= 0.0 {
                // Not a descent direction; restart from steepest descent.
                h = identity(n);
                p = g.iter().map(|v| -v).collect();
                slope = dot(&g, &p);
            }

            let mut step = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_LINE_SEARCH {
                if f.exhausted() {
                    break;
                }
                let candidate: Vec<f64> = x.iter().zip(&p).map(|(xi, pi)| xi + step * pi).collect();
                let fc = f.call(&candidate)?;
                if fc <= fx + ARMIJO_C1 * step * slope {
                    accepted = Some((candidate, fc));
                    break;
                }
                step *= BACKTRACK;
            }
            let Some((x_new, f_new)) = accepted else {
                if !f.exhausted() {
                    warn!(iteration, "bfgs line search failed to decrease the objective");
                }
                break;
            };

            let Some(g_new) = self.gradient(&mut f, &x_new, f_new)? else {
                x = x_new;
                break;
            };
            let s: Vec<f64> = x_new.iter().zip(&x).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = g_new.iter().zip(&g).map(|(a, b)| a - b).collect();
            let sy = dot(&s, &y);
            if sy > 1e-10 {
                update_inverse_hessian(&mut h, &s, &y, 1.0 / sy);
            }

            x = x_new;
            fx = f_new;
            g = g_new;
            debug!(iteration, value = fx, step, evaluations = f.evaluations(), "bfgs");
        }

        if !converged && iteration >= max_iterations {
            warn!(
                iterations = iteration,
                evaluations = f.evaluations(),
                "bfgs stopped on its iteration guard"
            );
        }

        Ok(f.finish(x, iteration, converged))
    }
}
