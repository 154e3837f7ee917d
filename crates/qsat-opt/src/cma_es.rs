//! CMA-ES (Covariance Matrix Adaptation Evolution Strategy) optimizer.
//!
//! `(μ/μ_w, λ)`-CMA-ES with cumulative step-size adaptation and combined
//! rank-one/rank-μ covariance updates, following Hansen's tutorial
//! parameterisation.
//!
//! The search starts from a point drawn uniformly from `[-π, π)` in every
//! coordinate; the caller's initial vector only sets the initial step size
//! (its standard deviation). Variational angles are periodic, so a random
//! start explores the landscape instead of refining the caller's guess.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use tracing::{debug, warn};

use crate::error::OptError;
use crate::tracked::Tracked;
use crate::{OptimizationResult, Optimizer};

/// Step size used when the initial vector has zero or undefined spread.
pub const FALLBACK_SIGMA: f64 = 0.5;

/// CMA-ES optimizer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CmaEs {
    /// Maximum number of objective evaluations.
    pub budget: Option<usize>,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Offspring per generation (λ). Defaults to `4 + ⌊3 ln n⌋`.
    pub population_size: Option<usize>,
    /// Stop when the recent spread of objective values falls below this.
    pub tolfun: f64,
    /// Stop when every coordinate's step falls below this.
    pub tolx: f64,
    /// Generation guard. Defaults to `100 + 150 (n + 3)² / √λ`.
    pub max_iterations: Option<usize>,
}

impl Default for CmaEs {
    fn default() -> Self {
        Self {
            budget: None,
            seed: None,
            population_size: None,
            tolfun: 1e-11,
            tolx: 1e-11,
            max_iterations: None,
        }
    }
}

impl CmaEs {
    /// Create a new CMA-ES optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the evaluation budget.
    #[must_use]
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the population size λ.
    #[must_use]
    pub fn with_population_size(mut self, lambda: usize) -> Self {
        self.population_size = Some(lambda);
        self
    }

    /// Set the function-value tolerance.
    #[must_use]
    pub fn with_tolfun(mut self, tol: f64) -> Self {
        self.tolfun = tol;
        self
    }

    /// Set maximum generations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = Some(max_iter);
        self
    }
}

/// Population standard deviation of `values`, as the initial step size.
///
/// Falls back to [`FALLBACK_SIGMA`] when the spread is zero or not finite.
pub fn initial_sigma(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let sigma = var.sqrt();
    if sigma.is_finite() && sigma > 0.0 {
        sigma
    } else {
        warn!(
            sigma,
            fallback = FALLBACK_SIGMA,
            "initial vector has no spread; using fallback CMA-ES step size"
        );
        FALLBACK_SIGMA
    }
}

/// Strategy constants derived from the dimension and population size.
#[derive(Debug, Clone)]
struct Params {
    lambda: usize,
    mu: usize,
    weights: Vec<f64>,
    mueff: f64,
    cc: f64,
    cs: f64,
    c1: f64,
    cmu: f64,
    damps: f64,
    chi_n: f64,
}

impl Params {
    fn new(n: usize, lambda: Option<usize>) -> Self {
        let dim = n as f64;
        let lambda = lambda
            .unwrap_or(4 + (3.0 * dim.ln()).floor() as usize)
            .max(2);
        let mu = lambda / 2;
        let raw: Vec<f64> = (1..=mu)
            .map(|i| (mu as f64 + 0.5).ln() - (i as f64).ln())
            .collect();
        let total: f64 = raw.iter().sum();
        let weights: Vec<f64> = raw.iter().map(|w| w / total).collect();
        let mueff = 1.0 / weights.iter().map(|w| w * w).sum::<f64>();

        let cc = (4.0 + mueff / dim) / (dim + 4.0 + 2.0 * mueff / dim);
        let cs = (mueff + 2.0) / (dim + mueff + 5.0);
        let c1 = 2.0 / ((dim + 1.3).powi(2) + mueff);
        let cmu = (1.0 - c1).min(2.0 * (mueff - 2.0 + 1.0 / mueff) / ((dim + 2.0).powi(2) + mueff));
        let damps = 1.0 + 2.0 * (((mueff - 1.0) / (dim + 1.0)).sqrt() - 1.0).max(0.0) + cs;
        let chi_n = dim.sqrt() * (1.0 - 1.0 / (4.0 * dim) + 1.0 / (21.0 * dim * dim));

        Self {
            lambda,
            mu,
            weights,
            mueff,
            cc,
            cs,
            c1,
            cmu,
            damps,
            chi_n,
        }
    }
}

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns the eigenvalues and a matrix whose columns are the eigenvectors.
pub fn symmetric_eigen(matrix: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = matrix.nrows();
    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);

    for _sweep in 0..100 {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[[i, j]].powi(2))
            .sum();
        if off < 1e-22 {
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                if a[[p, q]].abs() < 1e-300 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * a[[p, q]]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }
    (a.diag().to_owned(), v)
}

/// Standard normal sample via Box-Muller.
fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

impl Optimizer for CmaEs {
    fn name(&self) -> &'static str {
        "cma-es"
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
        let p = Params::new(n, self.population_size);
        let max_iterations = self.max_iterations.unwrap_or_else(|| {
            100 + (150.0 * ((n + 3) as f64).powi(2) / (p.lambda as f64).sqrt()) as usize
        });

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut sigma = initial_sigma(&initial_params);
        let mut mean: Array1<f64> = (0..n).map(|_| rng.gen_range(-PI..PI)).collect();
        let mut cov = Array2::<f64>::eye(n);
        let mut pc = Array1::<f64>::zeros(n);
        let mut ps = Array1::<f64>::zeros(n);
        let mut recent_best: Vec<f64> = Vec::new();
        let history_window = 10 + (30.0 * n as f64 / p.lambda as f64).ceil() as usize;

        debug!(
            n,
            lambda = p.lambda,
            mu = p.mu,
            sigma,
            max_iterations,
            "cma-es start"
        );

        let mut f = Tracked::new(objective, self.budget);
        let mut generation = 0;
        let mut converged = false;

        'outer: while generation < max_iterations {
            let (eigvals, basis) = symmetric_eigen(&cov);
            let d: Array1<f64> = eigvals.mapv(|e| e.max(1e-20).sqrt());

            let mut offspring: Vec<(Array1<f64>, Array1<f64>, f64)> = Vec::with_capacity(p.lambda);
            for _ in 0..p.lambda {
                if f.exhausted() {
                    break 'outer;
                }
                let z: Array1<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
                let y = basis.dot(&(&d * &z));
                let x = &mean + &(sigma * &y);
                let fx = f.call(&x.to_vec())?;
                offspring.push((x, y, fx));
            }
            offspring.sort_by(|a, b| a.2.total_cmp(&b.2));
            generation += 1;

            let old_mean = mean.clone();
            mean = Array1::zeros(n);
            for (w, (x, _, _)) in p.weights.iter().zip(&offspring) {
                mean = mean + *w * x;
            }
            let y_w = (&mean - &old_mean) / sigma;

            // C^{-1/2} y_w = B D^{-1} Bᵀ y_w
            let inv_sqrt_y = basis.dot(&(basis.t().dot(&y_w) / &d));
            ps = (1.0 - p.cs) * &ps + (p.cs * (2.0 - p.cs) * p.mueff).sqrt() * &inv_sqrt_y;
            let ps_norm = ps.dot(&ps).sqrt();
            let decay = 1.0 - (1.0 - p.cs).powi(2 * generation as i32);
            let hsig = ps_norm / decay.max(f64::MIN_POSITIVE).sqrt() / p.chi_n
                < 1.4 + 2.0 / (n as f64 + 1.0);
            let hsig_f = if hsig { 1.0 } else { 0.0 };
            pc = (1.0 - p.cc) * &pc + hsig_f * (p.cc * (2.0 - p.cc) * p.mueff).sqrt() * &y_w;

            let pc_col = pc.view().insert_axis(ndarray::Axis(1));
            let rank_one = pc_col.dot(&pc_col.t());
            let mut rank_mu = Array2::<f64>::zeros((n, n));
            for (w, (x, _, _)) in p.weights.iter().zip(&offspring) {
                let yi = (x - &old_mean) / sigma;
                let col = yi.view().insert_axis(ndarray::Axis(1));
                rank_mu = rank_mu + *w * &col.dot(&col.t());
            }
            cov = (1.0 - p.c1 - p.cmu) * &cov
                + p.c1 * (&rank_one + &((1.0 - hsig_f) * p.cc * (2.0 - p.cc) * &cov))
                + p.cmu * &rank_mu;
            // Re-symmetrise against rounding drift.
            cov = (&cov + &cov.t()) / 2.0;

            sigma *= ((p.cs / p.damps) * (ps_norm / p.chi_n - 1.0)).exp();

            let gen_best = offspring.first().map_or(f64::INFINITY, |o| o.2);
            let gen_worst = offspring.last().map_or(f64::INFINITY, |o| o.2);
            recent_best.push(gen_best);
            if recent_best.len() > history_window {
                recent_best.remove(0);
            }
            debug!(generation, best = gen_best, sigma, evaluations = f.evaluations(), "cma-es");

            let hist_spread = recent_best.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                - recent_best.iter().cloned().fold(f64::INFINITY, f64::min);
            if recent_best.len() >= history_window
                && (gen_worst - gen_best).max(hist_spread) < self.tolfun
            {
                converged = true;
                break;
            }
            let max_step = cov.diag().iter().fold(0.0_f64, |m, c| m.max(c.sqrt())) * sigma;
            if max_step < self.tolx || !sigma.is_finite() {
                converged = max_step < self.tolx;
                break;
            }
        }

        if !converged && generation >= max_iterations {
            warn!(
                generations = generation,
                evaluations = f.evaluations(),
                "cma-es stopped on its generation guard"
            );
        }

        Ok(f.finish(mean.to_vec(), generation, converged))
    }
}
