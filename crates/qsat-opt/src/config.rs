//! Optimiser selection and typed options.
//!
//! Run files carry an algorithm tag (`nelder-mead`, `cma-es` or `bfgs`, or
//! the generic names `direct-search`, `evolutionary` and `quasi-newton`)
//! next to a free-form options map. [`OptimiserConfig::from_parts`] turns
//! the pair into a typed configuration, rejecting unknown tags, unknown
//! option keys, out-of-range values and options that name a different
//! algorithm.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{OptError, OptResult};
use crate::{Bfgs, CmaEs, NelderMead, OptimizationResult, Optimizer};

/// Key under which option maps may repeat the algorithm tag.
pub const TAG_KEY: &str = "classical_opt_alg";

/// The implemented classical optimisers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Simplex direct search.
    #[serde(alias = "direct-search")]
    NelderMead,
    /// Covariance matrix adaptation evolution strategy.
    #[serde(alias = "evolutionary")]
    CmaEs,
    /// Quasi-Newton with finite-difference gradients.
    #[serde(alias = "quasi-newton")]
    Bfgs,
}

impl Algorithm {
    /// All algorithms, in tag order.
    pub const ALL: [Algorithm; 3] = [Algorithm::NelderMead, Algorithm::CmaEs, Algorithm::Bfgs];

    /// The configuration tag.
    pub fn tag(self) -> &'static str {
        match self {
            Algorithm::NelderMead => "nelder-mead",
            Algorithm::CmaEs => "cma-es",
            Algorithm::Bfgs => "bfgs",
        }
    }

    /// The generic name of the method family.
    pub fn family(self) -> &'static str {
        match self {
            Algorithm::NelderMead => "direct-search",
            Algorithm::CmaEs => "evolutionary",
            Algorithm::Bfgs => "quasi-newton",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Algorithm {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.tag() == s || a.family() == s)
            .ok_or_else(|| OptError::UnknownAlgorithm(s.to_string()))
    }
}

/// Nelder–Mead options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NelderMeadOptions {
    /// Convergence tolerance on simplex spread.
    #[serde(alias = "xtol")]
    pub tolerance: f64,
    /// Log every iteration at info level.
    #[serde(alias = "disp")]
    pub verbose: bool,
    /// Dimension-dependent coefficients.
    pub adaptive: bool,
    /// Initial simplex step.
    #[serde(alias = "simplex_area_param")]
    pub initial_step: f64,
    /// Maximum objective evaluations.
    pub budget: Option<usize>,
    /// Maximum iterations.
    pub max_iterations: Option<usize>,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            verbose: false,
            adaptive: false,
            initial_step: 0.1,
            budget: None,
            max_iterations: None,
        }
    }
}

/// CMA-ES options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CmaEsOptions {
    /// Maximum objective evaluations.
    pub budget: Option<usize>,
    /// RNG seed.
    pub seed: Option<u64>,
    /// Offspring per generation.
    pub population_size: Option<usize>,
    /// Function-value tolerance.
    pub tolfun: f64,
    /// Maximum generations.
    pub max_iterations: Option<usize>,
}

impl Default for CmaEsOptions {
    fn default() -> Self {
        Self {
            budget: None,
            seed: None,
            population_size: None,
            tolfun: 1e-11,
            max_iterations: None,
        }
    }
}

/// BFGS options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BfgsOptions {
    /// Gradient infinity-norm tolerance.
    pub gtol: f64,
    /// Relative finite-difference step.
    #[serde(alias = "eps")]
    pub epsilon: f64,
    /// Maximum iterations.
    #[serde(alias = "maxiter")]
    pub max_iterations: Option<usize>,
    /// Maximum objective evaluations.
    pub budget: Option<usize>,
}

impl Default for BfgsOptions {
    fn default() -> Self {
        Self {
            gtol: 1e-5,
            epsilon: f64::EPSILON.sqrt(),
            max_iterations: None,
            budget: None,
        }
    }
}

fn check_non_negative(algorithm: Algorithm, name: &str, value: f64) -> OptResult<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(invalid(algorithm, format!("{name} must be finite and >= 0, got {value}")));
    }
    Ok(())
}

fn check_positive(algorithm: Algorithm, name: &str, value: f64) -> OptResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(algorithm, format!("{name} must be finite and > 0, got {value}")));
    }
    Ok(())
}

fn check_at_least(algorithm: Algorithm, name: &str, value: Option<usize>, min: usize) -> OptResult<()> {
    match value {
        Some(v) if v < min => Err(invalid(algorithm, format!("{name} must be at least {min}, got {v}"))),
        _ => Ok(()),
    }
}

impl NelderMeadOptions {
    /// Validate option values.
    pub fn validate(&self) -> OptResult<()> {
        let alg = Algorithm::NelderMead;
        check_non_negative(alg, "tolerance", self.tolerance)?;
        check_positive(alg, "initial_step", self.initial_step)?;
        check_at_least(alg, "budget", self.budget, 1)?;
        check_at_least(alg, "max_iterations", self.max_iterations, 1)
    }
}

impl CmaEsOptions {
    /// Validate option values.
    pub fn validate(&self) -> OptResult<()> {
        let alg = Algorithm::CmaEs;
        check_non_negative(alg, "tolfun", self.tolfun)?;
        check_at_least(alg, "budget", self.budget, 1)?;
        check_at_least(alg, "population_size", self.population_size, 2)?;
        check_at_least(alg, "max_iterations", self.max_iterations, 1)
    }
}

impl BfgsOptions {
    /// Validate option values.
    pub fn validate(&self) -> OptResult<()> {
        let alg = Algorithm::Bfgs;
        check_non_negative(alg, "gtol", self.gtol)?;
        check_positive(alg, "epsilon", self.epsilon)?;
        check_at_least(alg, "budget", self.budget, 1)?;
        check_at_least(alg, "max_iterations", self.max_iterations, 1)
    }
}

/// A selected optimiser together with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "classical_opt_alg", rename_all = "kebab-case")]
pub enum OptimiserConfig {
    /// Nelder–Mead.
    #[serde(alias = "direct-search")]
    NelderMead(NelderMeadOptions),
    /// CMA-ES.
    #[serde(alias = "evolutionary")]
    CmaEs(CmaEsOptions),
    /// BFGS.
    #[serde(alias = "quasi-newton")]
    Bfgs(BfgsOptions),
}

impl Default for OptimiserConfig {
    fn default() -> Self {
        OptimiserConfig::NelderMead(NelderMeadOptions::default())
    }
}

fn invalid(algorithm: Algorithm, message: impl fmt::Display) -> OptError {
    OptError::InvalidOptions {
        algorithm: algorithm.tag().to_string(),
        message: message.to_string(),
    }
}

impl OptimiserConfig {
    /// Build a configuration from an algorithm tag and a free-form options map.
    ///
    /// `null` options mean defaults. If the map repeats the tag under
    /// `classical_opt_alg` it must name the same algorithm as `tag`. Option
    /// values are range-checked here, before any objective is evaluated.
    pub fn from_parts(tag: &str, options: serde_json::Value) -> OptResult<Self> {
        let algorithm: Algorithm = tag.parse()?;
        let mut map = match options {
            serde_json::Value::Null => serde_json::Map::new(),
            serde_json::Value::Object(map) => map,
            other => {
                return Err(invalid(
                    algorithm,
                    format!("expected an options map, found {other}"),
                ));
            }
        };

        if let Some(embedded) = map.remove(TAG_KEY) {
            let embedded = embedded
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| embedded.to_string());
            if embedded.parse::<Algorithm>().ok() != Some(algorithm) {
                return Err(OptError::Mismatch {
                    selected: algorithm.tag().to_string(),
                    options: embedded,
                });
            }
        }

        let value = serde_json::Value::Object(map);
        let config = match algorithm {
            Algorithm::NelderMead => OptimiserConfig::NelderMead(
                serde_json::from_value(value).map_err(|e| invalid(algorithm, e))?,
            ),
            Algorithm::CmaEs => OptimiserConfig::CmaEs(
                serde_json::from_value(value).map_err(|e| invalid(algorithm, e))?,
            ),
            Algorithm::Bfgs => OptimiserConfig::Bfgs(
                serde_json::from_value(value).map_err(|e| invalid(algorithm, e))?,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the options of the selected algorithm.
    pub fn validate(&self) -> OptResult<()> {
        match self {
            OptimiserConfig::NelderMead(o) => o.validate(),
            OptimiserConfig::CmaEs(o) => o.validate(),
            OptimiserConfig::Bfgs(o) => o.validate(),
        }
    }

    /// The selected algorithm.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            OptimiserConfig::NelderMead(_) => Algorithm::NelderMead,
            OptimiserConfig::CmaEs(_) => Algorithm::CmaEs,
            OptimiserConfig::Bfgs(_) => Algorithm::Bfgs,
        }
    }

    /// The evaluation budget, if one is set.
    pub fn budget(&self) -> Option<usize> {
        match self {
            OptimiserConfig::NelderMead(o) => o.budget,
            OptimiserConfig::CmaEs(o) => o.budget,
            OptimiserConfig::Bfgs(o) => o.budget,
        }
    }

    /// Options as a JSON map, with the tag included.
    pub fn to_options_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Run the configured optimiser.
    pub fn minimize<F, E>(&self, objective: F, initial_params: Vec<f64>) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        E: From<OptError>,
    {
        match self {
            OptimiserConfig::NelderMead(o) => {
                let mut opt = NelderMead::new()
                    .with_tolerance(o.tolerance)
                    .with_adaptive(o.adaptive)
                    .with_initial_step(o.initial_step)
                    .with_verbose(o.verbose);
                if let Some(budget) = o.budget {
                    opt = opt.with_max_evaluations(budget);
                }
                if let Some(max_iter) = o.max_iterations {
                    opt = opt.with_max_iterations(max_iter);
                }
                opt.minimize(objective, initial_params)
            }
            OptimiserConfig::CmaEs(o) => {
                let mut opt = CmaEs::new().with_tolfun(o.tolfun);
                if let Some(budget) = o.budget {
                    opt = opt.with_budget(budget);
                }
                if let Some(seed) = o.seed {
                    opt = opt.with_seed(seed);
                }
                if let Some(lambda) = o.population_size {
                    opt = opt.with_population_size(lambda);
                }
                if let Some(max_iter) = o.max_iterations {
                    opt = opt.with_max_iterations(max_iter);
                }
                opt.minimize(objective, initial_params)
            }
            OptimiserConfig::Bfgs(o) => {
                let mut opt = Bfgs::new().with_gtol(o.gtol).with_epsilon(o.epsilon);
                if let Some(max_iter) = o.max_iterations {
                    opt = opt.with_max_iterations(max_iter);
                }
                if let Some(budget) = o.budget {
                    opt = opt.with_max_evaluations(budget);
                }
                opt.minimize(objective, initial_params)
            }
        }
    }
}
