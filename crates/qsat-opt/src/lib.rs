//! Classical optimisers for variational parameter search.
//!
//! Three structurally different strategies share one contract, the
//! [`Optimizer`] trait:
//!
//! - [`NelderMead`]: simplex direct search
//! - [`CmaEs`]: covariance matrix adaptation evolution strategy
//! - [`Bfgs`]: quasi-Newton with finite-difference gradients
//!
//! Objectives are fallible. An error returned by the objective stops the
//! search immediately and is handed back to the caller unchanged. The
//! objective may carry side effects (it usually re-simulates a circuit and
//! records a trajectory), so no optimiser caches or replays calls.
//!
//! [`OptimiserConfig`] selects one of the three from a tag and a typed
//! options record.
//!
//! # Example
//!
//! ```rust
//! use qsat_opt::{NelderMead, OptError, Optimizer};
//!
//! let opt = NelderMead::new().with_tolerance(1e-8);
//! let result = opt
//!     .minimize(
//!         |x: &[f64]| Ok::<_, OptError>((x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2)),
//!         vec![0.0, 0.0],
//!     )
//!     .unwrap();
//! assert!((result.optimal_params[0] - 1.0).abs() < 1e-3);
//! assert!((result.optimal_params[1] + 2.0).abs() < 1e-3);
//! ```

pub mod bfgs;
pub mod cma_es;
pub mod config;
pub mod error;
pub mod nelder_mead;
mod tracked;

pub use bfgs::Bfgs;
pub use cma_es::CmaEs;
pub use config::{Algorithm, BfgsOptions, CmaEsOptions, NelderMeadOptions, OptimiserConfig};
pub use error::{OptError, OptResult};
pub use nelder_mead::NelderMead;

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// History of objective values, one per evaluation.
    pub history: Vec<f64>,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// A minimiser over flat real parameter vectors.
pub trait Optimizer {
    /// Short algorithm name, as used in configuration tags.
    fn name(&self) -> &'static str;

    /// Minimise `objective` starting from `initial_params`.
    ///
    /// Returns the best point seen. Errors from the objective abort the run.
    fn minimize<F, E>(&self, objective: F, initial_params: Vec<f64>) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        E: From<OptError>;
}
