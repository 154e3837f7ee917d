//! Run-parameter files and parameter grids.
//!
//! A run-parameter file (YAML or JSON) looks like:
//!
//! ```yaml
//! classical_optimisation:
//!   classical_opt_alg: nelder-mead
//!   optimisation_opts: {xtol: 0.001, adaptive: true, budget: 200}
//!   n_rounds: 2
//!   alpha_trial: [0.0, 0.0]
//!   beta_trial: [0.0, 0.0]
//! ```
//!
//! `optimisation_opts` may also be a JSON-encoded string, and the trial angles
//! strings such as `"[0, 0]"`. A parameter grid crosses algorithms, budgets
//! and round counts into one run-parameter file per combination.

use serde::{Deserialize, Serialize};
use std::path::Path;

use qsat_opt::{Algorithm, OptimiserConfig};

use crate::error::{QaoaError, QaoaResult};

/// Trial angles, either a list or a JSON-encoded list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AngleList {
    /// Plain list.
    Values(Vec<f64>),
    /// JSON text of a list.
    Encoded(String),
}

impl AngleList {
    /// Decode into angles.
    pub fn values(&self) -> QaoaResult<Vec<f64>> {
        match self {
            AngleList::Values(v) => Ok(v.clone()),
            AngleList::Encoded(s) => Ok(serde_json::from_str(s)?),
        }
    }
}

/// The `classical_optimisation` section as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicalOptimisation {
    /// Algorithm tag.
    pub classical_opt_alg: String,
    /// Free-form options, a mapping or its JSON text.
    #[serde(default)]
    pub optimisation_opts: serde_json::Value,
    /// Number of ansatz rounds.
    pub n_rounds: usize,
    /// Initial phase angles.
    pub alpha_trial: AngleList,
    /// Initial mixing angles.
    pub beta_trial: AngleList,
}

/// A run-parameter file as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParamsFile {
    /// Optimiser section.
    pub classical_optimisation: ClassicalOptimisation,
    /// Anything else in the file, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RunParamsFile {
    /// Parse YAML text.
    pub fn from_yaml_str(s: &str) -> QaoaResult<Self> {
        Ok(serde_yaml_ng::from_str(s)?)
    }

    /// Parse JSON text.
    pub fn from_json_str(s: &str) -> QaoaResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a file, choosing JSON for `.json` and YAML otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> QaoaResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}

/// Validated run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    /// Optimiser and its options.
    pub config: OptimiserConfig,
    /// Number of ansatz rounds.
    pub n_rounds: usize,
    /// Initial phase angles.
    pub alpha: Vec<f64>,
    /// Initial mixing angles.
    pub beta: Vec<f64>,
}

impl RunParams {
    /// Create run parameters, checking the round count and angle lengths.
    pub fn new(
        config: OptimiserConfig,
        n_rounds: usize,
        alpha: Vec<f64>,
        beta: Vec<f64>,
    ) -> QaoaResult<Self> {
        if n_rounds == 0 {
            return Err(QaoaError::ZeroRounds);
        }
        for (name, angles) in [("alpha", &alpha), ("beta", &beta)] {
            if angles.len() != n_rounds {
                return Err(QaoaError::AngleLength {
                    name,
                    expected: n_rounds,
                    got: angles.len(),
                });
            }
        }
        Ok(Self {
            config,
            n_rounds,
            alpha,
            beta,
        })
    }

    /// Load and validate a run-parameter file.
    pub fn from_file(path: impl AsRef<Path>) -> QaoaResult<Self> {
        Self::try_from(RunParamsFile::from_file(path)?)
    }
}

impl TryFrom<RunParamsFile> for RunParams {
    type Error = QaoaError;

    fn try_from(file: RunParamsFile) -> QaoaResult<Self> {
        let section = file.classical_optimisation;
        let options = match section.optimisation_opts {
            serde_json::Value::String(text) => decode_options(&text)?,
            other => other,
        };
        let config = OptimiserConfig::from_parts(&section.classical_opt_alg, options)?;
        Self::new(
            config,
            section.n_rounds,
            section.alpha_trial.values()?,
            section.beta_trial.values()?,
        )
    }
}

/// Decode string-encoded options: JSON, or a Python dict literal as older
/// run files store them (`{'budget': 100, 'disp': True}`).
fn decode_options(text: &str) -> QaoaResult<serde_json::Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_json::from_str(&python_literal_to_json(text))
            .map_err(|_| QaoaError::from(json_err)),
    }
}

/// Rewrite single-quoted strings and `True`/`False`/`None` as JSON.
fn python_literal_to_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;
    while let Some(c) = chars.next() {
        match quote {
            Some(q) => match c {
                '\\' => match chars.next() {
                    Some('\'') => out.push('\''),
                    Some(next) => {
                        out.push('\\');
                        out.push(next);
                    }
                    None => out.push('\\'),
                },
                _ if c == q => {
                    out.push('"');
                    quote = None;
                }
                '"' => out.push_str("\\\""),
                _ => out.push(c),
            },
            None => match c {
                '\'' | '"' => {
                    out.push('"');
                    quote = Some(c);
                }
                _ if c.is_ascii_alphabetic() => {
                    let mut word = String::from(c);
                    while let Some(&next) = chars.peek() {
                        if !(next.is_ascii_alphanumeric() || next == '_') {
                            break;
                        }
                        word.push(next);
                        chars.next();
                    }
                    out.push_str(match word.as_str() {
                        "True" => "true",
                        "False" => "false",
                        "None" => "null",
                        other => other,
                    });
                }
                _ => out.push(c),
            },
        }
    }
    out
}

/// Options written for each grid point.
pub fn grid_options(algorithm: Algorithm, budget: usize) -> serde_json::Value {
    match algorithm {
        Algorithm::NelderMead => serde_json::json!({
            "classical_opt_alg": algorithm.tag(),
            "xtol": 0.001,
            "disp": true,
            "adaptive": true,
            "budget": budget,
        }),
        Algorithm::CmaEs | Algorithm::Bfgs => serde_json::json!({
            "classical_opt_alg": algorithm.tag(),
            "budget": budget,
        }),
    }
}

/// Cartesian grid over algorithms, budgets and round counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsGrid {
    /// Algorithm tags.
    pub classical_opt_alg: Vec<String>,
    /// Evaluation budgets.
    pub budget: Vec<usize>,
    /// Round counts.
    pub n_rounds: Vec<usize>,
}

/// One expanded grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct GridEntry {
    /// `<alg>_<budget>_<n_rounds>.json`.
    pub file_name: String,
    /// The run-parameter file to write.
    pub params: RunParamsFile,
}

impl ParamsGrid {
    /// Parse YAML text.
    pub fn from_yaml_str(s: &str) -> QaoaResult<Self> {
        Ok(serde_yaml_ng::from_str(s)?)
    }

    /// Load a grid file.
    pub fn from_file(path: impl AsRef<Path>) -> QaoaResult<Self> {
        Self::from_yaml_str(&std::fs::read_to_string(path)?)
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.classical_opt_alg.len() * self.budget.len() * self.n_rounds.len()
    }

    /// True if any axis is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expand into run-parameter files based on `template`, with zero trial angles.
    ///
    /// Every entry is validated as it would be when loaded for a run.
    pub fn expand(&self, template: &RunParamsFile) -> QaoaResult<Vec<GridEntry>> {
        let mut entries = Vec::with_capacity(self.len());
        for tag in &self.classical_opt_alg {
            let algorithm: Algorithm = tag.parse()?;
            for &budget in &self.budget {
                for &n_rounds in &self.n_rounds {
                    let mut params = template.clone();
                    params.classical_optimisation = ClassicalOptimisation {
                        classical_opt_alg: algorithm.tag().to_string(),
                        optimisation_opts: grid_options(algorithm, budget),
                        n_rounds,
                        alpha_trial: AngleList::Values(vec![0.0; n_rounds]),
                        beta_trial: AngleList::Values(vec![0.0; n_rounds]),
                    };
                    RunParams::try_from(params.clone())?;
                    entries.push(GridEntry {
                        file_name: format!("{}_{budget}_{n_rounds}.json", algorithm.tag()),
                        params,
                    });
                }
            }
        }
        Ok(entries)
    }
}
