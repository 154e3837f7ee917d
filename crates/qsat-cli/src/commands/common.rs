//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qsat_qaoa::{ProblemInstance, RunParams, RunParamsFile};

/// Load a problem instance file.
pub fn load_instance(path: &str) -> Result<ProblemInstance> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    ProblemInstance::from_file(path).with_context(|| format!("Failed to load instance: {path}"))
}

/// Load a run-parameter file without validating it.
pub fn load_params_file(path: &str) -> Result<RunParamsFile> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    RunParamsFile::from_file(path).with_context(|| format!("Failed to read run parameters: {path}"))
}

/// Load and validate a run-parameter file.
pub fn load_params(path: &str) -> Result<RunParams> {
    let file = load_params_file(path)?;
    RunParams::try_from(file).with_context(|| format!("Invalid run parameters in {path}"))
}

/// Write `value` as pretty JSON to `output`, or to stdout.
pub fn write_json<T: Serialize>(value: &T, output: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write output: {path}"))?;
            println!("{} Wrote {}", style("✓").green().bold(), style(path).green());
        }
        None => println!("{json}"),
    }
    Ok(())
}
