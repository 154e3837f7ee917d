//! Run command implementation.

use anyhow::{Context, Result};
use console::style;

use qsat_qaoa::ExperimentRunner;

use super::common::{load_instance, load_params, write_json};

/// Execute the run command.
pub fn execute(instance_path: &str, params_path: &str, output: Option<&str>) -> Result<()> {
    let runner = ExperimentRunner::new(load_instance(instance_path)?, load_params(params_path)?);

    eprintln!(
        "{} Optimising {} ({} qubits) with {} over {} round(s)",
        style("→").cyan().bold(),
        style(instance_path).green(),
        runner.problem().n_qubits,
        style(runner.params().config.algorithm()).yellow(),
        runner.params().n_rounds
    );

    let report = runner.run().context("QAOA run failed")?;

    eprintln!(
        "  Energy:      {}",
        style(format!("{:.6}", report.energy)).yellow()
    );
    eprintln!("  alpha:       {:?}", report.alpha);
    eprintln!("  beta:        {:?}", report.beta);
    eprintln!("  Evaluations: {}", report.classical_iter);
    eprintln!(
        "  p(success):  {} for {}",
        style(format!("{:.4}", report.p_success)).green(),
        style(&report.sat_assgn).cyan()
    );

    write_json(&report, output)
}
