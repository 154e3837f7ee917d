//! Landscape command implementation.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qsat_qaoa::LandscapeScan;

use super::common::{load_instance, write_json};

/// Execute the landscape command.
pub fn execute(instance_path: &str, step: f64, output: Option<&str>) -> Result<()> {
    let problem = load_instance(instance_path)?;
    let groups = problem.term_groups()?;
    let mut scan = LandscapeScan::new(groups)?.with_step(step)?;

    eprintln!(
        "{} Scanning {} ({} points, step {step})",
        style("→").cyan().bold(),
        style(instance_path).green(),
        scan.len()
    );

    let pb = ProgressBar::new(scan.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("=> "),
    );
    let points = scan.run_with(|p| {
        pb.set_message(format!("E = {:+.4}", p.energy));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    if let Some(best) = points.iter().min_by(|a, b| a.energy.total_cmp(&b.energy)) {
        eprintln!(
            "  Minimum {} at alpha = {:.2}, beta = {:.2}",
            style(format!("{:.6}", best.energy)).yellow(),
            best.alpha,
            best.beta
        );
    }

    write_json(&points, output)
}
