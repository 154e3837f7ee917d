//! Grid command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qsat_qaoa::ParamsGrid;

use super::common::load_params_file;

/// Execute the grid command.
pub fn execute(grid_path: &str, template_path: &str, output_dir: &str) -> Result<()> {
    let grid = ParamsGrid::from_file(grid_path)
        .with_context(|| format!("Failed to load parameter grid: {grid_path}"))?;
    let template = load_params_file(template_path)?;
    let entries = grid.expand(&template).context("Invalid parameter grid")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {output_dir}"))?;

    for entry in &entries {
        let path = Path::new(output_dir).join(&entry.file_name);
        let json = serde_json::to_string_pretty(&entry.params)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote run parameters");
    }

    println!(
        "{} Wrote {} run file(s) to {}",
        style("✓").green().bold(),
        entries.len(),
        style(output_dir).green()
    );
    Ok(())
}
