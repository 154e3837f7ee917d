//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - QAOA for weighted 3-SAT",
        style("qsat").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsat-ir    Gate-sequence intermediate representation");
    println!("  qsat-sim   Statevector simulation and cost Hamiltonians");
    println!("  qsat-opt   Nelder-Mead, CMA-ES and BFGS optimisers");
    println!("  qsat-qaoa  Ansatz, experiment driver and parameter grids");
    println!("  qsat-cli   Command-line interface");
    println!();
    println!("Optimisers: {}", qsat_opt::Algorithm::ALL.map(|a| a.tag()).join(", "));
    println!("License:    {}", style("Apache-2.0").dim());
}
