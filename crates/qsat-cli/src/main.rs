//! qsat command-line interface
//!
//! Runs QAOA optimisations on weighted 3-SAT instances, scans single-round
//! energy landscapes and expands parameter grids into run files.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{grid, landscape, run, version};

/// qsat - QAOA for weighted 3-SAT on an exact statevector simulator
#[derive(Parser)]
#[command(name = "qsat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimise the ansatz angles for an instance
    Run {
        /// Instance file (JSON)
        #[arg(short, long)]
        instance: String,

        /// Run-parameter file (YAML or JSON)
        #[arg(short, long)]
        params: String,

        /// Output file for the JSON report (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Scan the single-round energy landscape of an instance
    Landscape {
        /// Instance file (JSON)
        #[arg(short, long)]
        instance: String,

        /// Grid spacing in radians
        #[arg(short, long, default_value = "0.1")]
        step: f64,

        /// Output file for the JSON points (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Expand a parameter grid into run-parameter files
    Grid {
        /// Grid file (YAML)
        #[arg(short, long)]
        grid: String,

        /// Template run-parameter file (YAML or JSON)
        #[arg(short, long)]
        template: String,

        /// Directory to write the run files into
        #[arg(short, long, default_value = "params/ready")]
        output_dir: String,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            instance,
            params,
            output,
        } => run::execute(&instance, &params, output.as_deref()),

        Commands::Landscape {
            instance,
            step,
            output,
        } => landscape::execute(&instance, step, output.as_deref()),

        Commands::Grid {
            grid,
            template,
            output_dir,
        } => grid::execute(&grid, &template, &output_dir),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {e:#}", style("Error:").red().bold());
        std::process::exit(1);
    }
}
