//! End-to-end QAOA runs.

use serde::Serialize;
use tracing::{debug, info};

use qsat_opt::{Algorithm, OptimiserConfig};

use crate::error::QaoaResult;
use crate::instance::QaoaInstance;
use crate::params::RunParams;
use crate::problem::ProblemInstance;
use crate::trajectory::{Trajectory, TrajectoryRow};

/// Lowest-energy trajectory row, tagged with the optimiser that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinEnergyRow {
    /// The row.
    #[serde(flatten)]
    pub row: TrajectoryRow,
    /// Algorithm tag.
    pub algorithm: Algorithm,
    /// Options the optimiser ran with.
    pub optimiser_opts: OptimiserConfig,
}

/// Everything a finished run reports.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    /// Register size.
    pub n_qubits: u32,
    /// Number of ansatz rounds.
    pub n_rounds: usize,
    /// Algorithm tag.
    pub algorithm: Algorithm,
    /// Options the optimiser ran with.
    pub optimiser_opts: OptimiserConfig,
    /// Initial phase angles.
    pub alpha_init: Vec<f64>,
    /// Initial mixing angles.
    pub beta_init: Vec<f64>,
    /// Best phase angles.
    pub alpha: Vec<f64>,
    /// Best mixing angles.
    pub beta: Vec<f64>,
    /// Energy at the best angles.
    pub energy: f64,
    /// Cost-function evaluations.
    pub classical_iter: usize,
    /// Optimiser iterations.
    pub optimiser_iterations: usize,
    /// Whether the optimiser reported convergence.
    pub converged: bool,
    /// Every evaluation in call order.
    pub trajectory: Trajectory,
    /// Lowest-energy row of the trajectory.
    pub min_energy: Option<MinEnergyRow>,
    /// Probability of every basis state at the best angles, qubit 0 first.
    pub pdf: Vec<f64>,
    /// Satisfying assignment.
    pub sat_assgn: String,
    /// Probability of the satisfying assignment.
    pub p_success: f64,
}

/// Runs one optimisation of a problem instance.
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    problem: ProblemInstance,
    params: RunParams,
}

impl ExperimentRunner {
    /// Create a runner.
    pub fn new(problem: ProblemInstance, params: RunParams) -> Self {
        Self { problem, params }
    }

    /// The problem instance.
    pub fn problem(&self) -> &ProblemInstance {
        &self.problem
    }

    /// The run parameters.
    pub fn params(&self) -> &RunParams {
        &self.params
    }

    /// Build the ansatz, optimise it and collect the report.
    pub fn run(&self) -> QaoaResult<ExperimentReport> {
        let params = &self.params;
        let mut instance = QaoaInstance::from_problem(
            &self.problem,
            params.n_rounds,
            params.alpha.clone(),
            params.beta.clone(),
        )?;

        let circuit = instance.build_circuit()?;
        info!(
            n_qubits = circuit.num_qubits(),
            gates = circuit.num_gates(),
            depth = circuit.depth(),
            "built ansatz circuit"
        );
        debug!("\n{circuit}");

        let result = instance.optimise_circuit(&params.config)?;
        let pdf = instance.calculate_pdf()?.to_vec();
        let p_success = instance.p_success()?;

        let min_energy = instance.trajectory().min_energy_row().map(|row| MinEnergyRow {
            row: row.clone(),
            algorithm: params.config.algorithm(),
            optimiser_opts: params.config.clone(),
        });

        info!(
            energy = instance.energy(),
            p_success,
            evaluations = instance.classical_iter(),
            "run finished"
        );

        Ok(ExperimentReport {
            n_qubits: instance.n_qubits(),
            n_rounds: instance.n_rounds(),
            algorithm: params.config.algorithm(),
            optimiser_opts: params.config.clone(),
            alpha_init: params.alpha.clone(),
            beta_init: params.beta.clone(),
            alpha: instance.alpha().to_vec(),
            beta: instance.beta().to_vec(),
            energy: instance.energy(),
            classical_iter: instance.classical_iter(),
            optimiser_iterations: result.num_iterations,
            converged: result.converged,
            trajectory: instance.trajectory().clone(),
            min_energy,
            pdf,
            sat_assgn: self.problem.sat_assgn.clone(),
            p_success,
        })
    }
}
