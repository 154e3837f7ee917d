//! The QAOA ansatz for a weighted 3-SAT instance.
//!
//! A [`QaoaInstance`] owns the three term groups, the round count and the
//! two angle vectors. Every call to [`QaoaInstance::cost_function`] rebuilds
//! the circuit for the proposed angles, simulates it exactly, measures the
//! energy against the cost Hamiltonian and appends a trajectory row.
//!
//! Circuit layout, per round `r`:
//!
//! ```text
//! round 0 only:  H on every qubit, barrier
//! single terms:  rz(θ) q_i
//! double terms:  cx q_i, q_j; rz(θ) q_j; cx q_i, q_j
//! triple terms:  cx q_i, q_j; cx q_j, q_k; rz(θ) q_k; cx q_j, q_k; cx q_i, q_j
//! mixer:         barrier, rx(beta[r]) on every qubit, barrier
//! ```
//!
//! with `θ = -2 · alpha[r] · coefficient`.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, info};

use qsat_ir::{Circuit, QubitId};
use qsat_opt::{OptimizationResult, OptimiserConfig};
use qsat_sim::{Arity, Statevector, TermGroup, basis_index, cost_hamiltonian};

use crate::error::{QaoaError, QaoaResult};
use crate::problem::{ProblemInstance, TermGroups};
use crate::trajectory::Trajectory;

/// Phase-layer rotation angle for a term with `coefficient` in a round with `alpha`.
pub fn rotation_angle(alpha: f64, coefficient: f64) -> f64 {
    -2.0 * alpha * coefficient
}

/// Simulator state for one optimisation run.
#[derive(Debug, Clone)]
pub struct QaoaInstance {
    n_qubits: u32,
    n_rounds: usize,
    single: TermGroup,
    double: TermGroup,
    triple: TermGroup,
    alpha: Vec<f64>,
    beta: Vec<f64>,
    sat_assgn: Option<String>,
    circuit: Option<Circuit>,
    statevector: Option<Statevector>,
    hamiltonian: Option<Array2<Complex64>>,
    energy: f64,
    classical_iter: usize,
    trajectory: Trajectory,
    pdf: Option<Vec<f64>>,
}

fn check_group(group: &TermGroup, slot: Arity, n_qubits: u32) -> QaoaResult<()> {
    if group.arity() != slot {
        return Err(QaoaError::GroupArity {
            expected: slot,
            got: group.arity(),
        });
    }
    if group.n_qubits() != n_qubits {
        return Err(QaoaError::RegisterMismatch {
            arity: slot,
            expected: n_qubits,
            got: group.n_qubits(),
        });
    }
    Ok(())
}

fn check_angles(name: &'static str, angles: &[f64], n_rounds: usize) -> QaoaResult<()> {
    if angles.len() != n_rounds {
        return Err(QaoaError::AngleLength {
            name,
            expected: n_rounds,
            got: angles.len(),
        });
    }
    Ok(())
}

impl QaoaInstance {
    /// Create an instance from term groups and initial angles.
    pub fn new(
        groups: TermGroups,
        n_rounds: usize,
        alpha: Vec<f64>,
        beta: Vec<f64>,
    ) -> QaoaResult<Self> {
        let n_qubits = groups.n_qubits();
        qsat_sim::hamiltonian::check_qubit_count(n_qubits)?;
        check_group(&groups.single, Arity::Single, n_qubits)?;
        check_group(&groups.double, Arity::Double, n_qubits)?;
        check_group(&groups.triple, Arity::Triple, n_qubits)?;
        if n_rounds == 0 {
            return Err(QaoaError::ZeroRounds);
        }
        check_angles("alpha", &alpha, n_rounds)?;
        check_angles("beta", &beta, n_rounds)?;

        Ok(Self {
            n_qubits,
            n_rounds,
            single: groups.single,
            double: groups.double,
            triple: groups.triple,
            alpha,
            beta,
            sat_assgn: None,
            circuit: None,
            statevector: None,
            hamiltonian: None,
            energy: 0.0,
            classical_iter: 0,
            trajectory: Trajectory::new(),
            pdf: None,
        })
    }

    /// Create an instance for a parsed problem, carrying its satisfying assignment.
    pub fn from_problem(
        problem: &ProblemInstance,
        n_rounds: usize,
        alpha: Vec<f64>,
        beta: Vec<f64>,
    ) -> QaoaResult<Self> {
        Self::new(problem.term_groups()?, n_rounds, alpha, beta)?
            .with_sat_assgn(problem.sat_assgn.clone())
    }

    /// Attach the known satisfying assignment.
    pub fn with_sat_assgn(mut self, label: impl Into<String>) -> QaoaResult<Self> {
        let label = label.into();
        basis_index(&label, self.n_qubits)?;
        self.sat_assgn = Some(label);
        Ok(self)
    }

    // ==================================================================
    // Angles
    // ==================================================================

    /// Replace the phase angles.
    pub fn set_alpha(&mut self, alpha: Vec<f64>) -> QaoaResult<()> {
        check_angles("alpha", &alpha, self.n_rounds)?;
        self.alpha = alpha;
        Ok(())
    }

    /// Replace the mixing angles.
    pub fn set_beta(&mut self, beta: Vec<f64>) -> QaoaResult<()> {
        check_angles("beta", &beta, self.n_rounds)?;
        self.beta = beta;
        Ok(())
    }

    /// Split a flat `alpha ++ beta` vector into the two angle vectors.
    pub fn set_parameters(&mut self, params: &[f64]) -> QaoaResult<()> {
        if params.len() != 2 * self.n_rounds {
            return Err(QaoaError::ParameterLength {
                expected: 2 * self.n_rounds,
                got: params.len(),
            });
        }
        let (alpha, beta) = params.split_at(self.n_rounds);
        self.alpha = alpha.to_vec();
        self.beta = beta.to_vec();
        Ok(())
    }

    /// Flat `alpha ++ beta` vector.
    pub fn parameters(&self) -> Vec<f64> {
        self.alpha.iter().chain(&self.beta).copied().collect()
    }

    // ==================================================================
    // Circuit, simulation, energy
    // ==================================================================

    /// Build the ansatz circuit for the current angles, replacing any previous one.
    pub fn build_circuit(&mut self) -> QaoaResult<&Circuit> {
        let mut circuit = Circuit::with_size(format!("qaoa_p{}", self.n_rounds), self.n_qubits);
        for q in circuit.qubit_ids() {
            circuit.h(q)?;
        }
        circuit.barrier_all()?;

        for (&alpha, &beta) in self.alpha.iter().zip(&self.beta) {
            for term in self.single.terms() {
                let theta = rotation_angle(alpha, term.coefficient);
                circuit.rz(theta, QubitId(term.qubits[0]))?;
            }
            for term in self.double.terms() {
                let theta = rotation_angle(alpha, term.coefficient);
                let (i, j) = (QubitId(term.qubits[0]), QubitId(term.qubits[1]));
                circuit.cx(i, j)?;
                circuit.rz(theta, j)?;
                circuit.cx(i, j)?;
            }
            for term in self.triple.terms() {
                let theta = rotation_angle(alpha, term.coefficient);
                let (i, j, k) = (
                    QubitId(term.qubits[0]),
                    QubitId(term.qubits[1]),
                    QubitId(term.qubits[2]),
                );
                circuit.cx(i, j)?;
                circuit.cx(j, k)?;
                circuit.rz(theta, k)?;
                circuit.cx(j, k)?;
                circuit.cx(i, j)?;
            }
            circuit.barrier_all()?;
            for q in circuit.qubit_ids() {
                circuit.rx(beta, q)?;
            }
            circuit.barrier_all()?;
        }

        Ok(self.circuit.insert(circuit))
    }

    /// Simulate the built circuit from |0...0⟩.
    pub fn simulate_circuit(&mut self) -> QaoaResult<&Statevector> {
        let circuit = self.circuit.as_ref().ok_or(QaoaError::CircuitNotBuilt)?;
        let state = Statevector::from_circuit(circuit)?;
        Ok(self.statevector.insert(state))
    }

    /// Build the cost Hamiltonian once and return it.
    pub fn build_hamiltonian(&mut self) -> QaoaResult<&Array2<Complex64>> {
        let h = match self.hamiltonian.take() {
            Some(h) => h,
            None => {
                let h = cost_hamiltonian(&mut [&mut self.single, &mut self.double, &mut self.triple])?;
                debug!(n_qubits = self.n_qubits, dim = h.nrows(), "built cost hamiltonian");
                h
            }
        };
        Ok(self.hamiltonian.insert(h))
    }

    /// Energy of the simulated state against the cost Hamiltonian.
    pub fn measure_energy(&mut self) -> QaoaResult<f64> {
        self.build_hamiltonian()?;
        let (Some(h), Some(state)) = (&self.hamiltonian, &self.statevector) else {
            return Err(QaoaError::NotSimulated);
        };
        self.energy = qsat_sim::energy(h, state)?;
        Ok(self.energy)
    }

    /// Build, simulate and measure at the given angles without recording anything.
    pub fn evaluate(&mut self, alpha: Vec<f64>, beta: Vec<f64>) -> QaoaResult<f64> {
        self.set_alpha(alpha)?;
        self.set_beta(beta)?;
        self.build_circuit()?;
        self.simulate_circuit()?;
        self.measure_energy()
    }

    /// Objective handed to the optimiser.
    ///
    /// Takes the flat `alpha ++ beta` vector, re-simulates, counts the call
    /// and appends a trajectory row.
    pub fn cost_function(&mut self, params: &[f64]) -> QaoaResult<f64> {
        self.set_parameters(params)?;
        self.build_circuit()?;
        self.classical_iter += 1;
        self.simulate_circuit()?;
        let energy = self.measure_energy()?;
        debug!(
            iteration = self.classical_iter,
            alpha = ?self.alpha,
            beta = ?self.beta,
            energy,
            "cost function evaluation"
        );
        self.trajectory
            .push(self.alpha.clone(), self.beta.clone(), energy);
        Ok(energy)
    }

    /// Minimise the energy over the angles with the configured optimiser.
    ///
    /// On return the instance holds the best angles found, with their
    /// circuit, state and energy.
    pub fn optimise_circuit(&mut self, config: &OptimiserConfig) -> QaoaResult<OptimizationResult> {
        if self.circuit.is_none() {
            return Err(QaoaError::CircuitNotBuilt);
        }
        info!(
            algorithm = %config.algorithm(),
            n_qubits = self.n_qubits,
            n_rounds = self.n_rounds,
            "starting classical optimisation"
        );

        let initial = self.parameters();
        let result = config.minimize(|params: &[f64]| self.cost_function(params), initial)?;

        let (alpha, beta) = result.optimal_params.split_at(self.n_rounds);
        self.evaluate(alpha.to_vec(), beta.to_vec())?;
        info!(
            energy = self.energy,
            evaluations = self.classical_iter,
            converged = result.converged,
            "classical optimisation finished"
        );
        Ok(result)
    }

    // ==================================================================
    // Distribution
    // ==================================================================

    /// Probability of every basis state of the simulated state.
    pub fn calculate_pdf(&mut self) -> QaoaResult<&[f64]> {
        let state = self.statevector.as_ref().ok_or(QaoaError::NotSimulated)?;
        let pdf = self.pdf.insert(state.probabilities());
        Ok(pdf.as_slice())
    }

    /// Probability of the satisfying assignment in the simulated state.
    pub fn p_success(&self) -> QaoaResult<f64> {
        let label = self
            .sat_assgn
            .as_deref()
            .ok_or(QaoaError::NoSatisfyingAssignment)?;
        let state = self.statevector.as_ref().ok_or(QaoaError::NotSimulated)?;
        Ok(state.probability_of(label)?)
    }

    // ==================================================================
    // Accessors
    // ==================================================================

    /// Register size.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// Number of rounds.
    pub fn n_rounds(&self) -> usize {
        self.n_rounds
    }

    /// Current phase angles.
    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    /// Current mixing angles.
    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    /// The most recently built circuit.
    pub fn circuit(&self) -> Option<&Circuit> {
        self.circuit.as_ref()
    }

    /// The most recently simulated state.
    pub fn statevector(&self) -> Option<&Statevector> {
        self.statevector.as_ref()
    }

    /// The cost Hamiltonian, if built.
    pub fn hamiltonian(&self) -> Option<&Array2<Complex64>> {
        self.hamiltonian.as_ref()
    }

    /// Most recently measured energy, `0.0` before the first measurement.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Number of cost-function evaluations so far.
    pub fn classical_iter(&self) -> usize {
        self.classical_iter
    }

    /// Recorded evaluations.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Last computed distribution.
    pub fn pdf(&self) -> Option<&[f64]> {
        self.pdf.as_deref()
    }

    /// Satisfying assignment, if known.
    pub fn sat_assgn(&self) -> Option<&str> {
        self.sat_assgn.as_deref()
    }

    /// Term group of the given arity.
    pub fn term_group(&self, arity: Arity) -> &TermGroup {
        match arity {
            Arity::Single => &self.single,
            Arity::Double => &self.double,
            Arity::Triple => &self.triple,
        }
    }
}
