//! `qsat-sim`: exact dense simulation for QAOA cost functions.
//!
//! - [`operators`]: single-qubit matrices and basis states
//! - [`hamiltonian`]: weighted Z-string terms grouped by arity, assembled
//!   into dense `2^n × 2^n` Hermitian matrices
//! - [`statevector`]: gate-by-gate simulation of a [`qsat_ir::Circuit`]
//! - [`energy`]: `Re(⟨ψ|H|ψ⟩)`
//!
//! # Quick start
//!
//! ```rust
//! use qsat_ir::{Circuit, QubitId};
//! use qsat_sim::energy::energy;
//! use qsat_sim::hamiltonian::{Arity, Term, TermGroup};
//! use qsat_sim::statevector::Statevector;
//!
//! let mut group = TermGroup::new(Arity::Single, 1, vec![Term::new(1.0, vec![0])]).unwrap();
//! let h = group.build_hamiltonian().clone();
//!
//! let mut circuit = Circuit::with_size("x", 1);
//! circuit.x(QubitId(0)).unwrap();
//! let state = Statevector::from_circuit(&circuit).unwrap();
//!
//! assert_eq!(energy(&h, &state).unwrap(), -1.0);
//! ```

pub mod energy;
pub mod error;
pub mod hamiltonian;
pub mod operators;
pub mod statevector;

pub use energy::{energy, expectation_value};
pub use error::{SimError, SimResult};
pub use hamiltonian::{Arity, MAX_QUBITS, Term, TermGroup, cost_hamiltonian};
pub use statevector::{Statevector, basis_index, basis_label};
