//! Gate-sequence representation for QAOA ansatz circuits.
//!
//! This crate holds the in-memory circuit that the ansatz builder writes to
//! and the statevector simulator reads from. A [`Circuit`] is a flat,
//! program-ordered list of [`Instruction`]s over a fixed qubit register; the
//! simulator consumes them front to back.
//!
//! # Example: the two-qubit phase block
//!
//! ```rust
//! use qsat_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("zz", 2);
//! circuit.h(QubitId(0)).unwrap().h(QubitId(1)).unwrap();
//! circuit.barrier_all().unwrap();
//!
//! // exp(-i θ/2 Z⊗Z) as CX · RZ(θ) · CX
//! circuit
//!     .cx(QubitId(0), QubitId(1))
//!     .unwrap()
//!     .rz(-0.5, QubitId(1))
//!     .unwrap()
//!     .cx(QubitId(0), QubitId(1))
//!     .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_gates(), 5);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `Rx`, `Rz` | 1 | Rotation gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::QubitId;
