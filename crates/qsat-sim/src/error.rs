//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while building cost Hamiltonians or simulating circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A term or gate references a qubit index that is out of range.
    #[error("Qubit {qubit} is out of range for a {n_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: u32,
        /// Size of the register.
        n_qubits: u32,
    },

    /// A term does not match the arity of its group.
    #[error("Term acts on {got} qubits but the group holds {expected}-qubit terms")]
    WrongArity {
        /// Arity of the group.
        expected: usize,
        /// Number of qubits in the term.
        got: usize,
    },

    /// A term lists the same qubit twice.
    #[error("Term lists qubit {qubit} more than once")]
    DuplicateQubit {
        /// The repeated qubit index.
        qubit: u32,
    },

    /// A term coefficient is NaN or infinite.
    #[error("Term coefficient {0} is not finite")]
    NonFiniteCoefficient(f64),

    /// Register is empty or too large for a dense representation.
    #[error("Cannot represent {n_qubits} qubits densely (supported: 1..={max})")]
    UnsupportedQubitCount {
        /// Requested register size.
        n_qubits: u32,
        /// Largest supported register size.
        max: u32,
    },

    /// Operator and state (or two operators) have incompatible sizes.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        got: usize,
    },

    /// A basis label is not a bit-string of the register's length.
    #[error("Invalid basis label '{label}' for a {n_qubits}-qubit register")]
    InvalidBitstring {
        /// The offending label.
        label: String,
        /// Size of the register.
        n_qubits: u32,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qsat_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
