//! Error types for the QAOA crate.

use qsat_sim::Arity;
use thiserror::Error;

/// Errors raised while constructing, simulating or optimising a QAOA instance.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QaoaError {
    /// The ansatz needs at least one round.
    #[error("n_rounds must be at least 1")]
    ZeroRounds,

    /// An angle vector does not have one entry per round.
    #[error("{name} has {got} entries but the ansatz has {expected} rounds")]
    AngleLength {
        /// Which vector (`alpha` or `beta`).
        name: &'static str,
        /// Number of rounds.
        expected: usize,
        /// Entries supplied.
        got: usize,
    },

    /// A flat parameter vector is not `alpha ++ beta`.
    #[error("Parameter vector has {got} entries, expected {expected} (alpha then beta)")]
    ParameterLength {
        /// `2 · n_rounds`.
        expected: usize,
        /// Entries supplied.
        got: usize,
    },

    /// A term group was built for a different register size.
    #[error("{arity} term group covers {got} qubits but the instance has {expected}")]
    RegisterMismatch {
        /// Arity of the offending group.
        arity: Arity,
        /// Instance register size.
        expected: u32,
        /// Group register size.
        got: u32,
    },

    /// A term group was passed in the wrong slot.
    #[error("Expected the {expected} term group, got the {got} one")]
    GroupArity {
        /// Slot the group was passed in.
        expected: Arity,
        /// Arity of the group.
        got: Arity,
    },

    /// Simulation or optimisation was requested before the circuit was built.
    #[error("Circuit has not been built; call build_circuit first")]
    CircuitNotBuilt,

    /// An energy or distribution was requested before simulation.
    #[error("Circuit has not been simulated; call simulate_circuit first")]
    NotSimulated,

    /// Success probability needs a satisfying assignment.
    #[error("Instance has no satisfying assignment")]
    NoSatisfyingAssignment,

    /// Landscape step is not a positive finite number.
    #[error("Landscape step must be positive, finite and coarse enough for a bounded grid, got {0}")]
    InvalidStep(f64),

    /// Run-parameter or grid file content is invalid.
    #[error("Invalid run parameters: {0}")]
    InvalidParams(String),

    /// Circuit builder error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qsat_ir::IrError),

    /// Simulator error.
    #[error("Simulation error: {0}")]
    Sim(#[from] qsat_sim::SimError),

    /// Optimiser configuration error.
    #[error("Optimiser error: {0}")]
    Opt(#[from] qsat_opt::OptError),

    /// JSON parse error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for QAOA operations.
pub type QaoaResult<T> = Result<T, QaoaError>;
