//! Error types for the optimiser crate.

use thiserror::Error;

/// Errors raised while configuring or running an optimiser.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptError {
    /// The algorithm tag is not one of the implemented optimisers.
    #[error("Unknown classical optimisation algorithm '{0}' (expected nelder-mead, cma-es or bfgs)")]
    UnknownAlgorithm(String),

    /// The options name a different algorithm than the selected tag.
    #[error("Optimiser mismatch: selected '{selected}' but options are for '{options}'")]
    Mismatch {
        /// The selected algorithm tag.
        selected: String,
        /// The tag embedded in the options.
        options: String,
    },

    /// The options could not be read as the selected algorithm's options.
    #[error("Invalid options for {algorithm}: {message}")]
    InvalidOptions {
        /// The selected algorithm tag.
        algorithm: String,
        /// What was wrong.
        message: String,
    },

    /// There is nothing to optimise.
    #[error("Initial parameter vector is empty")]
    EmptyParameters,
}

/// Result type for optimiser operations.
pub type OptResult<T> = Result<T, OptError>;
