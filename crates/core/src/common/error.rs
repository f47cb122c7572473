//! Error definitions.
//!
//! Simulation outcomes such as a failed allocation are ordinary values (see
//! [`crate::mem::AllocationOutcome`]); the errors here cover the ambient surface:
//! 1. **Configuration:** Reading, parsing, and validating a [`crate::Config`].
//! 2. **Speed:** Rejecting multipliers outside the supported set.
//! 3. **Commands:** Rejecting malformed operations from a driver such as the CLI.

use thiserror::Error;

/// Errors raised outside the simulation state machines themselves.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A speed multiplier other than 0.5, 1, 2 or 5 was requested.
    #[error("unsupported speed multiplier {0}; expected one of 0.5, 1, 2, 5")]
    UnsupportedSpeed(f64),

    /// A configuration value violates a constraint.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed as JSON.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// A configuration file could not be read.
    #[error("failed to read configuration file `{path}`: {reason}")]
    ConfigRead {
        /// Path that was requested.
        path: String,
        /// Underlying I/O error message.
        reason: String,
    },

    /// A driver command could not be understood.
    #[error("invalid operation `{0}`")]
    InvalidOperation(String),
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;
