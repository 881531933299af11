//! Errors for the bounded-optimization layer (bracket/box validation,
//! objective failures, and argmin backend errors).
//!
//! This module defines [`OptError`], used by the scalar and simplex solvers
//! in [`crate::optimization::solvers`]. Backend errors raised inside argmin
//! are normalized into wrapper variants via the `From<argmin::core::Error>`
//! conversion so callers see a uniform, matchable error surface.
//!
//! ## Conventions
//! - Objective closures return `OptResult<f64>`; an `Err` raised inside a
//!   solver run aborts the run and is recovered from the backend error by
//!   downcasting, so the original variant (not a stringified copy) reaches
//!   the caller.
//! - Solvers never panic on invalid *inputs*; brackets, boxes, and initial
//!   points are validated before any backend call.
use argmin::core::ArgminError;

/// Crate-wide result alias for solver operations.
pub type OptResult<T> = Result<T, OptError>;

/// Unified error type for the bounded solvers.
#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Problem validation ----
    /// Bracket or box edge is not a valid interval.
    InvalidBracket { lower: f64, upper: f64, reason: &'static str },

    /// Initial point has the wrong dimension for the supplied box.
    InitialDimMismatch { expected: usize, actual: usize },

    /// Initial point coordinate is non-finite.
    NonFiniteInitial { index: usize, value: f64 },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteObjective { value: f64 },

    /// Objective evaluation failed inside a solver run.
    ObjectiveFailed { text: String },

    // ---- Outcome ----
    /// Solver finished without producing a best parameter.
    MissingSolution,

    // ---- Argmin backend ----
    /// Wrapper for argmin::InvalidParameter.
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotInitialized.
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated.
    ConditionViolated { text: String },
    /// Wrapper for argmin::PotentialBug.
    PotentialBug { text: String },
    /// Wrapper for other argmin error types.
    BackendError { text: String },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::InvalidBracket { lower, upper, reason } => {
                write!(f, "Invalid bracket [{lower}, {upper}]: {reason}")
            }
            OptError::InitialDimMismatch { expected, actual } => {
                write!(f, "Initial point has dimension {actual}; the box has {expected}.")
            }
            OptError::NonFiniteInitial { index, value } => {
                write!(f, "Initial point coordinate {index} is non-finite: {value}")
            }
            OptError::NonFiniteObjective { value } => {
                write!(f, "Objective returned a non-finite value: {value}")
            }
            OptError::ObjectiveFailed { text } => {
                write!(f, "Objective evaluation failed: {text}")
            }
            OptError::MissingSolution => {
                write!(f, "Solver terminated without a best parameter.")
            }
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Solver not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Solver condition violated: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential backend bug: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Optimization backend error: {text}")
            }
        }
    }
}

impl From<argmin::core::Error> for OptError {
    /// Normalize an argmin runtime error.
    ///
    /// Recovers an [`OptError`] raised inside an objective closure by
    /// downcasting first; otherwise classifies the argmin error kind into
    /// the matching wrapper variant.
    fn from(err: argmin::core::Error) -> Self {
        let err = match err.downcast::<OptError>() {
            Ok(inner) => return inner,
            Err(err) => err,
        };
        match err.downcast_ref::<ArgminError>() {
            Some(ArgminError::InvalidParameter { text }) => {
                OptError::InvalidParameter { text: text.clone() }
            }
            Some(ArgminError::NotInitialized { text }) => {
                OptError::NotInitialized { text: text.clone() }
            }
            Some(ArgminError::ConditionViolated { text }) => {
                OptError::ConditionViolated { text: text.clone() }
            }
            Some(ArgminError::PotentialBug { text }) => OptError::PotentialBug { text: text.clone() },
            _ => OptError::BackendError { text: err.to_string() },
        }
    }
}
