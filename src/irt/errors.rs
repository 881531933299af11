//! Errors for IRT estimation (input/data validation, configuration checks,
//! numerical-stability failures, and optimizer failures).
//!
//! This module defines the model error type, [`IRTError`], used across the
//! estimation stack and the Python-facing API. It implements
//! `Display`/`Error` and converts to `PyErr` at PyO3 boundaries.
//!
//! ## Conventions
//! - **Indices are 0-based** and name `(item, participant)` positions in the
//!   items × participants response matrix.
//! - Dichotomous responses must be exactly 0 or 1; polytomous category codes
//!   must be ≥ 0, with `-1` reserved for missing / not-administered entries.
//! - Optimizer/backend errors are normalized to
//!   [`IRTError::OptimizationFailed`] with a human-readable status.
//! - Non-convergence within the iteration cap is **not** an error; it is
//!   reported through `ConvergenceStatus` on the fit result.
use crate::optimization::errors::OptError;

#[cfg(feature = "python-bindings")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python-bindings")]
use pyo3::PyErr;

/// Crate-wide result alias for estimation operations that may produce
/// [`IRTError`].
pub type IRTResult<T> = Result<T, IRTError>;

/// Unified error type for IRT estimation.
///
/// Covers response-matrix validation, estimation-option checks, numerical
/// failures inside the marginal accumulator, and optimizer failures.
#[derive(Debug, Clone, PartialEq)]
pub enum IRTError {
    // ---- Input/data validation ----
    /// Response matrix has zero items or zero participants.
    EmptyDataset,

    /// Dichotomous entry other than 0 or 1.
    NonBinaryResponse { item: usize, participant: usize, value: u8 },

    /// Polytomous category code below the missing sentinel.
    InvalidCategoryCode { item: usize, participant: usize, code: i32 },

    /// A dichotomous item was endorsed by every participant or by none;
    /// its difficulty is not identifiable.
    DegenerateItem { item: usize, endorsed: usize, total: usize },

    /// A polytomous item has fewer than two observed categories.
    SingleCategoryItem { item: usize, observed: usize },

    /// A polytomous item has no non-missing responses.
    AllMissingItem { item: usize },

    /// A warm-start parameter vector does not match the item count.
    InitialParameterLength { expected: usize, actual: usize },

    // ---- Configuration validation ----
    /// Outer-loop iteration cap must be positive.
    InvalidMaxIteration { max_iteration: usize, reason: &'static str },

    /// Quadrature bounds must be finite with lower < upper.
    InvalidQuadratureBounds { lower: f64, upper: f64, reason: &'static str },

    /// Quadrature order must support at least a two-node rule.
    InvalidQuadratureOrder { order: usize, reason: &'static str },

    /// Latent density parameters are invalid (non-finite mean or
    /// non-positive scale).
    InvalidDensity { reason: &'static str },

    /// Latent density evaluated to a negative or non-finite value at a
    /// grid node.
    NonFiniteDensity { node: f64, value: f64 },

    // ---- Numerical failures ----
    /// The marginal accumulator produced a non-finite or non-positive
    /// value (e.g. removal of an item divided by a near-zero background).
    NumericalInstability { row: usize, value: f64, reason: &'static str },

    // ---- Estimation / optimizer ----
    /// A per-item solve failed; includes a human-readable status.
    OptimizationFailed { status: String },
}

impl std::error::Error for IRTError {}

impl std::fmt::Display for IRTError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            IRTError::EmptyDataset => {
                write!(f, "Response matrix must have at least one item and one participant.")
            }
            IRTError::NonBinaryResponse { item, participant, value } => {
                write!(
                    f,
                    "Response for item {item}, participant {participant} must be 0 or 1; got {value}."
                )
            }
            IRTError::InvalidCategoryCode { item, participant, code } => {
                write!(
                    f,
                    "Category code for item {item}, participant {participant} must be >= 0 \
                     (or -1 for missing); got {code}."
                )
            }
            IRTError::DegenerateItem { item, endorsed, total } => {
                write!(
                    f,
                    "Item {item} was endorsed by {endorsed} of {total} participants; \
                     a zero-variance item is not identifiable."
                )
            }
            IRTError::SingleCategoryItem { item, observed } => {
                write!(
                    f,
                    "Item {item} has {observed} observed category; at least two are required."
                )
            }
            IRTError::AllMissingItem { item } => {
                write!(f, "Item {item} has no non-missing responses.")
            }
            IRTError::InitialParameterLength { expected, actual } => {
                write!(
                    f,
                    "Warm-start parameter vector has length {actual}; expected one value \
                     per item ({expected})."
                )
            }
            // ---- Configuration validation ----
            IRTError::InvalidMaxIteration { max_iteration, reason } => {
                write!(f, "Invalid max_iteration ({max_iteration}): {reason}")
            }
            IRTError::InvalidQuadratureBounds { lower, upper, reason } => {
                write!(f, "Invalid quadrature bounds ({lower}, {upper}): {reason}")
            }
            IRTError::InvalidQuadratureOrder { order, reason } => {
                write!(f, "Invalid quadrature order ({order}): {reason}")
            }
            IRTError::InvalidDensity { reason } => {
                write!(f, "Invalid latent density: {reason}")
            }
            IRTError::NonFiniteDensity { node, value } => {
                write!(f, "Latent density at node {node} is not a finite probability: {value}")
            }
            // ---- Numerical failures ----
            IRTError::NumericalInstability { row, value, reason } => {
                write!(f, "Numerical instability at row {row} (value {value}): {reason}")
            }
            // ---- Estimation / optimizer ----
            IRTError::OptimizationFailed { status } => {
                write!(f, "Item parameter optimization failed: {status}")
            }
        }
    }
}

impl From<OptError> for IRTError {
    /// Normalize a solver error into the model error surface.
    ///
    /// The solver layer already recovers objective errors from backend
    /// runs, so the status string carries the most specific failure
    /// available.
    fn from(err: OptError) -> Self {
        IRTError::OptimizationFailed { status: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<IRTError> for PyErr {
    fn from(err: IRTError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Display formatting of representative variants.
    // - Normalization of solver errors into `OptimizationFailed`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that display strings carry the offending indices and values.
    fn display_carries_context() {
        let err = IRTError::NonBinaryResponse { item: 3, participant: 17, value: 2 };
        let text = err.to_string();
        assert!(text.contains("item 3"));
        assert!(text.contains("participant 17"));
        assert!(text.contains('2'));
    }

    #[test]
    // Purpose
    // -------
    // Verify that a solver error becomes `OptimizationFailed` and keeps its
    // message.
    fn opt_error_normalizes_to_optimization_failed() {
        let err: IRTError = OptError::MissingSolution.into();
        match err {
            IRTError::OptimizationFailed { status } => {
                assert!(status.contains("without a best parameter"));
            }
            other => panic!("expected OptimizationFailed, got {other:?}"),
        }
    }
}
