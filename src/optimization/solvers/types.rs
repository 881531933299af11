//! solvers::types — normalized solution types for the bounded solvers.
//!
//! Purpose
//! -------
//! Give every solver in this layer one canonical, backend-agnostic result
//! shape, mirroring how the termination state of a run is reported to
//! callers: the best point found, its objective value, the iteration count,
//! and whether the backend reported proper convergence (as opposed to an
//! iteration-cap stop).
//!
//! Conventions
//! -----------
//! - `value` is the objective at `point` in the caller's orientation (these
//!   solvers minimize; no sign flips happen here).
//! - `converged == false` never discards the solution: the best point found
//!   is always returned, and the caller decides how to react.
use argmin::core::{TerminationReason, TerminationStatus};

/// Result of a bounded univariate solve (minimization or root-find).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSolution {
    /// Best point found inside the bracket.
    pub point: f64,
    /// Objective value at `point`.
    pub value: f64,
    /// Backend iterations performed.
    pub iterations: usize,
    /// Whether the backend terminated by its own convergence criterion.
    pub converged: bool,
    /// Human-readable termination status.
    pub status: String,
}

/// Result of a bounded multivariate solve.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSolution {
    /// Best point found inside the box (model space, not transform space).
    pub point: Vec<f64>,
    /// Objective value at `point`.
    pub value: f64,
    /// Backend iterations performed.
    pub iterations: usize,
    /// Whether the backend terminated by its own convergence criterion.
    pub converged: bool,
    /// Human-readable termination status.
    pub status: String,
}

/// Map an argmin termination status into `(converged, status)`.
///
/// Convergence here means the solver stopped because its own criterion was
/// met (`SolverConverged` or `TargetCostReached`); an iteration-cap stop or
/// a still-running state reports `false`.
pub(crate) fn termination_summary(termination: &TerminationStatus) -> (bool, String) {
    let converged = matches!(
        termination,
        TerminationStatus::Terminated(
            TerminationReason::SolverConverged | TerminationReason::TargetCostReached
        )
    );
    (converged, format!("{termination:?}"))
}
