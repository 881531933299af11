//! irt::models — model-family estimation built on the shared core.
//!
//! Purpose
//! -------
//! Plug the per-family likelihood kernels into the shared MML machinery:
//! [`dichotomous`] (Rasch / 1PL / 2PL), [`partial_credit`], and [`graded`].
//! Every family runs the same outer shape — condition the data, build the
//! latent grid, then sweep items through the marginal accumulator in fixed
//! order — and differs only in its kernel and per-item solver.
//!
//! Conventions
//! -----------
//! - Fit functions validate options eagerly and return fit structs by
//!   value; nothing is cached across calls.
//! - Polytomous fits share [`PolytomousFit`], whose primary threshold
//!   representation is ragged (one vector per item); the NaN-padded matrix
//!   exists only as an output view.
use crate::irt::core::convergence::ConvergenceStatus;
use crate::optimization::errors::OptError;
use ndarray::{Array1, Array2, s};

pub mod dichotomous;
pub mod graded;
pub mod kernels;
pub mod partial_credit;

pub use dichotomous::{
    fit_one_pl, fit_rasch, fit_two_pl, fit_two_pl_from, DifficultyStrategy, OnePlFit, RaschFit,
    TwoPlFit,
};
pub use graded::fit_graded;
pub use partial_credit::fit_partial_credit;

/// Bound box for free polytomous thresholds.
pub(crate) const THRESHOLD_BOUNDS: (f64, f64) = (-6.0, 6.0);

/// Wrap a model-layer error for transport through a solver run.
pub(crate) fn objective_error(err: crate::irt::errors::IRTError) -> OptError {
    OptError::ObjectiveFailed { text: err.to_string() }
}

/// Fitted polytomous model (partial-credit or graded-response).
#[derive(Debug, Clone, PartialEq)]
pub struct PolytomousFit {
    /// Per-item discrimination estimates.
    pub discrimination: Array1<f64>,
    /// Per-item free thresholds; item `i` carries exactly `m_i − 1`
    /// values.
    pub thresholds: Vec<Array1<f64>>,
    /// Outcome of the outer loop over discrimination.
    pub convergence: ConvergenceStatus,
}

impl PolytomousFit {
    /// Thresholds as an items × max-thresholds matrix, padded with NaN.
    ///
    /// Unused slots of items with fewer categories than the maximum are
    /// marked NaN and never carry another item's data; the ragged
    /// `thresholds` field remains the primary representation.
    pub fn threshold_matrix(&self) -> Array2<f64> {
        let max_thresholds = self.thresholds.iter().map(Array1::len).max().unwrap_or(0);
        let mut matrix = Array2::from_elem((self.thresholds.len(), max_thresholds), f64::NAN);
        for (item, thresholds) in self.thresholds.iter().enumerate() {
            matrix.slice_mut(s![item, ..thresholds.len()]).assign(thresholds);
        }
        matrix
    }
}

/// Linearly spaced threshold starts over [−1, 1].
///
/// Matches the conventional initialization: a single free threshold
/// starts at −1, longer vectors span the interval end to end.
pub(crate) fn threshold_starts(count: usize) -> Array1<f64> {
    if count == 1 {
        return Array1::from_elem(1, -1.0);
    }
    let step = 2.0 / (count as f64 - 1.0);
    Array1::from_iter((0..count).map(|k| -1.0 + step * k as f64))
}
