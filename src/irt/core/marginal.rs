//! Marginal accumulator — the shared partial-integral engine.
//!
//! Purpose
//! -------
//! Maintain, per response row (a deduplicated pattern for dichotomous
//! models, a participant for polytomous models) and per grid node, the
//! product of the in-product items' likelihood contributions times the
//! prior density. This accumulator is what makes per-item optimization
//! tractable: removing one item's factor leaves the fixed "background" of
//! all other items against which that item's new parameters are solved.
//!
//! Key behaviors
//! -------------
//! - [`MarginalAccumulator::seeded`] starts a rebuild from the prior
//!   density alone; multiplying every item's contribution back in
//!   completes the once-per-outer-iteration full rebuild that bounds the
//!   floating-point drift of repeated divide/multiply steps.
//! - [`MarginalAccumulator::divide`] removes one item's factor, surfacing
//!   near-zero divisions as [`IRTError::NumericalInstability`] instead of
//!   letting NaN/Inf propagate into later items' objectives.
//! - [`MarginalAccumulator::multiply`] reinserts an updated factor.
//! - [`MarginalAccumulator::negative_log_marginal_with`] evaluates the
//!   negative log marginal likelihood of the background times a trial
//!   contribution — the per-item objective — without mutating the
//!   accumulator.
//!
//! Invariants & assumptions
//! ------------------------
//! - All contribution matrices share the accumulator's shape
//!   (rows × nodes); shape mismatches are programming errors and panic via
//!   `ndarray` broadcasting rules.
//! - The remove → optimize → reinsert sweep runs in fixed ascending item
//!   order. Each item therefore sees the already-updated parameters of
//!   items processed earlier in the same pass (Gauss–Seidel, not Jacobi);
//!   reordering or batching the updates changes the numerics.
use crate::irt::{
    core::grid::QuadratureRule,
    errors::{IRTError, IRTResult},
};
use ndarray::{Array1, Array2};

/// Rows × nodes product of item likelihood contributions and the prior.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalAccumulator {
    values: Array2<f64>,
}

impl MarginalAccumulator {
    /// Start a rebuild: every row is seeded with the prior density.
    pub fn seeded(n_rows: usize, density: &Array1<f64>) -> Self {
        let n_nodes = density.len();
        let mut values = Array2::<f64>::zeros((n_rows, n_nodes));
        for mut row in values.rows_mut() {
            row.assign(density);
        }
        MarginalAccumulator { values }
    }

    /// Number of response rows.
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Multiply one item's contribution into the product (reinsert).
    pub fn multiply(&mut self, contribution: &Array2<f64>) {
        self.values *= contribution;
    }

    /// Divide one item's contribution out of the product (remove).
    ///
    /// # Errors
    /// - [`IRTError::NumericalInstability`] if any quotient is non-finite,
    ///   which happens when an extreme row drives the divisor toward zero.
    pub fn divide(&mut self, contribution: &Array2<f64>) -> IRTResult<()> {
        self.values /= contribution;
        for (row, values) in self.values.rows().into_iter().enumerate() {
            for &value in values {
                if !value.is_finite() {
                    return Err(IRTError::NumericalInstability {
                        row,
                        value,
                        reason: "Removing an item divided by a near-zero background.",
                    });
                }
            }
        }
        Ok(())
    }

    /// Negative log marginal likelihood of the current product.
    ///
    /// Each row's marginal probability is the weighted sum of its values
    /// over the grid; the objective is `−Σ_rows weight_row · ln(marginal)`,
    /// with `weight_row` the pattern multiplicity (or 1 when `counts` is
    /// `None`).
    ///
    /// # Errors
    /// - [`IRTError::NumericalInstability`] for a non-positive or
    ///   non-finite marginal probability.
    pub fn negative_log_marginal(
        &self, rule: &QuadratureRule, counts: Option<&Array1<f64>>,
    ) -> IRTResult<f64> {
        let mut objective = 0.0;
        for (row, values) in self.values.rows().into_iter().enumerate() {
            let marginal = rule.integrate(values);
            if !marginal.is_finite() || marginal <= 0.0 {
                return Err(IRTError::NumericalInstability {
                    row,
                    value: marginal,
                    reason: "Marginal probability is not strictly positive.",
                });
            }
            let weight = counts.map_or(1.0, |c| c[row]);
            objective -= weight * marginal.ln();
        }
        Ok(objective)
    }

    /// Negative log marginal likelihood of the background times a trial
    /// contribution, leaving the accumulator untouched.
    ///
    /// This is the per-item objective: the accumulator holds the
    /// all-other-items background (after [`divide`](Self::divide)), and
    /// `contribution` carries the item's factor under trial parameters.
    pub fn negative_log_marginal_with(
        &self, contribution: &Array2<f64>, rule: &QuadratureRule, counts: Option<&Array1<f64>>,
    ) -> IRTResult<f64> {
        let mut objective = 0.0;
        for (row, (values, trial)) in self
            .values
            .rows()
            .into_iter()
            .zip(contribution.rows())
            .enumerate()
        {
            let combined = &values * &trial;
            let marginal = rule.integrate(combined.view());
            if !marginal.is_finite() || marginal <= 0.0 {
                return Err(IRTError::NumericalInstability {
                    row,
                    value: marginal,
                    reason: "Marginal probability is not strictly positive.",
                });
            }
            let weight = counts.map_or(1.0, |c| c[row]);
            objective -= weight * marginal.ln();
        }
        Ok(objective)
    }
}
