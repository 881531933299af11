//! Partial-credit model estimation.
//!
//! Purpose
//! -------
//! Fit the partial-credit model by marginal maximum likelihood: per item,
//! a joint bounded multivariate solve over discrimination and the item's
//! `m_i − 1` free thresholds (the first threshold is fixed at 0 as the
//! identification reference and never stored), run inside the shared
//! remove → optimize → reinsert sweep.
//!
//! Conventions
//! -----------
//! - The accumulator rows are participants (no pattern deduplication:
//!   polytomous patterns rarely repeat, so every participant weighs 1).
//! - Items keep their own category counts; the solve dimension varies per
//!   item (ragged thresholds).
use crate::irt::{
    core::{
        conditioning::ConditionedPolytomous,
        convergence::ConvergenceMonitor,
        data::PolytomousData,
        grid::LatentGrid,
        marginal::MarginalAccumulator,
        options::EstimationOptions,
    },
    errors::IRTResult,
    models::{
        kernels::credit_contribution, objective_error, threshold_starts, PolytomousFit,
        THRESHOLD_BOUNDS,
    },
};
use crate::optimization::solvers::minimize_boxed;
use ndarray::Array1;

/// Practical bound box for item discrimination.
const DISCRIMINATION_BOUNDS: (f64, f64) = (0.25, 4.0);

/// Estimate partial-credit discrimination and thresholds.
///
/// # Parameters
/// - `data`: validated polytomous response matrix (dense or gapped
///   category codes, `-1` for missing).
/// - `options`: validated eagerly before any numerical work.
///
/// # Returns
/// A [`PolytomousFit`] with one discrimination per item and `m_i − 1` free
/// thresholds per item, plus the outer-loop convergence status.
///
/// # Errors
/// - Configuration errors from `options`.
/// - [`IRTError::NumericalInstability`](crate::irt::errors::IRTError) /
///   [`IRTError::OptimizationFailed`](crate::irt::errors::IRTError) from
///   the sweep.
pub fn fit_partial_credit(
    data: &PolytomousData, options: &EstimationOptions,
) -> IRTResult<PolytomousFit> {
    options.validate()?;
    let grid = LatentGrid::new(options)?;
    let conditioned = ConditionedPolytomous::from_data(data);
    let n_items = conditioned.n_items();
    let rule = grid.rule();

    let mut discrimination = Array1::<f64>::ones(n_items);
    let mut thresholds: Vec<Array1<f64>> = (0..n_items)
        .map(|item| threshold_starts(conditioned.item(item).n_categories() - 1))
        .collect();

    let mut monitor = ConvergenceMonitor::new(discrimination.clone(), options.max_iteration);
    loop {
        let mut background =
            MarginalAccumulator::seeded(conditioned.n_participants(), grid.density());
        for item in 0..n_items {
            background.multiply(&credit_contribution(
                grid.nodes(),
                discrimination[item],
                thresholds[item].view(),
                conditioned.item(item).categories(),
            ));
        }

        for item in 0..n_items {
            let categories = conditioned.item(item).categories();
            background.divide(&credit_contribution(
                grid.nodes(),
                discrimination[item],
                thresholds[item].view(),
                categories,
            ))?;

            let n_free = thresholds[item].len();
            let mut bounds = Vec::with_capacity(1 + n_free);
            bounds.push(DISCRIMINATION_BOUNDS);
            bounds.extend(std::iter::repeat(THRESHOLD_BOUNDS).take(n_free));
            let mut initial = Vec::with_capacity(1 + n_free);
            initial.push(discrimination[item]);
            initial.extend(thresholds[item].iter());

            let solution = minimize_boxed(
                |trial| {
                    let trial_thresholds = Array1::from(trial[1..].to_vec());
                    let contribution = credit_contribution(
                        grid.nodes(),
                        trial[0],
                        trial_thresholds.view(),
                        categories,
                    );
                    background
                        .negative_log_marginal_with(&contribution, rule, None)
                        .map_err(objective_error)
                },
                &bounds,
                &initial,
            )?;
            discrimination[item] = solution.point[0];
            thresholds[item] = Array1::from(solution.point[1..].to_vec());

            background.multiply(&credit_contribution(
                grid.nodes(),
                discrimination[item],
                thresholds[item].view(),
                categories,
            ));
        }

        if monitor.update(discrimination.view()) {
            break;
        }
    }

    Ok(PolytomousFit { discrimination, thresholds, convergence: monitor.status() })
}
