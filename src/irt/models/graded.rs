//! Graded-response model estimation.
//!
//! Purpose
//! -------
//! Fit the graded-response model by marginal maximum likelihood with a
//! two-stage per-item solve: a bounded scalar search over discrimination,
//! where each trial value gets its thresholds from an exact inner solve of
//! the category-probability-matching integral equations rather than a
//! general optimizer. This keeps the outer search one-dimensional and
//! markedly cheaper than the partial-credit joint solve.
//!
//! Key behaviors
//! -------------
//! - For each item and trial discrimination `a`, every boundary `k` must
//!   satisfy `∫ sigmoid(a(θ − b_k)) φ(θ) dθ = P̂(response ≥ k)`; the
//!   expected-endorsement curve is evaluated at the grid nodes and
//!   inverted by monotone linear interpolation (clamped at the grid ends).
//! - Observed cumulative proportions are strictly decreasing for
//!   validated data (every dense category has at least one response), so
//!   the recovered thresholds are strictly increasing.
//!
//! Conventions
//! -----------
//! - Accumulator rows are participants, as in the partial-credit fit.
//! - Convergence is monitored on the discrimination vector.
use crate::irt::{
    core::{
        conditioning::{ConditionedItem, ConditionedPolytomous},
        convergence::ConvergenceMonitor,
        data::PolytomousData,
        grid::LatentGrid,
        marginal::MarginalAccumulator,
        options::EstimationOptions,
    },
    errors::IRTResult,
    models::{
        kernels::{expected_endorsement, graded_contribution},
        objective_error, PolytomousFit,
    },
};
use crate::optimization::solvers::minimize_scalar;
use ndarray::Array1;

/// Bound bracket for the graded-response discrimination search.
const DISCRIMINATION_BOUNDS: (f64, f64) = (0.2, 5.0);

/// Observed cumulative proportions `P̂(response ≥ k)` for `k = 1..m`.
///
/// Strictly decreasing for conditioned data, since every dense category
/// carries at least one response.
fn cumulative_ratios(item: &ConditionedItem) -> Array1<f64> {
    let counts = item.counts();
    let total = item.n_observed();
    let mut remaining = total;
    Array1::from_iter(counts.iter().take(counts.len() - 1).map(|&count| {
        remaining -= count;
        remaining / total
    }))
}

/// Solve the boundary integral equations for a trial discrimination.
///
/// The marginal endorsement curve `E(b) = ∫ sigmoid(a(θ − b)) φ(θ) dθ` is
/// sampled at the grid nodes (it is strictly decreasing in `b`) and
/// inverted for each cumulative ratio by linear interpolation; ratios
/// outside the sampled range clamp to the corresponding grid end.
fn solve_threshold_equations(
    grid: &LatentGrid, discrimination: f64, ratios: &Array1<f64>,
) -> Array1<f64> {
    let nodes = grid.nodes();
    let curve: Vec<f64> = nodes
        .iter()
        .map(|&candidate| expected_endorsement(grid, discrimination, candidate))
        .collect();
    let last = curve.len() - 1;

    Array1::from_iter(ratios.iter().map(|&ratio| {
        if ratio >= curve[0] {
            return nodes[0];
        }
        if ratio <= curve[last] {
            return nodes[last];
        }
        let mut segment = 0;
        while curve[segment + 1] > ratio {
            segment += 1;
        }
        let span = curve[segment + 1] - curve[segment];
        let fraction = (ratio - curve[segment]) / span;
        nodes[segment] + fraction * (nodes[segment + 1] - nodes[segment])
    }))
}

/// Estimate graded-response discrimination and thresholds.
///
/// # Parameters
/// - `data`: validated polytomous response matrix (dense or gapped
///   category codes, `-1` for missing).
/// - `options`: validated eagerly before any numerical work.
///
/// # Returns
/// A [`PolytomousFit`] with one discrimination per item and `m_i − 1`
/// strictly increasing thresholds per item, plus the outer-loop
/// convergence status.
///
/// # Errors
/// - Configuration errors from `options`.
/// - [`IRTError::NumericalInstability`](crate::irt::errors::IRTError) /
///   [`IRTError::OptimizationFailed`](crate::irt::errors::IRTError) from
///   the sweep.
pub fn fit_graded(data: &PolytomousData, options: &EstimationOptions) -> IRTResult<PolytomousFit> {
    options.validate()?;
    let grid = LatentGrid::new(options)?;
    let conditioned = ConditionedPolytomous::from_data(data);
    let n_items = conditioned.n_items();
    let rule = grid.rule();

    let ratios: Vec<Array1<f64>> =
        (0..n_items).map(|item| cumulative_ratios(conditioned.item(item))).collect();

    let mut discrimination = Array1::<f64>::ones(n_items);
    let mut thresholds: Vec<Array1<f64>> = (0..n_items)
        .map(|item| solve_threshold_equations(&grid, discrimination[item], &ratios[item]))
        .collect();

    let mut monitor = ConvergenceMonitor::new(discrimination.clone(), options.max_iteration);
    loop {
        let mut background =
            MarginalAccumulator::seeded(conditioned.n_participants(), grid.density());
        for item in 0..n_items {
            background.multiply(&graded_contribution(
                grid.nodes(),
                discrimination[item],
                thresholds[item].view(),
                conditioned.item(item).categories(),
            ));
        }

        for item in 0..n_items {
            let categories = conditioned.item(item).categories();
            background.divide(&graded_contribution(
                grid.nodes(),
                discrimination[item],
                thresholds[item].view(),
                categories,
            ))?;

            let solution = minimize_scalar(
                |trial_discrimination| {
                    let trial_thresholds =
                        solve_threshold_equations(&grid, trial_discrimination, &ratios[item]);
                    let contribution = graded_contribution(
                        grid.nodes(),
                        trial_discrimination,
                        trial_thresholds.view(),
                        categories,
                    );
                    background
                        .negative_log_marginal_with(&contribution, rule, None)
                        .map_err(objective_error)
                },
                DISCRIMINATION_BOUNDS.0,
                DISCRIMINATION_BOUNDS.1,
            )?;
            discrimination[item] = solution.point;
            thresholds[item] = solve_threshold_equations(&grid, solution.point, &ratios[item]);

            background.multiply(&graded_contribution(
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irt::core::conditioning::ConditionedPolytomous;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Cumulative-ratio construction.
    // - The inner integral-equation solve: accuracy against a known
    //   boundary location and monotonicity of the output.
    //
    // They intentionally DO NOT cover:
    // - Statistical recovery under simulation; that lives in
    //   `tests/integration_mml_pipeline.rs`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify cumulative ratios for a known count vector.
    fn cumulative_ratios_from_counts() {
        let data = PolytomousData::new(array![[0, 0, 1, 1, 1, 2, 2, 2, 2, 2]]).unwrap();
        let conditioned = ConditionedPolytomous::from_data(&data);

        let ratios = cumulative_ratios(conditioned.item(0));
        assert_eq!(ratios.len(), 2);
        assert_abs_diff_eq!(ratios[0], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(ratios[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify that inverting the endorsement curve recovers a known
    // boundary: under a standard normal prior, a boundary at 0 has
    // expected endorsement one half.
    fn threshold_solve_recovers_known_boundary() {
        let grid = LatentGrid::new(&EstimationOptions::default()).unwrap();

        let solved = solve_threshold_equations(&grid, 1.3, &array![0.5]);
        assert_abs_diff_eq!(solved[0], 0.0, epsilon = 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // Verify that strictly decreasing ratios give strictly increasing
    // thresholds.
    fn thresholds_are_monotone_in_the_ratios() {
        let grid = LatentGrid::new(&EstimationOptions::default()).unwrap();

        let solved = solve_threshold_equations(&grid, 0.9, &array![0.85, 0.6, 0.3, 0.1]);
        for k in 1..solved.len() {
            assert!(solved[k] > solved[k - 1], "{solved:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a ragged dataset produces ragged thresholds with the
    // matrix view padded by NaN.
    fn ragged_fit_shapes() {
        let mut responses = Array2::<i32>::zeros((2, 12));
        for participant in 0..12 {
            responses[[0, participant]] = (participant % 3) as i32;
            responses[[1, participant]] = i32::from(participant >= 5);
        }
        let data = PolytomousData::new(responses).unwrap();
        let options = EstimationOptions { max_iteration: 5, ..EstimationOptions::default() };

        let fit = fit_graded(&data, &options).unwrap();
        assert_eq!(fit.thresholds[0].len(), 2);
        assert_eq!(fit.thresholds[1].len(), 1);
        let matrix = fit.threshold_matrix();
        assert!(matrix[[1, 1]].is_nan());
    }
}
