//! Dichotomous model estimation: Rasch, 1PL, and 2PL.
//!
//! Purpose
//! -------
//! Fit the logistic dichotomous model families by marginal maximum
//! likelihood. All three share one machine: deduplicated response patterns,
//! the latent grid, and the marginal accumulator driven through the
//! remove → optimize → reinsert sweep in fixed ascending item order, with a
//! full accumulator rebuild at the top of every outer iteration.
//!
//! Key behaviors
//! -------------
//! - [`fit_rasch`]: difficulty only, discrimination supplied and held
//!   fixed.
//! - [`fit_one_pl`]: a bi-level solve — bounded outer search over the
//!   single shared discrimination, with the Rasch difficulty sweep run to
//!   convergence at every trial value. The inner sweep is re-evaluated at
//!   the outer optimum so its convergence status is reported rather than
//!   masked.
//! - [`fit_two_pl`] / [`fit_two_pl_from`]: per-item discrimination and
//!   difficulty, either as a joint bounded bivariate solve
//!   ([`DifficultyStrategy::Marginal`]) or as a scalar discrimination
//!   search with root-found difficulty ([`DifficultyStrategy::Separable`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Item updates are strictly sequential (Gauss–Seidel): item `k` sees
//!   items `0..k` already updated within the current pass. This coupling
//!   is load-bearing; a parallel (Jacobi) update scheme converges
//!   differently and is deliberately not offered.
//! - A solution pressed against a bound box face is accepted silently.
//! - Non-convergence within the iteration cap is reported through
//!   [`ConvergenceStatus`], never as an error.
use crate::irt::{
    core::{
        conditioning::{EndorsementTally, ResponsePatterns},
        convergence::{ConvergenceMonitor, ConvergenceStatus},
        data::DichotomousData,
        grid::LatentGrid,
        marginal::MarginalAccumulator,
        options::EstimationOptions,
    },
    errors::{IRTError, IRTResult},
    models::{
        kernels::{dichotomous_contribution, expected_endorsement},
        objective_error,
    },
};
use crate::optimization::{
    errors::OptResult,
    solvers::{minimize_boxed, minimize_scalar, root_scalar},
};
use ndarray::Array1;

/// Practical bound box for item discrimination.
const DISCRIMINATION_BOUNDS: (f64, f64) = (0.25, 4.0);

/// Bound box for item difficulty under the marginal objective.
const DIFFICULTY_BOUNDS: (f64, f64) = (-4.0, 4.0);

/// Bracket for the separable difficulty root-find.
const DIFFICULTY_BRACKET: (f64, f64) = (-6.0, 6.0);

/// How per-item difficulty is solved within a sweep.
///
/// Both strategies are interchangeable on the same data; they trade
/// statistical efficiency for speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyStrategy {
    /// Bounded minimization of the negative log marginal likelihood
    /// against the all-other-items background (the accurate,
    /// doubly-iterative path).
    Marginal,
    /// Monotone root-find of expected-vs-observed endorsement proportion,
    /// bypassing the marginal objective entirely (the fast path).
    Separable,
}

/// Fitted Rasch model (fixed discrimination).
#[derive(Debug, Clone, PartialEq)]
pub struct RaschFit {
    /// Per-item difficulty estimates.
    pub difficulty: Array1<f64>,
    /// Outcome of the difficulty sweep.
    pub convergence: ConvergenceStatus,
}

/// Fitted 1PL model (shared discrimination).
#[derive(Debug, Clone, PartialEq)]
pub struct OnePlFit {
    /// Shared discrimination estimate.
    pub discrimination: f64,
    /// Per-item difficulty estimates.
    pub difficulty: Array1<f64>,
    /// Outcome of the inner difficulty sweep at the outer optimum, with
    /// `converged` also requiring the outer search to have terminated by
    /// its own criterion.
    pub convergence: ConvergenceStatus,
}

/// Fitted 2PL model (per-item discrimination).
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPlFit {
    /// Per-item discrimination estimates.
    pub discrimination: Array1<f64>,
    /// Per-item difficulty estimates.
    pub difficulty: Array1<f64>,
    /// Outcome of the outer loop over discrimination.
    pub convergence: ConvergenceStatus,
}

/// Conditioned inputs shared by the dichotomous fits.
struct Conditioned {
    grid: LatentGrid,
    patterns: ResponsePatterns,
    tally: EndorsementTally,
}

/// Validate options and reduce the data once per fit call.
fn condition(data: &DichotomousData, options: &EstimationOptions) -> IRTResult<Conditioned> {
    options.validate()?;
    let grid = LatentGrid::new(options)?;
    let patterns = ResponsePatterns::from_data(data);
    let tally = EndorsementTally::from_data(data);
    Ok(Conditioned { grid, patterns, tally })
}

/// Solve the difficulty matching the observed endorsement proportion for
/// a fixed discrimination.
///
/// The expected-endorsement curve is strictly decreasing in difficulty, so
/// the moment equation has a unique root inside the bracket for
/// non-extreme proportions.
fn match_endorsement(grid: &LatentGrid, discrimination: f64, proportion: f64) -> OptResult<f64> {
    let (lower, upper) = DIFFICULTY_BRACKET;
    let solution = root_scalar(
        |difficulty| Ok(expected_endorsement(grid, discrimination, difficulty) - proportion),
        lower,
        upper,
    )?;
    Ok(solution.point)
}

/// Run the fixed-discrimination difficulty solve.
///
/// Returns the difficulty vector, the sweep's convergence status, and the
/// final negative log marginal likelihood (the outer 1PL objective).
///
/// The marginal strategy is the coordinate-descent sweep; the separable
/// strategy solves every item directly in a single pass, since fixed
/// discrimination decouples the moment equations.
fn difficulty_sweep(
    conditioned: &Conditioned, discrimination: f64, mut difficulty: Array1<f64>,
    max_iteration: usize, strategy: DifficultyStrategy,
) -> IRTResult<(Array1<f64>, ConvergenceStatus, f64)> {
    let grid = &conditioned.grid;
    let patterns = &conditioned.patterns;
    let rule = grid.rule();
    let counts = patterns.counts();
    let n_items = patterns.n_items();

    match strategy {
        DifficultyStrategy::Separable => {
            for item in 0..n_items {
                difficulty[item] =
                    match_endorsement(grid, discrimination, conditioned.tally.proportion(item))?;
            }
            let mut product = MarginalAccumulator::seeded(patterns.n_patterns(), grid.density());
            for item in 0..n_items {
                product.multiply(&dichotomous_contribution(
                    grid.nodes(),
                    patterns.item_signs(item),
                    discrimination,
                    difficulty[item],
                ));
            }
            let objective = product.negative_log_marginal(rule, Some(counts))?;
            Ok((difficulty, ConvergenceStatus::direct(), objective))
        }
        DifficultyStrategy::Marginal => {
            let mut monitor = ConvergenceMonitor::new(difficulty.clone(), max_iteration);
            loop {
                let mut background =
                    MarginalAccumulator::seeded(patterns.n_patterns(), grid.density());
                for item in 0..n_items {
                    background.multiply(&dichotomous_contribution(
                        grid.nodes(),
                        patterns.item_signs(item),
                        discrimination,
                        difficulty[item],
                    ));
                }

                for item in 0..n_items {
                    let signs = patterns.item_signs(item);
                    background.divide(&dichotomous_contribution(
                        grid.nodes(),
                        signs,
                        discrimination,
                        difficulty[item],
                    ))?;

                    let solution = minimize_scalar(
                        |trial_difficulty| {
                            let trial = dichotomous_contribution(
                                grid.nodes(),
                                signs,
                                discrimination,
                                trial_difficulty,
                            );
                            background
                                .negative_log_marginal_with(&trial, rule, Some(counts))
                                .map_err(objective_error)
                        },
                        DIFFICULTY_BOUNDS.0,
                        DIFFICULTY_BOUNDS.1,
                    )?;
                    difficulty[item] = solution.point;

                    background.multiply(&dichotomous_contribution(
                        grid.nodes(),
                        signs,
                        discrimination,
                        difficulty[item],
                    ));
                }

                if monitor.update(difficulty.view()) {
                    break;
                }
            }

            let mut product = MarginalAccumulator::seeded(patterns.n_patterns(), grid.density());
            for item in 0..n_items {
                product.multiply(&dichotomous_contribution(
                    grid.nodes(),
                    patterns.item_signs(item),
                    discrimination,
                    difficulty[item],
                ));
            }
            let objective = product.negative_log_marginal(rule, Some(counts))?;
            Ok((difficulty, monitor.status(), objective))
        }
    }
}

/// Estimate Rasch difficulties with a supplied, fixed discrimination.
///
/// # Parameters
/// - `data`: validated dichotomous response matrix.
/// - `discrimination`: shared discrimination held fixed (conventionally 1).
/// - `options`: validated eagerly before any numerical work.
/// - `strategy`: difficulty solve, marginal or separable.
///
/// # Errors
/// - Configuration errors from `options`.
/// - [`IRTError::NumericalInstability`] / [`IRTError::OptimizationFailed`]
///   from the sweep.
pub fn fit_rasch(
    data: &DichotomousData, discrimination: f64, options: &EstimationOptions,
    strategy: DifficultyStrategy,
) -> IRTResult<RaschFit> {
    let conditioned = condition(data, options)?;
    let initial = Array1::zeros(data.n_items());
    let (difficulty, convergence, _) = difficulty_sweep(
        &conditioned,
        discrimination,
        initial,
        options.max_iteration,
        strategy,
    )?;
    Ok(RaschFit { difficulty, convergence })
}

/// Estimate the 1PL model: one shared discrimination, per-item
/// difficulties.
///
/// The outer bounded search minimizes the marginal likelihood over the
/// shared discrimination; every trial value runs the inner difficulty
/// sweep to convergence (a bi-level solve). After the search, the sweep is
/// re-evaluated at the optimum so the returned difficulties and
/// convergence status describe exactly the reported discrimination.
pub fn fit_one_pl(
    data: &DichotomousData, options: &EstimationOptions, strategy: DifficultyStrategy,
) -> IRTResult<OnePlFit> {
    let conditioned = condition(data, options)?;
    let n_items = data.n_items();

    let outer = minimize_scalar(
        |discrimination| {
            difficulty_sweep(
                &conditioned,
                discrimination,
                Array1::zeros(n_items),
                options.max_iteration,
                strategy,
            )
            .map(|(_, _, objective)| objective)
            .map_err(objective_error)
        },
        DISCRIMINATION_BOUNDS.0,
        DISCRIMINATION_BOUNDS.1,
    )?;

    let (difficulty, inner_status, _) = difficulty_sweep(
        &conditioned,
        outer.point,
        Array1::zeros(n_items),
        options.max_iteration,
        strategy,
    )?;
    let convergence = ConvergenceStatus {
        converged: inner_status.converged && outer.converged,
        ..inner_status
    };
    Ok(OnePlFit { discrimination: outer.point, difficulty, convergence })
}

/// Estimate the 2PL model from the default start (discrimination 1,
/// difficulty 0 per item).
pub fn fit_two_pl(
    data: &DichotomousData, options: &EstimationOptions, strategy: DifficultyStrategy,
) -> IRTResult<TwoPlFit> {
    fit_two_pl_from(
        data,
        options,
        strategy,
        Array1::ones(data.n_items()),
        Array1::zeros(data.n_items()),
    )
}

/// Estimate the 2PL model from explicit starting parameter vectors.
///
/// Warm starts make refits cheap and let a caller resume from a previous
/// fit; one extra pass from already-converged values moves no parameter by
/// more than the convergence tolerance.
///
/// # Errors
/// - [`IRTError::InitialParameterLength`] if either start vector does not
///   have one entry per item.
pub fn fit_two_pl_from(
    data: &DichotomousData, options: &EstimationOptions, strategy: DifficultyStrategy,
    mut discrimination: Array1<f64>, mut difficulty: Array1<f64>,
) -> IRTResult<TwoPlFit> {
    let conditioned = condition(data, options)?;
    let n_items = data.n_items();
    for start in [&discrimination, &difficulty] {
        if start.len() != n_items {
            return Err(IRTError::InitialParameterLength {
                expected: n_items,
                actual: start.len(),
            });
        }
    }

    let grid = &conditioned.grid;
    let patterns = &conditioned.patterns;
    let rule = grid.rule();
    let counts = patterns.counts();

    let mut monitor = ConvergenceMonitor::new(discrimination.clone(), options.max_iteration);
    loop {
        let mut background = MarginalAccumulator::seeded(patterns.n_patterns(), grid.density());
        for item in 0..n_items {
            background.multiply(&dichotomous_contribution(
                grid.nodes(),
                patterns.item_signs(item),
                discrimination[item],
                difficulty[item],
            ));
        }

        for item in 0..n_items {
            let signs = patterns.item_signs(item);
            background.divide(&dichotomous_contribution(
                grid.nodes(),
                signs,
                discrimination[item],
                difficulty[item],
            ))?;

            match strategy {
                DifficultyStrategy::Marginal => {
                    let solution = minimize_boxed(
                        |trial| {
                            let contribution = dichotomous_contribution(
                                grid.nodes(),
                                signs,
                                trial[0],
                                trial[1],
                            );
                            background
                                .negative_log_marginal_with(&contribution, rule, Some(counts))
                                .map_err(objective_error)
                        },
                        &[DISCRIMINATION_BOUNDS, DIFFICULTY_BOUNDS],
                        &[discrimination[item], difficulty[item]],
                    )?;
                    discrimination[item] = solution.point[0];
                    difficulty[item] = solution.point[1];
                }
                DifficultyStrategy::Separable => {
                    let proportion = conditioned.tally.proportion(item);
                    let solution = minimize_scalar(
                        |trial_discrimination| {
                            let trial_difficulty =
                                match_endorsement(grid, trial_discrimination, proportion)?;
                            let contribution = dichotomous_contribution(
                                grid.nodes(),
                                signs,
                                trial_discrimination,
                                trial_difficulty,
                            );
                            background
                                .negative_log_marginal_with(&contribution, rule, Some(counts))
                                .map_err(objective_error)
                        },
                        DISCRIMINATION_BOUNDS.0,
                        DISCRIMINATION_BOUNDS.1,
                    )?;
                    discrimination[item] = solution.point;
                    difficulty[item] = match_endorsement(grid, solution.point, proportion)?;
                }
            }

            background.multiply(&dichotomous_contribution(
                grid.nodes(),
                signs,
                discrimination[item],
                difficulty[item],
            ));
        }

        if monitor.update(discrimination.view()) {
            break;
        }
    }

    Ok(TwoPlFit { discrimination, difficulty, convergence: monitor.status() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Structural behavior on small deterministic datasets: ordering of
    //   recovered difficulties, strategy interchangeability, and the
    //   warm-start length check.
    //
    // They intentionally DO NOT cover:
    // - Statistical parameter recovery under simulation; that lives in
    //   `tests/integration_mml_pipeline.rs`.
    // -------------------------------------------------------------------------

    /// Deterministic dataset: an easy item (mostly endorsed) and a hard
    /// item (mostly not), with enough mixed columns to avoid degeneracy.
    fn toy_data() -> DichotomousData {
        let mut responses = Array2::<u8>::zeros((2, 12));
        for participant in 0..12 {
            responses[[0, participant]] = u8::from(participant < 9);
            responses[[1, participant]] = u8::from(participant < 3);
        }
        DichotomousData::new(responses).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Verify that the frequently endorsed item comes out easier (lower
    // difficulty) than the rarely endorsed one, under both strategies.
    fn difficulty_ordering_matches_endorsement() {
        let data = toy_data();
        let options = EstimationOptions::default();

        for strategy in [DifficultyStrategy::Marginal, DifficultyStrategy::Separable] {
            let fit = fit_rasch(&data, 1.0, &options, strategy).unwrap();
            assert!(
                fit.difficulty[0] < fit.difficulty[1],
                "strategy {strategy:?}: {:?}",
                fit.difficulty
            );
            assert!(fit.convergence.converged);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that the two difficulty strategies land close to each other
    // on the same data.
    fn strategies_agree_on_toy_data() {
        let data = toy_data();
        let options = EstimationOptions::default();

        let marginal =
            fit_rasch(&data, 1.0, &options, DifficultyStrategy::Marginal).unwrap();
        let separable =
            fit_rasch(&data, 1.0, &options, DifficultyStrategy::Separable).unwrap();

        for item in 0..2 {
            assert!(
                (marginal.difficulty[item] - separable.difficulty[item]).abs() < 0.6,
                "item {item}: {} vs {}",
                marginal.difficulty[item],
                separable.difficulty[item]
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that a warm start with the wrong length is rejected.
    fn warm_start_length_is_checked() {
        let data = toy_data();
        let err = fit_two_pl_from(
            &data,
            &EstimationOptions::default(),
            DifficultyStrategy::Marginal,
            Array1::ones(3),
            Array1::zeros(2),
        )
        .unwrap_err();
        assert_eq!(err, IRTError::InitialParameterLength { expected: 2, actual: 3 });
    }

    #[test]
    // Purpose
    // -------
    // Verify that the 1PL bi-level solve returns a discrimination inside
    // its bound box and difficulties ordered like the Rasch fit.
    fn one_pl_returns_bounded_discrimination() {
        let data = toy_data();
        let fit = fit_one_pl(
            &data,
            &EstimationOptions::default(),
            DifficultyStrategy::Separable,
        )
        .unwrap();
        assert!(fit.discrimination >= DISCRIMINATION_BOUNDS.0);
        assert!(fit.discrimination <= DISCRIMINATION_BOUNDS.1);
        assert!(fit.difficulty[0] < fit.difficulty[1]);
    }
}
