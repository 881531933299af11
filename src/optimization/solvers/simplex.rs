//! Bounded multivariate minimization: Nelder–Mead inside a logistic box.
//!
//! The derivative-free joint solves (discrimination + difficulty, or
//! discrimination + thresholds) need box constraints, which Nelder–Mead
//! does not support natively. Following the same pattern the constrained
//! parameter mappings use elsewhere in this crate, each coordinate is
//! reparameterized onto ℝ with a logistic transform
//! ([`to_unbounded`] / [`to_bounded`]) and the simplex runs unconstrained
//! in the transformed space. The objective only ever sees points strictly
//! inside the box; solutions squeezed against a face are returned silently.
use crate::optimization::{
    errors::{OptError, OptResult},
    numerical_stability::{to_bounded, to_unbounded},
    solvers::{
        adapter::VectorObjective,
        types::{termination_summary, VectorSolution},
    },
};
use argmin::core::{Executor, State};
use argmin::solver::neldermead::NelderMead;

/// Iteration cap for simplex solves. The per-item problems here have at
/// most a handful of coordinates; well before this cap the simplex has
/// collapsed to the tolerance below.
const MAX_SIMPLEX_ITERS: u64 = 600;

/// Termination tolerance on the standard deviation of the simplex's cost
/// values.
const SD_TOLERANCE: f64 = 1e-8;

/// Offset, in transform space, between the start point and each remaining
/// simplex vertex.
const SIMPLEX_STEP: f64 = 0.5;

/// Validate a box and an initial point against each other.
fn validate_box(bounds: &[(f64, f64)], initial: &[f64]) -> OptResult<()> {
    if initial.len() != bounds.len() {
        return Err(OptError::InitialDimMismatch {
            expected: bounds.len(),
            actual: initial.len(),
        });
    }
    for &(lower, upper) in bounds {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(OptError::InvalidBracket {
                lower,
                upper,
                reason: "Box edges must be finite.",
            });
        }
        if lower >= upper {
            return Err(OptError::InvalidBracket {
                lower,
                upper,
                reason: "Box lower edge must be strictly below the upper edge.",
            });
        }
    }
    for (index, &value) in initial.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteInitial { index, value });
        }
    }
    Ok(())
}

/// Minimize a multivariate objective inside the box `bounds`, starting
/// from `initial`.
///
/// # Parameters
/// - `f`: objective over model-space coordinates; evaluated only strictly
///   inside the box.
/// - `bounds`: per-coordinate `(lower, upper)` edges, all finite and
///   ordered.
/// - `initial`: start point; coordinates outside their interval are pulled
///   onto it by the transform's clamp.
///
/// # Returns
/// A [`VectorSolution`] with the best model-space point, its objective
/// value, and the termination summary.
///
/// # Errors
/// - [`OptError::InitialDimMismatch`] / [`OptError::InvalidBracket`] /
///   [`OptError::NonFiniteInitial`] for malformed inputs.
/// - Any error raised by `f`, recovered verbatim from the backend run.
/// - [`OptError::MissingSolution`] if the backend produced no best point.
pub fn minimize_boxed<F>(f: F, bounds: &[(f64, f64)], initial: &[f64]) -> OptResult<VectorSolution>
where
    F: Fn(&[f64]) -> OptResult<f64>,
{
    validate_box(bounds, initial)?;

    let center: Vec<f64> = initial
        .iter()
        .zip(bounds)
        .map(|(&x, &(lo, hi))| to_unbounded(x, lo, hi))
        .collect();
    let mut simplex = vec![center.clone()];
    for index in 0..center.len() {
        let mut vertex = center.clone();
        vertex[index] += SIMPLEX_STEP;
        simplex.push(vertex);
    }

    let owned_bounds = bounds.to_vec();
    let problem = VectorObjective::new(move |z: &[f64]| {
        let x: Vec<f64> = z
            .iter()
            .zip(&owned_bounds)
            .map(|(&t, &(lo, hi))| to_bounded(t, lo, hi))
            .collect();
        f(&x)
    });

    let solver = NelderMead::new(simplex).with_sd_tolerance(SD_TOLERANCE)?;
    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(MAX_SIMPLEX_ITERS))
        .run()?;

    let mut state = result.state().clone();
    let iterations = state.get_iter() as usize;
    let (converged, status) = termination_summary(state.get_termination_status());
    let value = state.get_best_cost();
    let best = state.take_best_param().ok_or(OptError::MissingSolution)?;
    let point = best
        .iter()
        .zip(bounds)
        .map(|(&t, &(lo, hi))| to_bounded(t, lo, hi))
        .collect();
    Ok(VectorSolution { point, value, iterations, converged, status })
}
