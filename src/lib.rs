//! irt_mml — marginal maximum likelihood estimation for IRT models.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the estimation routines to Python via the `_irt_mml` extension
//! module. Item parameters (discrimination and difficulty/thresholds) are
//! estimated from observed response matrices by integrating the latent
//! trait out of the likelihood over a fixed quadrature grid and running a
//! coordinate-descent sweep over items.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules ([`irt`] and [`optimization`]) as the
//!   public crate surface.
//! - Define `#[pyfunction]` wrappers and the `#[pymodule]` initializer for
//!   the `_irt_mml` Python extension when the `python-bindings` feature is
//!   enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules;
//!   the binding layer performs only input conversion and error mapping.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`irt`] (data containers,
//!   options, and the `fit_*` entry points) and can ignore the PyO3 items
//!   guarded by the `python-bindings` feature.
//! - Python callers import the compiled `_irt_mml` module and receive
//!   NumPy arrays plus a `(converged, iterations)` pair per fit.

pub mod irt;
pub mod optimization;

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArray2, PyReadonlyArray2, ToPyArray};
#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::irt::{
    fit_graded, fit_one_pl, fit_partial_credit, fit_rasch, fit_two_pl, DichotomousData,
    DifficultyStrategy, EstimationOptions, PolytomousData,
};

#[cfg(feature = "python-bindings")]
fn build_options(max_iteration: usize) -> EstimationOptions {
    EstimationOptions { max_iteration, ..EstimationOptions::default() }
}

#[cfg(feature = "python-bindings")]
fn pick_strategy(separable: bool) -> DifficultyStrategy {
    if separable { DifficultyStrategy::Separable } else { DifficultyStrategy::Marginal }
}

/// Estimate Rasch difficulties for a 0/1 items × participants matrix.
///
/// Returns `(difficulty, converged, iterations)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "fit_rasch",
    signature = (dataset, discrimination = 1.0, max_iteration = 25, separable = false),
    text_signature = "(dataset, /, discrimination=1.0, max_iteration=25, separable=False)"
)]
fn py_fit_rasch<'py>(
    py: Python<'py>, dataset: PyReadonlyArray2<'py, u8>, discrimination: f64,
    max_iteration: usize, separable: bool,
) -> PyResult<(Bound<'py, PyArray1<f64>>, bool, usize)> {
    let data = DichotomousData::new(dataset.as_array().to_owned())?;
    let fit = fit_rasch(&data, discrimination, &build_options(max_iteration), pick_strategy(separable))?;
    Ok((fit.difficulty.to_pyarray(py), fit.convergence.converged, fit.convergence.iterations))
}

/// Estimate the 1PL model (shared discrimination).
///
/// Returns `(discrimination, difficulty, converged, iterations)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "fit_one_pl",
    signature = (dataset, max_iteration = 25, separable = false),
    text_signature = "(dataset, /, max_iteration=25, separable=False)"
)]
fn py_fit_one_pl<'py>(
    py: Python<'py>, dataset: PyReadonlyArray2<'py, u8>, max_iteration: usize, separable: bool,
) -> PyResult<(f64, Bound<'py, PyArray1<f64>>, bool, usize)> {
    let data = DichotomousData::new(dataset.as_array().to_owned())?;
    let fit = fit_one_pl(&data, &build_options(max_iteration), pick_strategy(separable))?;
    Ok((
        fit.discrimination,
        fit.difficulty.to_pyarray(py),
        fit.convergence.converged,
        fit.convergence.iterations,
    ))
}

/// Estimate the 2PL model (per-item discrimination).
///
/// Returns `(discrimination, difficulty, converged, iterations)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "fit_two_pl",
    signature = (dataset, max_iteration = 25, separable = false),
    text_signature = "(dataset, /, max_iteration=25, separable=False)"
)]
fn py_fit_two_pl<'py>(
    py: Python<'py>, dataset: PyReadonlyArray2<'py, u8>, max_iteration: usize, separable: bool,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>, bool, usize)> {
    let data = DichotomousData::new(dataset.as_array().to_owned())?;
    let fit = fit_two_pl(&data, &build_options(max_iteration), pick_strategy(separable))?;
    Ok((
        fit.discrimination.to_pyarray(py),
        fit.difficulty.to_pyarray(py),
        fit.convergence.converged,
        fit.convergence.iterations,
    ))
}

/// Estimate the partial-credit model for ordered category codes
/// (−1 marks a missing response).
///
/// Returns `(discrimination, thresholds, converged, iterations)` with
/// `thresholds` NaN-padded to items × max-thresholds.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "fit_partial_credit",
    signature = (dataset, max_iteration = 25),
    text_signature = "(dataset, /, max_iteration=25)"
)]
fn py_fit_partial_credit<'py>(
    py: Python<'py>, dataset: PyReadonlyArray2<'py, i32>, max_iteration: usize,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray2<f64>>, bool, usize)> {
    let data = PolytomousData::new(dataset.as_array().to_owned())?;
    let fit = fit_partial_credit(&data, &build_options(max_iteration))?;
    Ok((
        fit.discrimination.to_pyarray(py),
        fit.threshold_matrix().to_pyarray(py),
        fit.convergence.converged,
        fit.convergence.iterations,
    ))
}

/// Estimate the graded-response model for ordered category codes
/// (−1 marks a missing response).
///
/// Returns `(discrimination, thresholds, converged, iterations)` with
/// `thresholds` NaN-padded to items × max-thresholds.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "fit_graded",
    signature = (dataset, max_iteration = 25),
    text_signature = "(dataset, /, max_iteration=25)"
)]
fn py_fit_graded<'py>(
    py: Python<'py>, dataset: PyReadonlyArray2<'py, i32>, max_iteration: usize,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray2<f64>>, bool, usize)> {
    let data = PolytomousData::new(dataset.as_array().to_owned())?;
    let fit = fit_graded(&data, &build_options(max_iteration))?;
    Ok((
        fit.discrimination.to_pyarray(py),
        fit.threshold_matrix().to_pyarray(py),
        fit.convergence.converged,
        fit.convergence.iterations,
    ))
}

/// _irt_mml — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _irt_mml<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_fit_rasch, m)?)?;
    m.add_function(wrap_pyfunction!(py_fit_one_pl, m)?)?;
    m.add_function(wrap_pyfunction!(py_fit_two_pl, m)?)?;
    m.add_function(wrap_pyfunction!(py_fit_partial_credit, m)?)?;
    m.add_function(wrap_pyfunction!(py_fit_graded, m)?)?;
    Ok(())
}
