//! irt — marginal maximum likelihood estimation for item response models.
//!
//! Purpose
//! -------
//! Provide the full IRT estimation stack under a single namespace: validated
//! response containers and conditioning, the latent grid and quadrature
//! rule, the partial-integral accumulator, convergence bookkeeping, and the
//! per-family fit entry points. This is the surface most consumers
//! (including the Python bindings) should depend on.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the shared machinery: data validation, response
//!   conditioning, grid construction, the marginal accumulator, options,
//!   and convergence monitoring.
//! - [`models`] exposes the fit functions: [`fit_rasch`], [`fit_one_pl`],
//!   [`fit_two_pl`] (dichotomous), [`fit_partial_credit`] and
//!   [`fit_graded`] (polytomous).
//! - [`errors`] centralizes the error surface ([`IRTError`],
//!   [`IRTResult`]) so callers see uniform failures across the stack.
//!
//! Invariants & assumptions
//! ------------------------
//! - Response matrices are items × participants and validated once at the
//!   boundary; estimation code assumes clean input.
//! - Estimation is single-threaded and synchronous; all state is local to
//!   one fit call, and item updates within a pass are strictly sequential
//!   (Gauss–Seidel). There is no global state: defaults are constructed
//!   fresh per call.
//! - Every fit result carries a [`ConvergenceStatus`]; hitting the outer
//!   iteration cap is reported there, never as an error.
//!
//! Downstream usage
//! ----------------
//! - Typical flow: construct [`DichotomousData`] or [`PolytomousData`],
//!   build an [`EstimationOptions`] (or start from `Default`), then call
//!   the fit function for the chosen model family and read the parameter
//!   arrays and convergence status off the returned fit struct.

pub mod core;
pub mod errors;
pub mod models;

pub use self::core::{
    ConvergenceStatus, DichotomousData, EstimationOptions, LatentDensity, PolytomousData,
    MISSING_RESPONSE,
};
pub use errors::{IRTError, IRTResult};
pub use models::{
    fit_graded, fit_one_pl, fit_partial_credit, fit_rasch, fit_two_pl, fit_two_pl_from,
    DifficultyStrategy, OnePlFit, PolytomousFit, RaschFit, TwoPlFit,
};
