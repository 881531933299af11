//! optimization — bounded solver layer and numerical-stability helpers.
//!
//! Purpose
//! -------
//! Back the per-item nonlinear sub-problems of the estimation loops with a
//! small, uniform optimization surface: validated bounded univariate and
//! multivariate solves over closure objectives, plus the guarded logistic
//! transforms those solves (and the likelihood kernels) share.
//!
//! Key behaviors
//! -------------
//! - [`solvers`] wraps the argmin backend (Brent minimization, Brent
//!   root-finding, Nelder–Mead) behind plain functions returning
//!   normalized solution types.
//! - [`numerical_stability`] holds overflow-safe sigmoid/logit transforms
//!   and the bounded↔unbounded box mapping.
//! - [`errors`] defines the solver error taxonomy and the argmin error
//!   normalization.
//!
//! Conventions
//! -----------
//! - All solves are minimizations; callers construct objectives in the
//!   orientation they want minimized (here: negative log marginal
//!   likelihood).
//! - Solvers are synchronous and allocation-light; no logging, no I/O.

pub mod errors;
pub mod numerical_stability;
pub mod solvers;

pub use errors::{OptError, OptResult};
pub use solvers::{minimize_boxed, minimize_scalar, root_scalar, ScalarSolution, VectorSolution};
