//! solvers — bounded, derivative-free solves over closure objectives.
//!
//! Purpose
//! -------
//! Provide the three optimization primitives the estimation loops need,
//! each as a plain function over a closure objective:
//! - [`minimize_scalar`]: bounded univariate minimization (Brent),
//! - [`root_scalar`]: bounded monotone root-finding (Brent),
//! - [`minimize_boxed`]: bounded multivariate minimization (Nelder–Mead in
//!   a logistic box reparameterization).
//!
//! Key behaviors
//! -------------
//! - Validate brackets, boxes, and start points before any backend call.
//! - Adapt closure objectives into argmin problems via [`adapter`] and
//!   normalize termination state into [`ScalarSolution`] /
//!   [`VectorSolution`].
//! - Recover objective errors from backend runs without stringifying them.
//!
//! Downstream usage
//! ----------------
//! - The model layer builds per-item negative-log-marginal objectives as
//!   closures over the current accumulator state and hands them to these
//!   functions; solutions are written back at the call site.

pub mod adapter;
pub mod scalar;
pub mod simplex;
pub mod types;

pub use scalar::{minimize_scalar, root_scalar};
pub use simplex::minimize_boxed;
pub use types::{ScalarSolution, VectorSolution};
