//! Numerical stability helpers shared by likelihood kernels and solvers.

pub mod transformations;

pub use transformations::{safe_logit, safe_sigmoid, to_bounded, to_unbounded, LOGIT_EPS};
