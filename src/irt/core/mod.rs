//! irt::core — shared numerical and structural building blocks.
//!
//! Purpose
//! -------
//! Collect the machinery every model family shares: validated response
//! containers ([`data`]), compact likelihood representations
//! ([`conditioning`]), the latent grid and its quadrature rule ([`grid`]),
//! estimation configuration ([`options`], [`validation`]), the
//! partial-integral accumulator ([`marginal`]), and outer-loop
//! bookkeeping ([`convergence`]).
//!
//! Downstream usage
//! ----------------
//! - The model families in [`crate::irt::models`] compose these pieces;
//!   nothing here knows about any specific item response function.

pub mod conditioning;
pub mod convergence;
pub mod data;
pub mod grid;
pub mod marginal;
pub mod options;
pub mod validation;

pub use conditioning::{ConditionedItem, ConditionedPolytomous, EndorsementTally, ResponsePatterns};
pub use convergence::{ConvergenceMonitor, ConvergenceStatus, PARAMETER_TOLERANCE};
pub use data::{DichotomousData, PolytomousData, MISSING_RESPONSE};
pub use grid::{LatentGrid, QuadratureRule};
pub use marginal::MarginalAccumulator;
pub use options::{EstimationOptions, LatentDensity};
