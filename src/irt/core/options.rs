//! Estimation options — configuration for the MML estimation workflows.
//!
//! Purpose
//! -------
//! Collect the configuration knobs shared by every model family in one
//! validated bundle: the outer-loop iteration cap, the latent-trait prior
//! density, and the quadrature discretization (bounds and order). Every fit
//! entry point takes an [`EstimationOptions`] and validates it eagerly,
//! before any numerical work begins.
//!
//! Key behaviors
//! -------------
//! - Represent the latent prior via [`LatentDensity`], sampled once per
//!   estimation call at the grid nodes and treated as a fixed vector
//!   thereafter.
//! - Provide the conventional defaults (25 outer iterations, standard
//!   normal prior, bounds (−5, 5), order 61) as an explicit `Default`
//!   value constructed fresh per call — never shared mutable state.
//! - Reject malformed configuration (zero cap, inverted or non-finite
//!   bounds, degenerate order, non-positive density scale) with structured
//!   errors.
//!
//! Conventions
//! -----------
//! - `quadrature_n` is both the node count of the latent grid and the
//!   order of the integration rule; the two cannot disagree because they
//!   live in one [`QuadratureRule`](crate::irt::core::grid::QuadratureRule)
//!   object.
//! - Fields are public for struct-literal updates from `Default`; fit
//!   entry points re-validate, so a hand-mutated invalid value fails fast
//!   rather than corrupting the numerics.
use crate::irt::{
    core::validation::{
        validate_max_iteration, validate_normal_density, validate_quadrature_bounds,
        validate_quadrature_order,
    },
    errors::{IRTError, IRTResult},
};
use ndarray::Array1;
use statrs::distribution::{Continuous, Normal};

/// Latent-trait prior density, evaluated at the grid nodes.
///
/// The default is a standard normal. A custom density is supplied as a
/// plain function pointer so options stay `Clone` + `Debug`; it must be
/// finite and non-negative over the quadrature interval (checked when the
/// grid samples it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatentDensity {
    /// Standard normal density N(0, 1).
    Standard,
    /// Normal density with the given mean and standard deviation.
    Normal { mean: f64, std_dev: f64 },
    /// Arbitrary density function of the latent trait.
    Custom(fn(f64) -> f64),
}

impl LatentDensity {
    /// Sample the density at the supplied nodes.
    ///
    /// # Errors
    /// - [`IRTError::InvalidDensity`] for non-finite normal parameters or
    ///   a non-positive standard deviation.
    pub fn sample(&self, nodes: &Array1<f64>) -> IRTResult<Array1<f64>> {
        match self {
            LatentDensity::Standard => {
                let normal = Normal::new(0.0, 1.0)
                    .map_err(|_| IRTError::InvalidDensity { reason: "standard normal" })?;
                Ok(nodes.mapv(|theta| normal.pdf(theta)))
            }
            LatentDensity::Normal { mean, std_dev } => {
                validate_normal_density(*mean, *std_dev)?;
                let normal = Normal::new(*mean, *std_dev).map_err(|_| IRTError::InvalidDensity {
                    reason: "normal parameters rejected by the distribution backend",
                })?;
                Ok(nodes.mapv(|theta| normal.pdf(theta)))
            }
            LatentDensity::Custom(f) => Ok(nodes.mapv(*f)),
        }
    }
}

impl Default for LatentDensity {
    fn default() -> Self {
        LatentDensity::Standard
    }
}

/// Estimation-time configuration shared by all model families.
///
/// Fields:
/// - `max_iteration`: outer-loop cap (must be positive).
/// - `distribution`: latent-trait prior density.
/// - `quadrature_bounds`: `(lower, upper)` interval of the latent grid.
/// - `quadrature_n`: node count / integration order (must be ≥ 2).
///
/// Default:
/// - `max_iteration = 25`
/// - `distribution = LatentDensity::Standard`
/// - `quadrature_bounds = (−5, 5)`
/// - `quadrature_n = 61`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimationOptions {
    /// Outer-loop iteration cap.
    pub max_iteration: usize,
    /// Latent-trait prior density.
    pub distribution: LatentDensity,
    /// Latent grid interval `(lower, upper)`.
    pub quadrature_bounds: (f64, f64),
    /// Node count of the grid and order of the integration rule.
    pub quadrature_n: usize,
}

impl EstimationOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`IRTError::InvalidMaxIteration`] if the cap is zero.
    /// - [`IRTError::InvalidQuadratureBounds`] for non-finite or unordered
    ///   bounds.
    /// - [`IRTError::InvalidQuadratureOrder`] for an order below 2.
    pub fn new(
        max_iteration: usize, distribution: LatentDensity, quadrature_bounds: (f64, f64),
        quadrature_n: usize,
    ) -> IRTResult<Self> {
        let options =
            EstimationOptions { max_iteration, distribution, quadrature_bounds, quadrature_n };
        options.validate()?;
        Ok(options)
    }

    /// Re-run the eager configuration checks.
    ///
    /// Fit entry points call this before any numerical work, so options
    /// mutated through the public fields still fail fast.
    pub fn validate(&self) -> IRTResult<()> {
        validate_max_iteration(self.max_iteration)?;
        validate_quadrature_bounds(self.quadrature_bounds)?;
        validate_quadrature_order(self.quadrature_n)?;
        if let LatentDensity::Normal { mean, std_dev } = self.distribution {
            validate_normal_density(mean, std_dev)?;
        }
        Ok(())
    }
}

impl Default for EstimationOptions {
    /// Conventional defaults: 25 outer iterations, standard normal prior,
    /// a 61-node rule over (−5, 5).
    fn default() -> Self {
        EstimationOptions {
            max_iteration: 25,
            distribution: LatentDensity::Standard,
            quadrature_bounds: (-5.0, 5.0),
            quadrature_n: 61,
        }
    }
}
