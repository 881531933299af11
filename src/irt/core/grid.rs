//! Latent-trait grid — quadrature rule construction and prior sampling.
//!
//! Purpose
//! -------
//! Build the discretization of the latent-trait axis used by every MML
//! estimator: a fixed-order Gauss–Legendre rule over a bounded interval,
//! plus the prior density sampled once at its nodes. Integration is always
//! a weighted sum over arrays pre-evaluated at the rule's own nodes, so
//! "where to sample" and "how to sum" cannot drift apart: both live in one
//! [`QuadratureRule`] object.
//!
//! Key behaviors
//! -------------
//! - [`QuadratureRule::new`] computes Gauss–Legendre nodes and weights by
//!   Newton iteration on the Legendre polynomial, then maps them onto the
//!   requested interval.
//! - [`QuadratureRule::integrate`] performs the weighted sum over a vector
//!   of integrand values sampled at [`QuadratureRule::nodes`].
//! - [`LatentGrid::new`] builds the rule from validated options and
//!   samples the configured prior density, rejecting non-finite or
//!   negative density values.
//!
//! Invariants & assumptions
//! ------------------------
//! - `nodes.len() == weights.len() == order`, nodes strictly increasing
//!   inside the open interval, weights strictly positive summing to
//!   `upper − lower`.
//! - An order-`n` rule integrates polynomials up to degree `2n − 1`
//!   exactly (up to rounding).
//! - The sampled density is finite and non-negative at every node and is
//!   treated as a fixed vector for the lifetime of the grid.
use crate::irt::{
    core::{
        options::EstimationOptions,
        validation::{validate_quadrature_bounds, validate_quadrature_order},
    },
    errors::{IRTError, IRTResult},
};
use ndarray::{Array1, ArrayView1};

/// Newton-iteration convergence threshold for Legendre roots.
const ROOT_EPS: f64 = 1e-14;

/// Newton-iteration cap per root.
const MAX_NEWTON_STEPS: usize = 64;

/// Fixed-order Gauss–Legendre rule over a bounded interval.
///
/// Owns the nodes and weights together so integrands sampled at
/// [`nodes`](QuadratureRule::nodes) are guaranteed to be summed against the
/// matching weights.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    nodes: Array1<f64>,
    weights: Array1<f64>,
    lower: f64,
    upper: f64,
}

impl QuadratureRule {
    /// Build an order-`order` Gauss–Legendre rule over `[lower, upper]`.
    ///
    /// # Errors
    /// - [`IRTError::InvalidQuadratureOrder`] for an order below 2.
    /// - [`IRTError::InvalidQuadratureBounds`] for non-finite or unordered
    ///   bounds.
    pub fn new(order: usize, lower: f64, upper: f64) -> IRTResult<Self> {
        validate_quadrature_order(order)?;
        validate_quadrature_bounds((lower, upper))?;

        let (reference_nodes, reference_weights) = legendre_rule(order);
        let half_width = 0.5 * (upper - lower);
        let midpoint = 0.5 * (upper + lower);
        let nodes = Array1::from_iter(reference_nodes.iter().map(|&t| midpoint + half_width * t));
        let weights = Array1::from_iter(reference_weights.iter().map(|&w| half_width * w));
        Ok(QuadratureRule { nodes, weights, lower, upper })
    }

    /// Node count of the rule.
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Abscissas, strictly increasing inside the open interval.
    pub fn nodes(&self) -> &Array1<f64> {
        &self.nodes
    }

    /// Weights matched to [`nodes`](QuadratureRule::nodes).
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Interval the rule integrates over.
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    /// Weighted sum of integrand values sampled at this rule's nodes.
    ///
    /// `values[q]` must be the integrand evaluated at `nodes()[q]`.
    pub fn integrate(&self, values: ArrayView1<'_, f64>) -> f64 {
        self.weights.dot(&values)
    }
}

/// Gauss–Legendre nodes and weights on the reference interval [−1, 1].
///
/// Roots of the order-`n` Legendre polynomial are located by Newton
/// iteration from the Chebyshev-like initial guesses; symmetry supplies
/// the mirrored half.
fn legendre_rule(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];
    let half = n.div_ceil(2);
    for i in 0..half {
        let mut x = (std::f64::consts::PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..MAX_NEWTON_STEPS {
            let (p, dp) = legendre_with_derivative(n, x);
            let step = p / dp;
            x -= step;
            if step.abs() <= ROOT_EPS {
                break;
            }
        }
        let (_, dp) = legendre_with_derivative(n, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        // The initial guesses walk the positive roots downward; mirror them
        // into ascending order.
        nodes[i] = -x;
        nodes[n - 1 - i] = x;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }
    (nodes, weights)
}

/// Evaluate the order-`n` Legendre polynomial and its derivative at `x`
/// via the three-term recurrence.
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    let mut previous = 1.0;
    let mut current = x;
    for k in 2..=n {
        let k = k as f64;
        let next = ((2.0 * k - 1.0) * x * current - (k - 1.0) * previous) / k;
        previous = current;
        current = next;
    }
    let derivative = n as f64 * (x * current - previous) / (x * x - 1.0);
    (current, derivative)
}

/// Latent-trait grid: a quadrature rule plus the prior density sampled at
/// its nodes.
///
/// Built once per estimation call from validated options; immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct LatentGrid {
    rule: QuadratureRule,
    density: Array1<f64>,
}

impl LatentGrid {
    /// Build the grid and sample the configured prior density at its
    /// nodes.
    ///
    /// # Errors
    /// - Configuration errors from [`QuadratureRule::new`] or the density
    ///   parameters.
    /// - [`IRTError::NonFiniteDensity`] if the density evaluates to a
    ///   negative or non-finite value at any node.
    pub fn new(options: &EstimationOptions) -> IRTResult<Self> {
        let (lower, upper) = options.quadrature_bounds;
        let rule = QuadratureRule::new(options.quadrature_n, lower, upper)?;
        let density = options.distribution.sample(rule.nodes())?;
        for (node, value) in rule.nodes().iter().zip(density.iter()) {
            if !value.is_finite() || *value < 0.0 {
                return Err(IRTError::NonFiniteDensity { node: *node, value: *value });
            }
        }
        Ok(LatentGrid { rule, density })
    }

    /// The underlying quadrature rule.
    pub fn rule(&self) -> &QuadratureRule {
        &self.rule
    }

    /// Grid nodes (latent-trait abscissas).
    pub fn nodes(&self) -> &Array1<f64> {
        self.rule.nodes()
    }

    /// Prior density sampled at [`nodes`](LatentGrid::nodes).
    pub fn density(&self) -> &Array1<f64> {
        &self.density
    }

    /// Node count.
    pub fn len(&self) -> usize {
        self.rule.order()
    }

    /// Whether the grid is empty (never true for a validated grid).
    pub fn is_empty(&self) -> bool {
        self.rule.order() == 0
    }
}
