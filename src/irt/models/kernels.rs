//! Item-likelihood kernels — the per-model contribution formulas.
//!
//! Purpose
//! -------
//! Evaluate one item's likelihood contribution at every response row and
//! grid node, in the form the marginal accumulator multiplies and divides:
//! - dichotomous: the logistic item response function, driven through the
//!   signed-exponent convention so one formula covers both outcomes;
//! - partial-credit: ordered-category probabilities from cumulative step
//!   sums, normalized with a max-shifted softmax;
//! - graded-response: ordered-category probabilities from differences of
//!   adjacent boundary curves.
//!
//! Conventions
//! -----------
//! - Contribution matrices are rows × nodes, rows matching the
//!   accumulator: patterns for dichotomous models, participants for
//!   polytomous models.
//! - Polytomous thresholds passed here are the *free* thresholds only
//!   (`m − 1` values); the partial-credit reference threshold is an
//!   implicit 0 and contributes a constant that cancels in the softmax.
//! - A missing response contributes the multiplicative identity 1.
use crate::irt::core::grid::LatentGrid;
use crate::optimization::numerical_stability::safe_sigmoid;
use ndarray::{Array1, Array2, ArrayView1};

/// Logistic contribution of one dichotomous item across all patterns.
///
/// Entry `(p, q)` is `sigmoid(sign_p · a · (θ_q − b))`: the probability of
/// pattern `p`'s observed outcome for this item at node `q` (+1 sign =
/// endorsed, −1 = not endorsed).
pub fn dichotomous_contribution(
    nodes: &Array1<f64>, signs: ArrayView1<'_, f64>, discrimination: f64, difficulty: f64,
) -> Array2<f64> {
    let mut contribution = Array2::<f64>::zeros((signs.len(), nodes.len()));
    for (p, &sign) in signs.iter().enumerate() {
        for (q, &theta) in nodes.iter().enumerate() {
            contribution[[p, q]] = safe_sigmoid(sign * discrimination * (theta - difficulty));
        }
    }
    contribution
}

/// Expected endorsement probability of a dichotomous item under the
/// prior: `∫ sigmoid(a(θ − b)) φ(θ) dθ` over the grid.
///
/// This is the monotone (in `b`) curve the separable difficulty solve and
/// the graded-response threshold equations invert.
pub fn expected_endorsement(grid: &LatentGrid, discrimination: f64, difficulty: f64) -> f64 {
    let integrand = Array1::from_iter(
        grid.nodes()
            .iter()
            .zip(grid.density().iter())
            .map(|(&theta, &phi)| safe_sigmoid(discrimination * (theta - difficulty)) * phi),
    );
    grid.rule().integrate(integrand.view())
}

/// Partial-credit category probabilities for one item at every node.
///
/// Row `k` holds `P(X = k | θ_q)` for the dense categories `0..m`, with
/// `m = thresholds.len() + 1`. Exponents are cumulative step sums
/// `Σ_{j≤k} a(θ − δ_j)` over the free thresholds, normalized by a
/// max-shifted softmax for stability.
pub fn credit_category_probabilities(
    nodes: &Array1<f64>, discrimination: f64, thresholds: ArrayView1<'_, f64>,
) -> Array2<f64> {
    let n_categories = thresholds.len() + 1;
    let mut probabilities = Array2::<f64>::zeros((n_categories, nodes.len()));
    let mut exponents = vec![0.0; n_categories];
    for (q, &theta) in nodes.iter().enumerate() {
        let mut running = 0.0;
        exponents[0] = 0.0;
        for (k, &threshold) in thresholds.iter().enumerate() {
            running += discrimination * (theta - threshold);
            exponents[k + 1] = running;
        }
        let shift = exponents.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let normalizer: f64 = exponents.iter().map(|&e| (e - shift).exp()).sum();
        for (k, &e) in exponents.iter().enumerate() {
            probabilities[[k, q]] = (e - shift).exp() / normalizer;
        }
    }
    probabilities
}

/// Partial-credit contribution of one item across all participants.
///
/// Entry `(p, q)` is the probability of participant `p`'s observed dense
/// category at node `q`; missing responses contribute 1.
pub fn credit_contribution(
    nodes: &Array1<f64>, discrimination: f64, thresholds: ArrayView1<'_, f64>,
    categories: &Array1<i32>,
) -> Array2<f64> {
    let probabilities = credit_category_probabilities(nodes, discrimination, thresholds);
    scatter_by_category(&probabilities, categories, nodes.len())
}

/// Graded-response category probabilities for one item at every node.
///
/// Row `k` holds `P(X = k | θ_q)` as the difference of adjacent boundary
/// curves `S_k(θ) = sigmoid(a(θ − t_k))`, with the outer boundaries
/// handled explicitly (`S_0 ≡ 1`, `S_m ≡ 0`). Thresholds must be the
/// item's `m − 1` ordered boundary locations.
pub fn graded_category_probabilities(
    nodes: &Array1<f64>, discrimination: f64, thresholds: ArrayView1<'_, f64>,
) -> Array2<f64> {
    let n_categories = thresholds.len() + 1;
    let mut probabilities = Array2::<f64>::zeros((n_categories, nodes.len()));
    for (q, &theta) in nodes.iter().enumerate() {
        let mut upper_boundary = 1.0;
        for k in 0..n_categories {
            let lower_boundary = if k < thresholds.len() {
                safe_sigmoid(discrimination * (theta - thresholds[k]))
            } else {
                0.0
            };
            probabilities[[k, q]] = upper_boundary - lower_boundary;
            upper_boundary = lower_boundary;
        }
    }
    probabilities
}

/// Graded-response contribution of one item across all participants.
///
/// Entry `(p, q)` is the probability of participant `p`'s observed dense
/// category at node `q`; missing responses contribute 1.
pub fn graded_contribution(
    nodes: &Array1<f64>, discrimination: f64, thresholds: ArrayView1<'_, f64>,
    categories: &Array1<i32>,
) -> Array2<f64> {
    let probabilities = graded_category_probabilities(nodes, discrimination, thresholds);
    scatter_by_category(&probabilities, categories, nodes.len())
}

/// Expand category probabilities (categories × nodes) into a contribution
/// matrix (participants × nodes) by observed category, with missing rows
/// left at the multiplicative identity.
fn scatter_by_category(
    probabilities: &Array2<f64>, categories: &Array1<i32>, n_nodes: usize,
) -> Array2<f64> {
    let mut contribution = Array2::<f64>::ones((categories.len(), n_nodes));
    for (participant, &category) in categories.iter().enumerate() {
        if category >= 0 {
            contribution.row_mut(participant).assign(&probabilities.row(category as usize));
        }
    }
    contribution
}
