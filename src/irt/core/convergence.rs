//! Convergence bookkeeping for the outer estimation loop.
//!
//! Purpose
//! -------
//! Track the outer loop's primary-parameter drift and stopping rule in one
//! place: the monitor holds the previous iteration's snapshot, the fixed
//! tolerance, and the configured iteration cap, and every fit result
//! carries the resulting [`ConvergenceStatus`] so callers can distinguish
//! "converged" from "hit the cap" — the reference behavior returned the
//! last estimate either way with no signal.
//!
//! Conventions
//! -----------
//! - Drift is the max absolute elementwise difference between consecutive
//!   snapshots of the primary parameter (discrimination for the jointly
//!   estimated models, difficulty for the fixed-discrimination inner
//!   loops).
//! - The tolerance is fixed at [`PARAMETER_TOLERANCE`]; the cap comes from
//!   `EstimationOptions::max_iteration`.
use ndarray::{Array1, ArrayView1};

/// Fixed stopping tolerance on the max absolute parameter change.
pub const PARAMETER_TOLERANCE: f64 = 1e-3;

/// Outcome of an outer estimation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceStatus {
    /// Whether the drift fell below the tolerance before the cap.
    pub converged: bool,
    /// Outer iterations performed.
    pub iterations: usize,
    /// Drift recorded by the final iteration.
    pub last_delta: f64,
}

impl ConvergenceStatus {
    /// Status for a direct (non-iterative) solve.
    pub fn direct() -> Self {
        ConvergenceStatus { converged: true, iterations: 0, last_delta: 0.0 }
    }
}

/// Iteration bookkeeping for one outer loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceMonitor {
    previous: Array1<f64>,
    tolerance: f64,
    max_iteration: usize,
    iterations: usize,
    last_delta: f64,
    converged: bool,
}

impl ConvergenceMonitor {
    /// Start monitoring from the initial parameter snapshot.
    pub fn new(initial: Array1<f64>, max_iteration: usize) -> Self {
        ConvergenceMonitor {
            previous: initial,
            tolerance: PARAMETER_TOLERANCE,
            max_iteration,
            iterations: 0,
            last_delta: f64::INFINITY,
            converged: false,
        }
    }

    /// Record one completed outer iteration and report whether to stop.
    ///
    /// Returns `true` when the drift fell below the tolerance or the
    /// iteration cap was reached; the two outcomes stay distinguishable
    /// through [`status`](Self::status).
    pub fn update(&mut self, current: ArrayView1<'_, f64>) -> bool {
        self.iterations += 1;
        self.last_delta = current
            .iter()
            .zip(self.previous.iter())
            .map(|(c, p)| (c - p).abs())
            .fold(0.0, f64::max);
        self.previous.assign(&current);
        self.converged = self.last_delta < self.tolerance;
        self.converged || self.iterations >= self.max_iteration
    }

    /// Final (or current) loop status.
    pub fn status(&self) -> ConvergenceStatus {
        ConvergenceStatus {
            converged: self.converged,
            iterations: self.iterations,
            last_delta: self.last_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Stopping on tolerance vs stopping on the cap, and that the two
    //   outcomes are distinguishable in the status.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a sub-tolerance step stops the loop and reports
    // convergence.
    fn stops_on_tolerance() {
        let mut monitor = ConvergenceMonitor::new(array![1.0, 1.0], 25);

        assert!(!monitor.update(array![1.5, 1.0].view()));
        assert!(monitor.update(array![1.5 + 5e-4, 1.0].view()));

        let status = monitor.status();
        assert!(status.converged);
        assert_eq!(status.iterations, 2);
        assert!(status.last_delta < PARAMETER_TOLERANCE);
    }

    #[test]
    // Purpose
    // -------
    // Verify that hitting the cap stops the loop without claiming
    // convergence.
    fn cap_hit_is_not_convergence() {
        let mut monitor = ConvergenceMonitor::new(array![0.0], 2);

        assert!(!monitor.update(array![1.0].view()));
        assert!(monitor.update(array![2.0].view()));

        let status = monitor.status();
        assert!(!status.converged);
        assert_eq!(status.iterations, 2);
        assert_eq!(status.last_delta, 1.0);
    }
}
