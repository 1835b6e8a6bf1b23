//! Derivative-free classical optimizers for the variational loop.

mod nelder_mead;

pub use nelder_mead::NelderMead;

use serde::Serialize;

/// Result of an optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best objective value after each improvement.
    pub history: Vec<f64>,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// A minimiser over a fallible objective.
///
/// The first objective error aborts the run and is returned unchanged.
pub trait Optimizer {
    /// Minimise `objective` starting from `initial_params`.
    fn minimize<F, E>(&self, objective: F, initial_params: Vec<f64>) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>;
}
