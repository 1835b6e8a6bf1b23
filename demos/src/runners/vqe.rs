//! Variational eigensolver loop.
//!
//! The classical optimizer owns the loop; every objective call binds the
//! ansatz and asks the executor for the Hamiltonian's expectation value.

use std::f64::consts::FRAC_PI_2;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, instrument};

use ketra_adapter_sim::Executor;
use ketra_ir::{Circuit, Observable};

use crate::circuits::ansatz::{hardware_efficient, num_parameters};
use crate::error::{DemoError, DemoResult};
use crate::optimizers::{NelderMead, Optimizer};

/// Result of a VQE run.
#[derive(Debug, Clone, Serialize)]
pub struct VqeResult {
    /// Optimal energy found.
    pub optimal_energy: f64,
    /// Optimal parameters.
    pub optimal_params: Vec<f64>,
    /// Number of iterations.
    pub iterations: usize,
    /// Number of circuit evaluations.
    pub circuit_evaluations: usize,
    /// Energy history during optimization.
    pub energy_history: Vec<f64>,
    /// Whether optimization converged.
    pub converged: bool,
}

/// VQE runner configuration.
pub struct VqeRunner {
    /// The Hamiltonian to minimize.
    pub hamiltonian: Observable,
    /// Number of qubits.
    pub num_qubits: u32,
    /// Number of entangling blocks in the ansatz.
    pub reps: usize,
    /// Shots per estimate; only affects the reported standard error.
    pub shots: u32,
    /// Maximum optimization iterations.
    pub maxiter: usize,
    /// Seed for the initial parameters.
    pub seed: u64,
    executor: Executor,
}

impl VqeRunner {
    /// Create a runner sized to the Hamiltonian.
    pub fn new(hamiltonian: Observable) -> Self {
        let num_qubits = hamiltonian.min_qubits();
        Self {
            hamiltonian,
            num_qubits,
            reps: 1,
            shots: 1000,
            maxiter: 100,
            seed: 42,
            executor: Executor::default(),
        }
    }

    /// Set the number of ansatz repetitions.
    pub fn with_reps(mut self, reps: usize) -> Self {
        self.reps = reps;
        self
    }

    /// Set the number of shots.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the seed for the initial parameters.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Use a specific executor.
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    /// Get the number of parameters needed.
    pub fn num_parameters(&self) -> usize {
        num_parameters(self.num_qubits, self.reps)
    }

    /// Uniform random initial parameters in `[−π/2, π/2)`.
    pub fn initial_parameters(&self) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.num_parameters())
            .map(|_| rng.gen_range(-FRAC_PI_2..FRAC_PI_2))
            .collect()
    }

    /// Bound ansatz for `params`.
    pub fn circuit(&self, params: &[f64]) -> DemoResult<Circuit> {
        hardware_efficient(self.num_qubits, self.reps, params)
    }

    /// `⟨ψ(θ)|H|ψ(θ)⟩`.
    pub fn energy(&self, params: &[f64]) -> DemoResult<f64> {
        let circuit = self.circuit(params)?;
        let estimates = self.executor.estimate(
            &circuit,
            std::slice::from_ref(&self.hamiltonian),
            self.shots,
            Some(self.seed),
        )?;
        Ok(estimates.first().map_or(0.0, |e| e.value))
    }

    /// Run VQE from seeded random parameters.
    pub fn run(&self) -> DemoResult<VqeResult> {
        self.run_with_params(self.initial_parameters())
    }

    /// Run VQE with specified initial parameters.
    #[instrument(skip(self, initial_params), fields(qubits = self.num_qubits, reps = self.reps))]
    pub fn run_with_params(&self, initial_params: Vec<f64>) -> DemoResult<VqeResult> {
        let expected = self.num_parameters();
        if initial_params.len() != expected {
            return Err(DemoError::ParameterCount {
                expected,
                got: initial_params.len(),
            });
        }

        let optimizer = NelderMead::new().with_maxiter(self.maxiter).with_tol(1e-6);
        let result = optimizer.minimize(
            |params| {
                let energy = self.energy(params)?;
                debug!(energy, "objective evaluated");
                Ok::<f64, DemoError>(energy)
            },
            initial_params,
        )?;

        info!(
            energy = result.optimal_value,
            evaluations = result.num_evaluations,
            converged = result.converged,
            "optimization finished"
        );

        Ok(VqeResult {
            optimal_energy: result.optimal_value,
            optimal_params: result.optimal_params,
            iterations: result.num_iterations,
            circuit_evaluations: result.num_evaluations,
            energy_history: result.history,
            converged: result.converged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::zz_chain;

    #[test]
    fn test_sizes_from_hamiltonian() {
        let runner = VqeRunner::new(zz_chain(3, 1.0)).with_reps(2);
        assert_eq!(runner.num_qubits, 3);
        assert_eq!(runner.num_parameters(), 18);
        assert_eq!(runner.initial_parameters().len(), 18);
        assert_eq!(runner.initial_parameters(), runner.initial_parameters());
    }

    #[test]
    fn test_zero_parameters_give_aligned_chain() {
        // All angles zero leaves |000⟩, where every ZZ bond is +1.
        let runner = VqeRunner::new(zz_chain(3, 1.0));
        let energy = runner.energy(&vec![0.0; runner.num_parameters()]).unwrap();
        assert!((energy - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_wrong_parameter_count() {
        let runner = VqeRunner::new(zz_chain(2, 1.0));
        assert!(matches!(
            runner.run_with_params(vec![0.0]),
            Err(DemoError::ParameterCount { .. })
        ));
    }
}
