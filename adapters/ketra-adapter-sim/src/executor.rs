//! Synchronous execution facade: expand, simulate, then sample or estimate.

use std::borrow::Cow;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use ketra_hal::{Counts, Estimate};
use ketra_ir::{Circuit, Observable};
use ketra_synth::expand;

use crate::config::SimulatorConfig;
use crate::engine::{Engine, NumericalDrift, SimulationReport};
use crate::error::SimResult;
use crate::estimator;
use crate::sampler::Sampler;
use crate::statevector::Statevector;

/// Runs circuits on a fresh statevector per call.
///
/// Holds no per-run state, so one executor can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: SimulatorConfig,
}

impl Executor {
    /// Create an executor.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulate and sample `shots` outcomes of the circuit's measurement
    /// bindings. Without a seed the generator is seeded from entropy.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name(), qubits = circuit.num_qubits()))]
    pub fn run(&self, circuit: &Circuit, shots: u32, seed: Option<u64>) -> SimResult<Counts> {
        self.run_with_report(circuit, shots, seed)
            .map(|(counts, _)| counts)
    }

    /// Like [`run`](Self::run), also returning the drift observed while
    /// simulating.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name(), qubits = circuit.num_qubits()))]
    pub fn run_with_report(
        &self,
        circuit: &Circuit,
        shots: u32,
        seed: Option<u64>,
    ) -> SimResult<(Counts, Vec<NumericalDrift>)> {
        let report = self.simulate(circuit)?;
        let sampler = Sampler::new(
            &report.statevector,
            circuit.measurements(),
            circuit.num_clbits(),
        )?;
        let counts = match seed {
            Some(seed) => sampler.sample_seeded(shots, seed)?,
            None => sampler.sample(shots, &mut StdRng::from_entropy())?,
        };
        debug!(shots, outcomes = counts.len(), "sampling finished");
        Ok((counts, report.drift))
    }

    /// Final statevector of the circuit. Measurement bindings are ignored.
    pub fn statevector(&self, circuit: &Circuit) -> SimResult<Statevector> {
        Ok(self.simulate(circuit)?.statevector)
    }

    /// Full simulation report, expanding first when configured to.
    pub fn simulate(&self, circuit: &Circuit) -> SimResult<SimulationReport> {
        let engine = Engine::new(self.config.clone(), circuit.num_qubits())?;
        let circuit = self.prepare(circuit)?;
        engine.run(&circuit)
    }

    /// Estimate every observable on the circuit's final state, in order.
    ///
    /// Estimates are exact expectation values and consume no randomness, so
    /// the seed is ignored. It is part of the signature to match
    /// [`run`](Self::run) and the estimate job request.
    #[instrument(
        skip(self, circuit, observables),
        fields(circuit = circuit.name(), observables = observables.len())
    )]
    pub fn estimate(
        &self,
        circuit: &Circuit,
        observables: &[Observable],
        shots: u32,
        _seed: Option<u64>,
    ) -> SimResult<Vec<Estimate>> {
        let statevector = self.statevector(circuit)?;
        observables
            .iter()
            .map(|o| estimator::estimate(&statevector, o, shots))
            .collect()
    }

    fn prepare<'a>(&self, circuit: &'a Circuit) -> SimResult<Cow<'a, Circuit>> {
        if self.config.expand_controls {
            Ok(Cow::Owned(expand(circuit)?))
        } else {
            Ok(Cow::Borrowed(circuit))
        }
    }
}
