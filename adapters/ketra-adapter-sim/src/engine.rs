//! Circuit execution over a statevector.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ketra_ir::Circuit;

use crate::config::{MAX_ADDRESSABLE_QUBITS, SimulatorConfig};
use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Norm deviation observed after one operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericalDrift {
    /// Position of the operation in the circuit.
    pub op_index: usize,
    /// `|‖ψ‖² − 1|` after the operation.
    pub deviation: f64,
}

/// Final state of a run plus any drift warnings.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// State after the last operation.
    pub statevector: Statevector,
    /// Operations after which the norm left the tolerance band.
    pub drift: Vec<NumericalDrift>,
}

/// Applies circuits of a fixed width to a statevector.
#[derive(Debug, Clone)]
pub struct Engine {
    config: SimulatorConfig,
    num_qubits: u32,
}

impl Engine {
    /// Create an engine for an `num_qubits`-wide register.
    pub fn new(config: SimulatorConfig, num_qubits: u32) -> SimResult<Self> {
        let max = config.max_qubits.min(MAX_ADDRESSABLE_QUBITS);
        if num_qubits > max {
            return Err(SimError::ResourceExhausted {
                requested: num_qubits,
                max,
            });
        }
        Ok(Self { config, num_qubits })
    }

    /// Register width.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Run `circuit` from |0…0⟩.
    pub fn run(&self, circuit: &Circuit) -> SimResult<SimulationReport> {
        let initial =
            Statevector::new(self.num_qubits).with_parallel_threshold(self.config.parallel_threshold);
        self.run_from(initial, circuit)
    }

    /// Run `circuit` from an arbitrary initial state.
    pub fn run_from(&self, initial: Statevector, circuit: &Circuit) -> SimResult<SimulationReport> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(SimError::QubitOutOfRange {
                expected: self.num_qubits,
                got: circuit.num_qubits(),
            });
        }
        if initial.num_qubits() != self.num_qubits {
            return Err(SimError::QubitOutOfRange {
                expected: self.num_qubits,
                got: initial.num_qubits(),
            });
        }

        let mut statevector = initial.with_parallel_threshold(self.config.parallel_threshold);
        let mut drift = Vec::new();
        for (op_index, inst) in circuit.instructions().iter().enumerate() {
            statevector.apply_instruction(inst);
            if self.config.check_norm {
                let deviation = (statevector.norm_sqr() - 1.0).abs();
                if deviation > self.config.tolerance {
                    warn!(op_index, op = inst.name(), deviation, "statevector norm drifted");
                    drift.push(NumericalDrift {
                        op_index,
                        deviation,
                    });
                }
            }
        }

        debug!(
            circuit = circuit.name(),
            qubits = self.num_qubits,
            ops = circuit.len(),
            drift = drift.len(),
            "simulation finished"
        );
        Ok(SimulationReport { statevector, drift })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketra_ir::{CustomBlock, QubitId, UnitaryMatrix};
    use num_complex::Complex64;

    #[test]
    fn test_resource_limit() {
        let config = SimulatorConfig::default().with_max_qubits(4);
        assert!(matches!(
            Engine::new(config, 5),
            Err(SimError::ResourceExhausted {
                requested: 5,
                max: 4
            })
        ));
    }

    #[test]
    fn test_unbounded_config_still_caps_width() {
        let config = SimulatorConfig::default().with_max_qubits(u32::MAX);
        for width in [MAX_ADDRESSABLE_QUBITS + 1, 64, 200] {
            match Engine::new(config.clone(), width) {
                Err(SimError::ResourceExhausted { requested, max }) => {
                    assert_eq!(requested, width);
                    assert_eq!(max, MAX_ADDRESSABLE_QUBITS);
                }
                other => panic!("width {width} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn test_width_mismatch() {
        let engine = Engine::new(SimulatorConfig::default(), 3).unwrap();
        let circuit = Circuit::bell().unwrap();
        assert!(matches!(
            engine.run(&circuit),
            Err(SimError::QubitOutOfRange {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_clean_run_has_no_drift() {
        let config = SimulatorConfig::default().with_check_norm(true);
        let circuit = Circuit::ghz(4).unwrap();
        let report = Engine::new(config, 4).unwrap().run(&circuit).unwrap();
        assert!(report.drift.is_empty());
        let probs = report.statevector.probabilities();
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!((probs[15] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_drift_is_reported_not_fatal() {
        // A non-unitary dense block built without the debug check.
        let half = Complex64::new(0.5, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let data = vec![half, zero, zero, half];
        let matrix: UnitaryMatrix = serde_json::from_value(serde_json::json!({
            "num_qubits": 1,
            "data": data,
        }))
        .unwrap();
        let mut circuit = Circuit::with_size("lossy", 1, 0);
        circuit
            .block(CustomBlock::from_matrix("shrink", matrix), [QubitId(0)])
            .unwrap()
            .x(QubitId(0))
            .unwrap();

        let config = SimulatorConfig::default().with_check_norm(true);
        let report = Engine::new(config, 1).unwrap().run(&circuit).unwrap();
        assert_eq!(report.drift.len(), 2);
        assert_eq!(report.drift[0].op_index, 0);
        assert!((report.drift[0].deviation - 0.75).abs() < 1e-12);
    }
}
