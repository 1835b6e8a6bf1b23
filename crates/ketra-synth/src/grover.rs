//! Grover search building blocks.

use std::f64::consts::PI;

use ketra_ir::{Circuit, QubitId, qubit_range};
use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

/// Options for assembling Grover circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroverOptions {
    /// Separate oracle, diffusion and iterations with barriers.
    pub insert_barriers: bool,
}

impl Default for GroverOptions {
    fn default() -> Self {
        Self {
            insert_barriers: true,
        }
    }
}

/// Phase oracle flipping the sign of every basis state in `marked`.
///
/// Each state is marked with an X-sandwich around a multi-controlled Z:
/// X on the qubits whose bit is 0, MCZ over the register, X again.
pub fn phase_oracle(num_qubits: u32, marked: &[usize]) -> SynthResult<Circuit> {
    let mut oracle = Circuit::with_size("oracle", num_qubits, 0);
    let all = qubit_range(0, num_qubits);
    for &state in marked {
        if num_qubits == 0 || (num_qubits < usize::BITS && state >> num_qubits != 0) {
            return Err(SynthError::MarkedStateOutOfRange { state, num_qubits });
        }
        let zeros: Vec<QubitId> = all
            .iter()
            .copied()
            .filter(|q| state & q.mask() == 0)
            .collect();
        for &q in &zeros {
            oracle.x(q)?;
        }
        oracle.mcz(&all)?;
        for &q in &zeros {
            oracle.x(q)?;
        }
    }
    Ok(oracle)
}

/// Diffusion operator: reflection about the uniform superposition.
///
/// H layer, X layer, MCZ, X layer, H layer. Equal to `2|s⟩⟨s| - I` up to a
/// global phase of -1.
pub fn diffusion(num_qubits: u32) -> SynthResult<Circuit> {
    let mut circuit = Circuit::with_size("diffusion", num_qubits, 0);
    let all = qubit_range(0, num_qubits);
    for &q in &all {
        circuit.h(q)?;
    }
    for &q in &all {
        circuit.x(q)?;
    }
    circuit.mcz(&all)?;
    for &q in &all {
        circuit.x(q)?;
    }
    for &q in &all {
        circuit.h(q)?;
    }
    Ok(circuit)
}

/// One Grover iteration: `oracle` followed by the diffusion operator.
pub fn grover_iterate(oracle: &Circuit, options: GroverOptions) -> SynthResult<Circuit> {
    let n = oracle.num_qubits();
    let all = qubit_range(0, n);
    let mut circuit = Circuit::with_size("grover_iterate", n, 0);
    circuit.append_circuit(oracle, &all)?;
    if options.insert_barriers {
        circuit.barrier_all()?;
    }
    circuit.append_circuit(&diffusion(n)?, &all)?;
    Ok(circuit)
}

/// Full search circuit: uniform superposition, `iterations` Grover
/// iterations, then every qubit measured into the matching classical bit.
pub fn grover_circuit(
    oracle: &Circuit,
    iterations: usize,
    options: GroverOptions,
) -> SynthResult<Circuit> {
    let n = oracle.num_qubits();
    let all = qubit_range(0, n);
    let iterate = grover_iterate(oracle, options)?;

    let mut circuit = Circuit::with_size("grover", n, n);
    for &q in &all {
        circuit.h(q)?;
    }
    if options.insert_barriers {
        circuit.barrier_all()?;
    }
    for _ in 0..iterations {
        circuit.append_circuit(&iterate, &all)?;
        if options.insert_barriers {
            circuit.barrier_all()?;
        }
    }
    circuit.measure_all()?;
    Ok(circuit)
}

/// Optimal iteration count `floor(π / (4·asin(√(m/N))))` with `N = 2^n`.
///
/// Returns 0 when there are no solutions or more solutions than states.
pub fn optimal_iterations(num_qubits: u32, num_solutions: usize) -> usize {
    let space = 2f64.powi(num_qubits as i32);
    let m = num_solutions as f64;
    if num_solutions == 0 || m > space {
        return 0;
    }
    let theta = (m / space).sqrt().asin();
    (PI / (4.0 * theta)).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_iterations() {
        assert_eq!(optimal_iterations(4, 1), 3);
        assert_eq!(optimal_iterations(2, 1), 1);
        assert_eq!(optimal_iterations(10, 1), 25);
        assert_eq!(optimal_iterations(3, 0), 0);
        assert_eq!(optimal_iterations(2, 5), 0);
    }

    #[test]
    fn test_oracle_x_sandwich() {
        // 0b1101: only qubit 1 is zero.
        let oracle = phase_oracle(4, &[0b1101]).unwrap();
        let names: Vec<_> = oracle.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["x", "h", "mcx", "h", "x"]);
        assert_eq!(oracle.instructions()[0].qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_oracle_rejects_out_of_range() {
        assert!(matches!(
            phase_oracle(3, &[8]),
            Err(SynthError::MarkedStateOutOfRange { state: 8, num_qubits: 3 })
        ));
    }

    #[test]
    fn test_grover_circuit_layout() {
        let oracle = phase_oracle(3, &[5]).unwrap();
        let circuit = grover_circuit(&oracle, 2, GroverOptions::default()).unwrap();
        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(circuit.measurements().len(), 3);
        assert_eq!(circuit.gate_counts()["mcx"], 4);

        let bare = grover_circuit(&oracle, 2, GroverOptions {
            insert_barriers: false,
        })
        .unwrap();
        assert!(!bare.gate_counts().contains_key("barrier"));
    }
}
