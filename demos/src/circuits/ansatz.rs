//! Hardware-efficient ansatz.
//!
//! `reps` entangling blocks between `reps + 1` rotation layers. Each
//! rotation layer applies Ry then Rz to every qubit; each entangling block
//! is a linear CX chain `(0,1), (1,2), …`.

use ketra_ir::{Circuit, QubitId};

use crate::error::{DemoError, DemoResult};

/// Parameters consumed by a `num_qubits`-wide ansatz with `reps` blocks.
pub fn num_parameters(num_qubits: u32, reps: usize) -> usize {
    2 * num_qubits as usize * (reps + 1)
}

/// Build the bound ansatz circuit.
///
/// Parameters are consumed layer by layer: all Ry angles of a layer, then
/// all Rz angles.
pub fn hardware_efficient(num_qubits: u32, reps: usize, params: &[f64]) -> DemoResult<Circuit> {
    let expected = num_parameters(num_qubits, reps);
    if params.len() != expected {
        return Err(DemoError::ParameterCount {
            expected,
            got: params.len(),
        });
    }

    let mut circuit = Circuit::with_size("hardware_efficient", num_qubits, 0);
    let mut angles = params.iter().copied();
    for layer in 0..=reps {
        for q in 0..num_qubits {
            circuit.ry(angles.next().unwrap_or_default(), QubitId(q))?;
        }
        for q in 0..num_qubits {
            circuit.rz(angles.next().unwrap_or_default(), QubitId(q))?;
        }
        if layer < reps {
            for q in 1..num_qubits {
                circuit.cx(QubitId(q - 1), QubitId(q))?;
            }
        }
    }
    Ok(circuit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_count() {
        assert_eq!(num_parameters(4, 1), 16);
        assert_eq!(num_parameters(2, 0), 4);
    }

    #[test]
    fn test_gate_counts() {
        let params = vec![0.1; num_parameters(3, 2)];
        let circuit = hardware_efficient(3, 2, &params).unwrap();
        let counts = circuit.gate_counts();
        assert_eq!(counts.get("ry"), Some(&9));
        assert_eq!(counts.get("rz"), Some(&9));
        assert_eq!(counts.get("cx"), Some(&4));
    }

    #[test]
    fn test_wrong_parameter_count() {
        assert!(matches!(
            hardware_efficient(2, 1, &[0.0; 3]),
            Err(DemoError::ParameterCount {
                expected: 8,
                got: 3
            })
        ));
    }
}
