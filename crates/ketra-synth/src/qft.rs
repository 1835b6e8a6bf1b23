//! Quantum Fourier transform templates.
//!
//! `qft(w)` maps `|x⟩` to `2^{-w/2} Σ_y e^{2πi·xy/2^w} |y⟩` over a
//! little-endian register. It is built from the most significant qubit down:
//! H on qubit `j`, then `CP(π/2^{j-k})` controlled by each lower qubit `k`,
//! followed by a SWAP network reversing the qubit order. The inverse is the
//! op-reversed circuit with negated angles.

use std::f64::consts::PI;

use ketra_ir::{Circuit, QubitId, qubit_range};
use serde::{Deserialize, Serialize};

use crate::error::SynthResult;

/// QFT construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QftOptions {
    /// Emit the final bit-reversal SWAPs. Without them the output register
    /// is read in reversed qubit order.
    pub do_swaps: bool,
}

impl Default for QftOptions {
    fn default() -> Self {
        Self { do_swaps: true }
    }
}

/// QFT over `width` qubits.
pub fn qft(width: u32) -> SynthResult<Circuit> {
    qft_with(width, QftOptions::default())
}

/// Inverse QFT over `width` qubits.
pub fn inverse_qft(width: u32) -> SynthResult<Circuit> {
    inverse_qft_with(width, QftOptions::default())
}

/// QFT over `width` qubits with explicit options.
pub fn qft_with(width: u32, options: QftOptions) -> SynthResult<Circuit> {
    let mut circuit = Circuit::with_size("qft", width, 0);
    for j in (0..width).rev() {
        circuit.h(QubitId(j))?;
        for k in (0..j).rev() {
            let angle = PI * 0.5f64.powi(i32::try_from(j - k).unwrap_or(i32::MAX));
            circuit.cp(angle, QubitId(k), QubitId(j))?;
        }
    }
    if options.do_swaps {
        for i in 0..width / 2 {
            circuit.swap(QubitId(i), QubitId(width - 1 - i))?;
        }
    }
    Ok(circuit)
}

/// Inverse QFT over `width` qubits with explicit options.
pub fn inverse_qft_with(width: u32, options: QftOptions) -> SynthResult<Circuit> {
    let forward = qft_with(width, options)?;
    let mut circuit = Circuit::with_size("iqft", width, 0);
    circuit.extend(forward.inverse().instructions().iter().cloned())?;
    Ok(circuit)
}

/// Append a QFT over the contiguous range `start..start + width`.
pub fn append_qft(circuit: &mut Circuit, start: u32, width: u32) -> SynthResult<()> {
    circuit.append_circuit(&qft(width)?, &qubit_range(start, width))?;
    Ok(())
}

/// Append an inverse QFT over the contiguous range `start..start + width`.
pub fn append_inverse_qft(circuit: &mut Circuit, start: u32, width: u32) -> SynthResult<()> {
    circuit.append_circuit(&inverse_qft(width)?, &qubit_range(start, width))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketra_ir::{InstructionKind, StandardGate};

    #[test]
    fn test_qft_gate_counts() {
        let c = qft(4).unwrap();
        let counts = c.gate_counts();
        assert_eq!(counts["h"], 4);
        assert_eq!(counts["cp"], 6);
        assert_eq!(counts["swap"], 2);

        let no_swaps = qft_with(4, QftOptions { do_swaps: false }).unwrap();
        assert!(!no_swaps.gate_counts().contains_key("swap"));
    }

    #[test]
    fn test_qft_starts_at_msb() {
        let c = qft(3).unwrap();
        assert_eq!(c.instructions()[0].qubits, vec![QubitId(2)]);
        assert_eq!(
            c.instructions()[1].kind,
            InstructionKind::Gate(StandardGate::CP(PI / 2.0))
        );
        assert_eq!(c.instructions()[1].qubits, vec![QubitId(1), QubitId(2)]);
    }

    #[test]
    fn test_inverse_negates_angles() {
        let c = inverse_qft(3).unwrap();
        assert_eq!(c.name(), "iqft");
        for inst in c.instructions() {
            if let InstructionKind::Gate(StandardGate::CP(angle)) = inst.kind {
                assert!(angle < 0.0);
            }
        }
        assert_eq!(c.instructions().last().map(|i| i.name()), Some("h"));
    }

    #[test]
    fn test_append_out_of_range() {
        let mut circuit = Circuit::with_size("main", 4, 0);
        assert!(append_qft(&mut circuit, 2, 3).is_err());
        append_inverse_qft(&mut circuit, 1, 3).unwrap();
        assert_eq!(circuit.len(), inverse_qft(3).unwrap().len());
    }

    #[test]
    fn test_wide_register_angles() {
        let c = qft(40).unwrap();
        let smallest = c
            .instructions()
            .iter()
            .filter_map(|inst| match inst.kind {
                InstructionKind::Gate(StandardGate::CP(angle)) => Some((angle, inst.qubits.clone())),
                _ => None,
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .unwrap();
        assert_eq!(smallest.1, vec![QubitId(0), QubitId(39)]);
        assert!((smallest.0 - PI / 2f64.powi(39)).abs() < 1e-25);
        assert!(smallest.0 > 0.0);
    }

    #[test]
    fn test_zero_width() {
        assert!(qft(0).unwrap().is_empty());
    }
}
