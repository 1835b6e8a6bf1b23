//! Expectation values of Pauli observables.
//!
//! A Pauli string `P` with X-support `x` (X and Y qubits), Z-support `z`
//! (Z and Y qubits) and `m` Y factors acts on a basis state as
//! `P|i⟩ = i^m · (−1)^{|i ∧ z|} · |i ⊕ x⟩`, so
//! `⟨ψ|P|ψ⟩ = Re Σ_i conj(ψ[i ⊕ x]) · i^m · (−1)^{|i ∧ z|} · ψ[i]`.

use num_complex::Complex64;
use rayon::prelude::*;

use ketra_hal::Estimate;
use ketra_ir::{Observable, PauliOp, PauliString};

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Register width from which the expectation sum runs on the rayon pool.
const PARALLEL_SUM_QUBITS: u32 = 16;

/// Exact `⟨ψ|P|ψ⟩` for one Pauli string.
///
/// Operators on qubits beyond the register are rejected.
pub fn pauli_expectation(statevector: &Statevector, pauli: &PauliString) -> SimResult<f64> {
    let num_qubits = statevector.num_qubits();
    if let Some(max) = pauli.max_qubit() {
        if max >= num_qubits {
            return Err(SimError::ObservableOutOfRange {
                required: max + 1,
                num_qubits,
            });
        }
    }

    let mut x_mask = 0usize;
    let mut z_mask = 0usize;
    let mut num_y = 0u32;
    for &(q, op) in pauli.ops() {
        let bit = 1usize << q;
        match op {
            PauliOp::I => {}
            PauliOp::X => x_mask |= bit,
            PauliOp::Z => z_mask |= bit,
            PauliOp::Y => {
                x_mask |= bit;
                z_mask |= bit;
                num_y += 1;
            }
        }
    }
    let phase = match num_y % 4 {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    };

    let amps = statevector.amplitudes();
    let term = |i: usize| -> Complex64 {
        let signed = if (i & z_mask).count_ones() % 2 == 1 {
            -amps[i]
        } else {
            amps[i]
        };
        amps[i ^ x_mask].conj() * signed
    };
    let sum: Complex64 = if num_qubits >= PARALLEL_SUM_QUBITS {
        (0..amps.len()).into_par_iter().map(term).sum()
    } else {
        (0..amps.len()).map(term).sum()
    };
    Ok((phase * sum).re)
}

/// Estimate `⟨ψ|O|ψ⟩` for a weighted sum of Pauli strings.
///
/// The value is always exact. With `shots == 0` the standard error is 0;
/// otherwise it is the shot-noise estimate
/// `sqrt(Σ_k c_k² (1 − ⟨P_k⟩²) / shots)`.
pub fn estimate(
    statevector: &Statevector,
    observable: &Observable,
    shots: u32,
) -> SimResult<Estimate> {
    let mut value = 0.0;
    let mut variance = 0.0;
    for term in observable.terms() {
        let expectation = pauli_expectation(statevector, &term.pauli)?;
        value += term.coeff * expectation;
        variance += term.coeff * term.coeff * (1.0 - expectation * expectation).max(0.0);
    }
    let std_error = if shots == 0 {
        0.0
    } else {
        (variance / f64::from(shots)).sqrt()
    };
    Ok(Estimate::new(value, std_error))
}
