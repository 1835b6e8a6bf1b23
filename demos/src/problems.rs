//! Observables used by the demos.

use ketra_ir::{IrResult, Observable, ObservableTerm};

/// Two-qubit Pauli probes reported on a Bell pair.
pub const BELL_PROBES: [&str; 6] = ["IZ", "IX", "ZI", "XI", "ZZ", "XX"];

/// Nearest-neighbour chain `J · Σ_i Z_i Z_{i+1}` on `num_qubits` qubits.
pub fn zz_chain(num_qubits: u32, coupling: f64) -> Observable {
    let terms = (1..num_qubits)
        .map(|i| ObservableTerm::zz(i - 1, i, coupling))
        .collect();
    Observable::from_terms(terms)
}

/// Ground energy of [`zz_chain`]: every bond anti-aligned (or aligned for
/// negative `J`), giving `−|J|·(n − 1)`.
pub fn zz_chain_ground_energy(num_qubits: u32, coupling: f64) -> f64 {
    -coupling.abs() * f64::from(num_qubits.saturating_sub(1))
}

/// Parse the Bell probes into observables, in order.
pub fn bell_probes() -> IrResult<Vec<Observable>> {
    BELL_PROBES.iter().map(|l| Observable::from_label(l)).collect()
}
