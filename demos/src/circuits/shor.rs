//! Period finding for N = 15.
//!
//! Multiplication by any unit `m` of Z/15 on a 4-bit register is a bit
//! rotation, optionally followed by a full bit flip (`15 − x` is the
//! complement of `x`). Those networks are wrapped as decomposed blocks and
//! controlled on each counting qubit.

use tracing::debug;

use ketra_ir::{Circuit, ClbitId, CustomBlock, QubitId, qubit_range};
use ketra_synth::{append_inverse_qft, controlled_block};

use crate::error::{DemoError, DemoResult};

/// The number being factored.
pub const MODULUS: u64 = 15;

/// Width of the counting register.
pub const COUNTING_QUBITS: u32 = 8;

/// Width of the work register.
pub const WORK_QUBITS: u32 = 4;

/// Bases with a multiplier network.
pub const SUPPORTED_BASES: [u64; 6] = [2, 4, 7, 8, 11, 13];

/// Greatest common divisor.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `base^exp mod modulus` by square-and-multiply.
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result = 1;
    let mut base = base % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % modulus;
        }
        base = base * base % modulus;
        exp >>= 1;
    }
    result
}

/// 4-qubit block computing `|x⟩ → |m·x mod 15⟩` for `x` in `1..15`.
pub fn multiplier_block(m: u64) -> DemoResult<CustomBlock> {
    let mut body = Circuit::with_size(format!("mul{m}_mod15"), WORK_QUBITS, 0);
    let q = QubitId;
    match m % MODULUS {
        1 => {}
        2 | 13 => {
            body.swap(q(2), q(3))?.swap(q(1), q(2))?.swap(q(0), q(1))?;
        }
        7 | 8 => {
            body.swap(q(0), q(1))?.swap(q(1), q(2))?.swap(q(2), q(3))?;
        }
        4 | 11 => {
            body.swap(q(1), q(3))?.swap(q(0), q(2))?;
        }
        _ => return Err(DemoError::UnsupportedBase(m)),
    }
    if matches!(m % MODULUS, 7 | 11 | 13) {
        for i in 0..WORK_QUBITS {
            body.x(q(i))?;
        }
    }
    Ok(CustomBlock::from_circuit(body.name().to_string(), &body))
}

/// Multiplication by `a^power mod 15`, controlled on local qubit 0.
///
/// `None` when the multiplier is 1.
pub fn controlled_power(a: u64, power: u64) -> DemoResult<Option<CustomBlock>> {
    let m = mod_pow(a, power, MODULUS);
    if m == 1 {
        return Ok(None);
    }
    Ok(Some(controlled_block(&multiplier_block(m)?, 1)?))
}

/// Period-finding circuit for base `a`.
///
/// Counting qubits `0..8`, work qubits `8..12` starting in `|1⟩`. Counting
/// qubit `q` controls multiplication by `a^(2^q)`; the counting register is
/// then inverse-Fourier-transformed and measured into clbits `0..8`.
pub fn shor_circuit(a: u64) -> DemoResult<Circuit> {
    if !SUPPORTED_BASES.contains(&a) {
        return Err(DemoError::UnsupportedBase(a));
    }
    let total = COUNTING_QUBITS + WORK_QUBITS;
    let mut circuit = Circuit::with_size(format!("shor_{a}_mod15"), total, COUNTING_QUBITS);
    let work = qubit_range(COUNTING_QUBITS, WORK_QUBITS);

    for q in 0..COUNTING_QUBITS {
        circuit.h(QubitId(q))?;
    }
    circuit.x(work[0])?;

    for q in 0..COUNTING_QUBITS {
        if let Some(block) = controlled_power(a, 1 << q)? {
            let qubits = std::iter::once(QubitId(q)).chain(work.iter().copied());
            circuit.block(block, qubits)?;
        }
    }

    circuit.barrier_all()?;
    append_inverse_qft(&mut circuit, 0, COUNTING_QUBITS)?;
    for q in 0..COUNTING_QUBITS {
        circuit.measure(QubitId(q), ClbitId(q))?;
    }
    debug!(a, ops = circuit.len(), "built period-finding circuit");
    Ok(circuit)
}

/// Candidate periods from measured counting-register values.
///
/// Keeps `r = 2^n / measured` when it is an even integer. Sorted, without
/// duplicates. Registers of 64 or more counting qubits yield no candidates.
pub fn period_candidates(measured: impl IntoIterator<Item = u64>, counting_qubits: u32) -> Vec<u64> {
    let Some(space) = 1u64.checked_shl(counting_qubits) else {
        return Vec::new();
    };
    let mut periods: Vec<u64> = measured
        .into_iter()
        .filter(|&m| m != 0 && space % m == 0)
        .map(|m| space / m)
        .filter(|r| r % 2 == 0)
        .collect();
    periods.sort_unstable();
    periods.dedup();
    periods
}

/// Non-trivial factors `gcd(a^(r/2) ± 1, 15)` for period `r`.
pub fn factors_from_period(a: u64, r: u64) -> Option<(u64, u64)> {
    if r == 0 || r % 2 != 0 {
        return None;
    }
    let x = mod_pow(a, r / 2, MODULUS);
    let f1 = gcd(x + MODULUS - 1, MODULUS);
    let f2 = gcd(x + 1, MODULUS);
    let nontrivial = |f: u64| f != 1 && f != MODULUS;
    (nontrivial(f1) && nontrivial(f2)).then_some((f1, f2))
}

/// A successful factorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Factorization {
    /// Period that produced the factors.
    pub period: u64,
    /// The two factors.
    pub factors: (u64, u64),
}

/// First candidate period, in ascending order, that yields factors.
pub fn find_factors(a: u64, periods: &[u64]) -> Option<Factorization> {
    periods.iter().find_map(|&period| {
        factors_from_period(a, period).map(|factors| Factorization { period, factors })
    })
}
