//! Simon's algorithm.
//!
//! The oracle computes `f(x) = x ⊕ (x_k · s)` where `k` is the lowest set
//! bit of the secret `s`, so `f(x) = f(x ⊕ s)` and `f` is two-to-one. Each
//! shot yields a `y` with `y · s = 0 (mod 2)`; `n − 1` independent `y`s pin
//! down `s`.

use std::fmt;
use std::str::FromStr;

use ketra_hal::Counts;
use ketra_ir::{Circuit, ClbitId, QubitId, qubit_range};

use crate::error::{DemoError, DemoResult};

/// Hidden XOR mask, bit `i` acting on input qubit `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secret {
    value: usize,
    width: u32,
}

impl Secret {
    /// Secret of `width` bits.
    pub fn new(value: usize, width: u32) -> DemoResult<Self> {
        if width == 0 || width >= usize::BITS || value >> width != 0 {
            return Err(DemoError::InvalidSecret(format!("{value:b}")));
        }
        Ok(Self { value, width })
    }

    /// Mask value.
    pub fn value(&self) -> usize {
        self.value
    }

    /// Number of input qubits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Whether input qubit `i` is set in the mask.
    pub fn bit(&self, i: u32) -> bool {
        (self.value >> i) & 1 == 1
    }
}

impl FromStr for Secret {
    type Err = DemoError;

    /// Parses a bit-string with qubit 0 as the rightmost character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty()
            || s.len() >= usize::BITS as usize
            || !s.bytes().all(|b| b == b'0' || b == b'1')
        {
            return Err(DemoError::InvalidSecret(s.to_string()));
        }
        let value = usize::from_str_radix(s, 2).map_err(|_| DemoError::InvalidSecret(s.into()))?;
        Ok(Self {
            value,
            width: s.len() as u32,
        })
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.value, width = self.width as usize)
    }
}

/// Oracle on `2n` qubits: inputs `0..n`, outputs `n..2n`.
pub fn simon_oracle(secret: Secret) -> DemoResult<Circuit> {
    let n = secret.width;
    let mut oracle = Circuit::with_size(format!("simon_oracle_{secret}"), 2 * n, 0);
    for i in 0..n {
        oracle.cx(QubitId(i), QubitId(i + n))?;
    }
    if secret.value != 0 {
        let k = secret.value.trailing_zeros();
        for i in (0..n).filter(|&i| secret.bit(i)) {
            oracle.cx(QubitId(k), QubitId(i + n))?;
        }
    }
    Ok(oracle)
}

/// Full circuit: H on the inputs, oracle, H on the inputs, then input
/// qubit `i` measured into clbit `i`.
pub fn simon_circuit(secret: Secret) -> DemoResult<Circuit> {
    let n = secret.width;
    let mut circuit = Circuit::with_size(format!("simon_{secret}"), 2 * n, n);
    let inputs = qubit_range(0, n);

    for &q in &inputs {
        circuit.h(q)?;
    }
    circuit.barrier_all()?;
    circuit.append_circuit(&simon_oracle(secret)?, &qubit_range(0, 2 * n))?;
    circuit.barrier_all()?;
    for &q in &inputs {
        circuit.h(q)?;
    }
    for i in 0..n {
        circuit.measure(QubitId(i), ClbitId(i))?;
    }
    Ok(circuit)
}

/// `y · s mod 2`.
pub fn dot(y: usize, s: usize) -> u32 {
    (y & s).count_ones() % 2
}

/// Measured register values in `counts`, skipping unparsable keys.
pub fn observed_values(counts: &Counts) -> Vec<usize> {
    counts
        .iter()
        .filter_map(|(bits, _)| usize::from_str_radix(bits, 2).ok())
        .collect()
}

/// Recover the secret from measured `y` values.
///
/// Row-reduces the `y`s over GF(2). Returns `None` unless they span exactly
/// `width − 1` dimensions, in which case the null space holds one non-zero
/// vector.
pub fn solve_secret(ys: &[usize], width: u32) -> Option<usize> {
    if width == 0 || width >= usize::BITS {
        return None;
    }
    let full = (1usize << width) - 1;

    // Fully reduced rows with their pivot columns.
    let mut rows: Vec<(usize, u32)> = Vec::new();
    for &y in ys {
        let mut v = y & full;
        for &(row, pivot) in &rows {
            if (v >> pivot) & 1 == 1 {
                v ^= row;
            }
        }
        if v == 0 {
            continue;
        }
        let pivot = v.trailing_zeros();
        for (row, _) in rows.iter_mut() {
            if (*row >> pivot) & 1 == 1 {
                *row ^= v;
            }
        }
        rows.push((v, pivot));
    }

    if rows.len() + 1 != width as usize {
        return None;
    }
    let free = (0..width).find(|&c| rows.iter().all(|&(_, p)| p != c))?;
    let mut s = 1usize << free;
    for &(row, pivot) in &rows {
        if (row >> free) & 1 == 1 {
            s |= 1 << pivot;
        }
    }
    Some(s)
}
