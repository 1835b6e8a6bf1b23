//! Pauli observables.
//!
//! An observable is a real-weighted sum of Pauli strings:
//!
//!   O = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators
//! (I, X, Y, Z).
//!
//! # Example
//!
//! ```rust
//! use ketra_ir::observable::{Observable, ObservableTerm, PauliString};
//!
//! // O = ZZ + 0.5·XI   (rightmost label character is qubit 0)
//! let o = Observable::from_terms(vec![
//!     ObservableTerm::new(1.0, PauliString::from_label("ZZ").unwrap()),
//!     ObservableTerm::new(0.5, PauliString::from_label("XI").unwrap()),
//! ]);
//! assert_eq!(o.n_terms(), 2);
//! assert_eq!(o.min_qubits(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }
}

/// A tensor product of Pauli operators on indexed qubits.
///
/// Stored as a sorted `Vec<(qubit_index, PauliOp)>` with Identity terms
/// omitted.  Qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PauliString {
    /// Non-identity terms, sorted by qubit index ascending.
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Construct a PauliString from an iterator of (qubit, op) pairs.
    ///
    /// Identity operators are dropped; the remaining ops are sorted by qubit.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        Self { ops: v }
    }

    /// Parse a dense label such as `"IZ"`.
    ///
    /// The rightmost character acts on qubit 0, matching the MSB-first
    /// bit-string convention used for counts.
    pub fn from_label(label: &str) -> IrResult<Self> {
        let chars: Vec<char> = label.chars().collect();
        let n = chars.len();
        let mut ops = Vec::with_capacity(n);
        for (pos, c) in chars.into_iter().enumerate() {
            let op = PauliOp::from_char(c).ok_or_else(|| IrError::InvalidPauliLabel(label.into()))?;
            ops.push(((n - 1 - pos) as u32, op));
        }
        Ok(Self::from_ops(ops))
    }

    /// Construct a Z⊗Z⊗...⊗Z string spanning the given qubits.
    pub fn zz(qubits: impl IntoIterator<Item = u32>) -> Self {
        Self::from_ops(qubits.into_iter().map(|q| (q, PauliOp::Z)))
    }

    /// Return the non-identity (qubit, op) pairs, sorted by qubit index.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// The highest qubit index referenced, or `None` for an identity string.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }

    /// Dense label over `num_qubits` qubits, qubit 0 rightmost.
    pub fn to_label(&self, num_qubits: u32) -> String {
        (0..num_qubits)
            .rev()
            .map(|q| {
                self.ops
                    .iter()
                    .find(|(i, _)| *i == q)
                    .map_or('I', |(_, op)| op.as_char())
            })
            .collect()
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_qubit().map_or(1, |q| q + 1);
        f.write_str(&self.to_label(width))
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl ObservableTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Shorthand: single-qubit Z term.
    pub fn z(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    /// Shorthand: ZZ coupling term.
    pub fn zz(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::zz([q0, q1]))
    }

    /// Shorthand: single-qubit X term.
    pub fn x(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }
}

/// A sum-of-Pauli-strings observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observable {
    terms: Vec<ObservableTerm>,
}

impl Observable {
    /// Create from a list of terms.
    pub fn from_terms(terms: Vec<ObservableTerm>) -> Self {
        Self { terms }
    }

    /// A single unit-weight Pauli string.
    pub fn pauli(pauli: PauliString) -> Self {
        Self::from_terms(vec![ObservableTerm::new(1.0, pauli)])
    }

    /// A single unit-weight Pauli string parsed from a label.
    pub fn from_label(label: &str) -> IrResult<Self> {
        Ok(Self::pauli(PauliString::from_label(label)?))
    }

    /// All terms.
    pub fn terms(&self) -> &[ObservableTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// The minimum number of qubits required to represent this observable.
    ///
    /// Returns 0 if the observable is empty or purely identity.
    pub fn min_qubits(&self) -> u32 {
        self.terms
            .iter()
            .filter_map(|t| t.pauli.max_qubit())
            .max()
            .map_or(0, |q| q + 1)
    }
}

impl FromIterator<ObservableTerm> for Observable {
    fn from_iter<T: IntoIterator<Item = ObservableTerm>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}
