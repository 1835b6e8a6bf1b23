//! Deutsch's algorithm.
//!
//! Decides with one oracle query whether `f: {0,1} → {0,1}` is constant or
//! balanced. Qubit 0 is the query qubit, qubit 1 the answer qubit.

use std::fmt;

use ketra_ir::{Circuit, ClbitId, Observable, ObservableTerm, QubitId};

use crate::error::DemoResult;

/// The two oracle families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oracle {
    /// `f(x) = 0`: the identity.
    Constant,
    /// `f(x) = x`: CX from query to answer.
    Balanced,
}

impl Oracle {
    /// Both oracles, in display order.
    pub const ALL: [Oracle; 2] = [Oracle::Constant, Oracle::Balanced];

    /// Outcome on the query qubit that identifies this oracle.
    pub fn expected_outcome(self) -> &'static str {
        match self {
            Oracle::Constant => "0",
            Oracle::Balanced => "1",
        }
    }
}

impl fmt::Display for Oracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Oracle::Constant => write!(f, "constant"),
            Oracle::Balanced => write!(f, "balanced"),
        }
    }
}

/// Two-qubit oracle sub-circuit.
pub fn oracle_circuit(oracle: Oracle) -> DemoResult<Circuit> {
    let mut circuit = Circuit::with_size(format!("{oracle}_oracle"), 2, 0);
    if oracle == Oracle::Balanced {
        circuit.cx(QubitId(0), QubitId(1))?;
    }
    Ok(circuit)
}

/// Prepare, query and interfere, without measurement.
pub fn deutsch_probe(oracle: Oracle) -> DemoResult<Circuit> {
    let mut circuit = Circuit::with_size(format!("deutsch_{oracle}"), 2, 1);
    circuit
        .x(QubitId(1))?
        .h(QubitId(0))?
        .h(QubitId(1))?
        .append_circuit(&oracle_circuit(oracle)?, &[QubitId(0), QubitId(1)])?
        .h(QubitId(0))?;
    Ok(circuit)
}

/// The full algorithm: the probe with the query qubit measured into clbit 0.
pub fn deutsch_circuit(oracle: Oracle) -> DemoResult<Circuit> {
    let mut circuit = deutsch_probe(oracle)?;
    circuit.measure(QubitId(0), ClbitId(0))?;
    Ok(circuit)
}

/// `Z` on the query qubit: +1 for a constant oracle, −1 for a balanced one.
pub fn query_observable() -> Observable {
    std::iter::once(ObservableTerm::z(0, 1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_shapes() {
        assert!(oracle_circuit(Oracle::Constant).unwrap().is_empty());
        assert_eq!(oracle_circuit(Oracle::Balanced).unwrap().len(), 1);
    }

    #[test]
    fn test_circuit_layout() {
        let circuit = deutsch_circuit(Oracle::Balanced).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 1);
        assert_eq!(circuit.measurements().len(), 1);
        // X, H, H, CX, H
        assert_eq!(circuit.len(), 5);
    }
}
