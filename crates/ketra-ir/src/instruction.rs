//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{CustomBlock, StandardGate};
use crate::matrix::Unitary2x2;
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A named library gate.
    Gate(StandardGate),
    /// An arbitrary single-qubit unitary.
    Unitary(Unitary2x2),
    /// Multi-controlled X; operands are `controls ++ [target]`.
    Mcx,
    /// A custom block over its operand tuple.
    Block(CustomBlock),
    /// Barrier (structural no-op).
    Barrier,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create an arbitrary single-qubit unitary instruction.
    pub fn unitary(matrix: Unitary2x2, qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Unitary(matrix),
            qubits: vec![qubit],
        }
    }

    /// Create a multi-controlled X instruction.
    pub fn mcx(controls: &[QubitId], target: QubitId) -> Self {
        let mut qubits = controls.to_vec();
        qubits.push(target);
        Self {
            kind: InstructionKind::Mcx,
            qubits,
        }
    }

    /// Create a block instruction.
    pub fn block(block: CustomBlock, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Block(block),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Get the name of this instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Unitary(_) => "unitary",
            InstructionKind::Mcx => "mcx",
            InstructionKind::Block(b) => &b.name,
            InstructionKind::Barrier => "barrier",
        }
    }

    /// Number of operand qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Control operands, if the instruction is a controlled gate.
    pub fn controls(&self) -> &[QubitId] {
        match &self.kind {
            InstructionKind::Gate(g) => &self.qubits[..g.num_controls().min(self.qubits.len())],
            InstructionKind::Mcx => &self.qubits[..self.qubits.len().saturating_sub(1)],
            _ => &[],
        }
    }

    /// Non-control operands.
    pub fn targets(&self) -> &[QubitId] {
        &self.qubits[self.controls().len()..]
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Check if this instruction needs no further expansion.
    ///
    /// Opaque blocks count as primitive: the engine applies them densely.
    pub fn is_primitive(&self) -> bool {
        match &self.kind {
            InstructionKind::Gate(_) | InstructionKind::Unitary(_) | InstructionKind::Barrier => {
                true
            }
            InstructionKind::Mcx => false,
            InstructionKind::Block(b) => b.is_opaque(),
        }
    }

    /// Check the operand list against a register of `num_qubits` qubits.
    ///
    /// Rejects out-of-range indices, repeated qubits and arity mismatches.
    pub fn validate(&self, num_qubits: u32) -> IrResult<()> {
        let gate_name = || Some(self.name().to_string());
        for (i, &q) in self.qubits.iter().enumerate() {
            if q.0 >= num_qubits {
                return Err(IrError::InvalidQubitIndex {
                    qubit: q,
                    num_qubits,
                    gate_name: gate_name(),
                });
            }
            if self.qubits[..i].contains(&q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    gate_name: gate_name(),
                });
            }
        }

        let expected = match &self.kind {
            InstructionKind::Gate(g) => Some(g.num_qubits()),
            InstructionKind::Unitary(_) => Some(1),
            InstructionKind::Block(b) => Some(b.num_qubits),
            InstructionKind::Mcx | InstructionKind::Barrier => None,
        };
        let got = self.qubits.len() as u32;
        if let Some(expected) = expected {
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: self.name().to_string(),
                    expected,
                    got,
                });
            }
        }
        if let InstructionKind::Block(block) = &self.kind {
            block.validate()?;
        }
        if matches!(self.kind, InstructionKind::Mcx) && got == 0 {
            return Err(IrError::QubitCountMismatch {
                gate_name: "mcx".into(),
                expected: 1,
                got,
            });
        }
        Ok(())
    }

    /// Rewrite operands through `mapping` (local index to register qubit).
    ///
    /// The caller guarantees every operand is a valid index into `mapping`.
    pub fn remap(&self, mapping: &[QubitId]) -> Self {
        Self {
            kind: self.kind.clone(),
            qubits: self.qubits.iter().map(|q| mapping[q.index()]).collect(),
        }
    }

    /// The inverse instruction on the same operands.
    pub fn inverse(&self) -> Self {
        let kind = match &self.kind {
            InstructionKind::Gate(g) => InstructionKind::Gate(g.inverse()),
            InstructionKind::Unitary(u) => InstructionKind::Unitary(u.adjoint()),
            InstructionKind::Block(b) => InstructionKind::Block(b.inverse()),
            InstructionKind::Mcx => InstructionKind::Mcx,
            InstructionKind::Barrier => InstructionKind::Barrier,
        };
        Self {
            kind,
            qubits: self.qubits.clone(),
        }
    }
}

/// Binds a qubit's measurement outcome to a classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasurementBinding {
    /// Measured qubit.
    pub qubit: QubitId,
    /// Destination classical bit.
    pub clbit: ClbitId,
}

impl MeasurementBinding {
    /// Create a binding.
    pub fn new(qubit: QubitId, clbit: ClbitId) -> Self {
        Self { qubit, clbit }
    }
}
