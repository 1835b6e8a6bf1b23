//! High-level circuit builder API.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{CustomBlock, StandardGate};
use crate::instruction::{Instruction, MeasurementBinding};
use crate::matrix::Unitary2x2;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit over a fixed register.
///
/// Every instruction is validated against the register when appended, so a
/// `Circuit` value never references a qubit outside `[0, num_qubits)`.
/// Composition copies: appending one circuit to another never aliases it.
/// Deserialization replays the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Register width.
    num_qubits: u32,
    /// Classical register width.
    num_clbits: u32,
    /// Operations in application order.
    instructions: Vec<Instruction>,
    /// Qubit-to-clbit measurement bindings, in binding order.
    measurements: Vec<MeasurementBinding>,
}

#[derive(Deserialize)]
struct RawCircuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
    measurements: Vec<MeasurementBinding>,
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = IrError;

    fn try_from(raw: RawCircuit) -> IrResult<Self> {
        let mut circuit = Self::with_size(raw.name, raw.num_qubits, raw.num_clbits);
        circuit.extend(raw.instructions)?;
        for binding in raw.measurements {
            circuit.measure(binding.qubit, binding.clbit)?;
        }
        Ok(circuit)
    }
}

impl Circuit {
    /// Create a new empty circuit with no qubits.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, 0, 0)
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
            measurements: vec![],
        }
    }

    /// Append an instruction after validating its operands.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        instruction.validate(self.num_qubits)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Append every instruction from an iterator, stopping at the first error.
    pub fn extend(
        &mut self,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<&mut Self> {
        for inst in instructions {
            self.append(inst)?;
        }
        Ok(self)
    }

    /// Splice a remapped copy of `sub`'s operations onto `mapping`.
    ///
    /// `mapping[i]` is the register qubit that plays sub-circuit qubit `i`.
    /// The mapping must have exactly `sub.num_qubits()` entries, all in range
    /// and pairwise distinct. Measurement bindings of `sub` are not spliced.
    pub fn append_circuit(&mut self, sub: &Circuit, mapping: &[QubitId]) -> IrResult<&mut Self> {
        if mapping.len() != sub.num_qubits as usize {
            return Err(IrError::MappingArityMismatch {
                expected: sub.num_qubits,
                got: mapping.len() as u32,
            });
        }
        for (i, &q) in mapping.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::InvalidQubitIndex {
                    qubit: q,
                    num_qubits: self.num_qubits,
                    gate_name: Some(sub.name.clone()),
                });
            }
            if mapping[..i].contains(&q) {
                return Err(IrError::NonInjectiveMapping { qubit: q });
            }
        }
        self.instructions
            .extend(sub.instructions.iter().map(|inst| inst.remap(mapping)));
        Ok(self)
    }

    /// Append `sub` onto the first `sub.num_qubits()` qubits.
    pub fn compose(&mut self, sub: &Circuit) -> IrResult<&mut Self> {
        let mapping: Vec<QubitId> = (0..sub.num_qubits).map(QubitId).collect();
        self.append_circuit(sub, &mapping)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single_qubit_gate(gate, qubit))
    }

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::I, qubit)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Tdg, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SX, qubit)
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SXdg, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::P(lambda), qubit)
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::U(theta, phi, lambda), qubit)
    }

    /// Apply an arbitrary single-qubit unitary.
    pub fn unitary(&mut self, matrix: Unitary2x2, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::unitary(matrix, qubit))
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply controlled phase gate.
    pub fn cp(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(
            StandardGate::CP(lambda),
            control,
            target,
        ))
    }

    /// Apply a controlled single-qubit unitary, global phase included.
    pub fn cu(
        &mut self,
        matrix: &Unitary2x2,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        let (theta, phi, lambda, gamma) = matrix.u_params();
        self.append(Instruction::two_qubit_gate(
            StandardGate::CU(theta, phi, lambda, gamma),
            control,
            target,
        ))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit_gate(StandardGate::Swap, q1, q2))
    }

    // =========================================================================
    // Multi-qubit operations
    // =========================================================================

    /// Apply multi-controlled X.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::mcx(controls, target))
    }

    /// Apply multi-controlled Z over `qubits` (symmetric in its operands).
    pub fn mcz(&mut self, qubits: &[QubitId]) -> IrResult<&mut Self> {
        let Some((&target, controls)) = qubits.split_last() else {
            return Err(IrError::QubitCountMismatch {
                gate_name: "mcz".into(),
                expected: 1,
                got: 0,
            });
        };
        if controls.is_empty() {
            return self.z(target);
        }
        let mcx = Instruction::mcx(controls, target);
        mcx.validate(self.num_qubits)?;
        self.h(target)?.append(mcx)?.h(target)
    }

    /// Apply a custom block.
    pub fn block(
        &mut self,
        block: CustomBlock,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::block(block, qubits))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits).map(QubitId).collect();
        self.barrier(qubits)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Bind the outcome of `qubit` to `clbit`.
    ///
    /// Measurements are terminal: they are sampled after all operations.
    /// A later binding to the same classical bit overwrites the earlier one.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::InvalidQubitIndex {
                qubit,
                num_qubits: self.num_qubits,
                gate_name: Some("measure".into()),
            });
        }
        if clbit.0 >= self.num_clbits {
            return Err(IrError::InvalidClbitIndex {
                clbit,
                num_clbits: self.num_clbits,
            });
        }
        self.measurements.push(MeasurementBinding::new(qubit, clbit));
        Ok(self)
    }

    /// Measure all qubits to corresponding classical bits.
    ///
    /// Grows the classical register to at least `num_qubits` bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        for i in 0..self.num_qubits {
            self.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.num_clbits
    }

    /// Operations in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Measurement bindings in binding order.
    pub fn measurements(&self) -> &[MeasurementBinding] {
        &self.measurements
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Qubits touched by no operation.
    pub fn idle_qubits(&self) -> Vec<QubitId> {
        let mut used = vec![false; self.num_qubits as usize];
        for inst in &self.instructions {
            for q in &inst.qubits {
                used[q.index()] = true;
            }
        }
        (0..self.num_qubits)
            .filter(|&i| !used[i as usize])
            .map(QubitId)
            .collect()
    }

    /// Get the circuit depth.
    ///
    /// Barriers align their qubits without adding a layer.
    pub fn depth(&self) -> usize {
        let mut level = vec![0usize; self.num_qubits as usize];
        let mut depth = 0;
        for inst in &self.instructions {
            let start = inst
                .qubits
                .iter()
                .map(|q| level[q.index()])
                .max()
                .unwrap_or(0);
            let end = if inst.is_barrier() { start } else { start + 1 };
            for q in &inst.qubits {
                level[q.index()] = end;
            }
            depth = depth.max(end);
        }
        depth
    }

    /// Operation counts keyed by instruction name.
    pub fn gate_counts(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// The inverse circuit: reversed order, every operation inverted.
    ///
    /// Measurement bindings are not carried over.
    pub fn inverse(&self) -> Self {
        Self {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions: self.instructions.iter().rev().map(Instruction::inverse).collect(),
            measurements: vec![],
        }
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);

        circuit
            .h(q0)?
            .cx(q0, q1)?
            .measure(q0, ClbitId(0))?
            .measure(q1, ClbitId(1))?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, n);
        if n == 0 {
            return Ok(circuit);
        }

        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;

        Ok(circuit)
    }
}
