//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::matrix::{GateMatrix, Unitary2x2, Unitary4x4, UnitaryMatrix};

/// Standard gates with known semantics.
///
/// Two-qubit controlled gates take `[control, target]` as operands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Controlled phase gate.
    CP(f64),
    /// Controlled `e^{iγ} U(θ, φ, λ)`; the phase γ becomes relative once controlled.
    CU(f64, f64, f64, f64),
    /// SWAP gate.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::CP(_) => "cp",
            StandardGate::CU(_, _, _, _) => "cu",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX
            | StandardGate::CZ
            | StandardGate::CP(_)
            | StandardGate::CU(_, _, _, _)
            | StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// Number of leading operands that act as controls.
    #[inline]
    pub fn num_controls(&self) -> usize {
        match self {
            StandardGate::CX
            | StandardGate::CZ
            | StandardGate::CP(_)
            | StandardGate::CU(_, _, _, _) => 1,
            _ => 0,
        }
    }

    /// Get parameters of this gate.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CP(p) => vec![p],
            StandardGate::U(a, b, c) => vec![a, b, c],
            StandardGate::CU(a, b, c, d) => vec![a, b, c, d],
            _ => vec![],
        }
    }

    /// The 2x2 matrix applied to the target, ignoring controls.
    ///
    /// `None` for SWAP, which has no single target.
    pub fn target_matrix(&self) -> Option<Unitary2x2> {
        let m = match *self {
            StandardGate::I => Unitary2x2::identity(),
            StandardGate::X | StandardGate::CX => Unitary2x2::x(),
            StandardGate::Y => Unitary2x2::y(),
            StandardGate::Z | StandardGate::CZ => Unitary2x2::z(),
            StandardGate::H => Unitary2x2::h(),
            StandardGate::S => Unitary2x2::s(),
            StandardGate::Sdg => Unitary2x2::sdg(),
            StandardGate::T => Unitary2x2::t(),
            StandardGate::Tdg => Unitary2x2::tdg(),
            StandardGate::SX => Unitary2x2::sx(),
            StandardGate::SXdg => Unitary2x2::sx().adjoint(),
            StandardGate::Rx(t) => Unitary2x2::rx(t),
            StandardGate::Ry(t) => Unitary2x2::ry(t),
            StandardGate::Rz(t) => Unitary2x2::rz(t),
            StandardGate::P(l) | StandardGate::CP(l) => Unitary2x2::p(l),
            StandardGate::U(t, p, l) => Unitary2x2::u(t, p, l),
            StandardGate::CU(t, p, l, g) => Unitary2x2::u_with_phase(t, p, l, g),
            StandardGate::Swap => return None,
        };
        Some(m)
    }

    /// Full matrix of the gate over its operands.
    pub fn matrix(&self) -> GateMatrix {
        match (self.num_controls(), self.target_matrix()) {
            (0, Some(u)) => GateMatrix::One(u),
            (_, Some(u)) => GateMatrix::Two(Unitary4x4::controlled(&u)),
            (_, None) => GateMatrix::Two(Unitary4x4::swap()),
        }
    }

    /// The inverse gate.
    pub fn inverse(&self) -> StandardGate {
        match *self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,
            StandardGate::Rx(t) => StandardGate::Rx(-t),
            StandardGate::Ry(t) => StandardGate::Ry(-t),
            StandardGate::Rz(t) => StandardGate::Rz(-t),
            StandardGate::P(l) => StandardGate::P(-l),
            StandardGate::CP(l) => StandardGate::CP(-l),
            StandardGate::U(t, p, l) => StandardGate::U(-t, -l, -p),
            StandardGate::CU(t, p, l, g) => StandardGate::CU(-t, -l, -p, -g),
            other => other,
        }
    }
}

/// Body of a custom block: an opaque matrix or a gate-level decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockDefinition {
    /// Dense `2^w x 2^w` unitary.
    Matrix(UnitaryMatrix),
    /// Instructions over local qubit indices `0..w`.
    Decomposed(Vec<Instruction>),
}

/// A named unitary block acting on `num_qubits` qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomBlock {
    /// The name of the block.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Matrix or decomposition.
    pub definition: BlockDefinition,
}

impl CustomBlock {
    /// An opaque block backed by a dense matrix.
    pub fn from_matrix(name: impl Into<String>, matrix: UnitaryMatrix) -> Self {
        Self {
            name: name.into(),
            num_qubits: matrix.num_qubits(),
            definition: BlockDefinition::Matrix(matrix),
        }
    }

    /// A decomposed block whose body is the instructions of `circuit`.
    ///
    /// Measurement bindings of `circuit` are not part of the block.
    pub fn from_circuit(name: impl Into<String>, circuit: &Circuit) -> Self {
        Self {
            name: name.into(),
            num_qubits: circuit.num_qubits(),
            definition: BlockDefinition::Decomposed(circuit.instructions().to_vec()),
        }
    }

    /// A decomposed block from an explicit body, validated against `num_qubits`.
    pub fn decomposed(
        name: impl Into<String>,
        num_qubits: u32,
        body: Vec<Instruction>,
    ) -> IrResult<Self> {
        let name = name.into();
        for inst in &body {
            inst.validate(num_qubits).map_err(|e| IrError::InvalidBlock {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(Self {
            name,
            num_qubits,
            definition: BlockDefinition::Decomposed(body),
        })
    }

    /// Check that the body matches the declared width.
    pub fn validate(&self) -> IrResult<()> {
        let invalid = |reason: String| IrError::InvalidBlock {
            name: self.name.clone(),
            reason,
        };
        match &self.definition {
            BlockDefinition::Matrix(m) if m.num_qubits() != self.num_qubits => Err(invalid(
                format!("matrix acts on {} qubits, block declares {}", m.num_qubits(), self.num_qubits),
            )),
            BlockDefinition::Matrix(_) => Ok(()),
            BlockDefinition::Decomposed(body) => body
                .iter()
                .try_for_each(|inst| inst.validate(self.num_qubits))
                .map_err(|e| invalid(e.to_string())),
        }
    }

    /// True for matrix-backed blocks.
    pub fn is_opaque(&self) -> bool {
        matches!(self.definition, BlockDefinition::Matrix(_))
    }

    /// The inverse block: conjugate transpose, or the reversed inverted body.
    pub fn inverse(&self) -> Self {
        let definition = match &self.definition {
            BlockDefinition::Matrix(m) => BlockDefinition::Matrix(m.adjoint()),
            BlockDefinition::Decomposed(body) => {
                BlockDefinition::Decomposed(body.iter().rev().map(Instruction::inverse).collect())
            }
        };
        Self {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            definition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DEFAULT_TOLERANCE;
    use crate::qubit::QubitId;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CU(0.1, 0.2, 0.3, 0.4).num_qubits(), 2);
        assert_eq!(StandardGate::CP(PI).num_controls(), 1);
        assert_eq!(StandardGate::Swap.num_controls(), 0);
        assert_eq!(StandardGate::U(1.0, 2.0, 3.0).params(), vec![1.0, 2.0, 3.0]);
        assert!(StandardGate::H.params().is_empty());
    }

    #[test]
    fn test_every_gate_matrix_is_unitary() {
        let gates = [
            StandardGate::I,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Sdg,
            StandardGate::T,
            StandardGate::Tdg,
            StandardGate::SX,
            StandardGate::SXdg,
            StandardGate::Rx(0.3),
            StandardGate::Ry(-1.2),
            StandardGate::Rz(2.0),
            StandardGate::P(PI / 3.0),
            StandardGate::U(0.5, 1.5, -0.5),
            StandardGate::CX,
            StandardGate::CZ,
            StandardGate::CP(0.7),
            StandardGate::CU(0.5, 1.5, -0.5, 0.25),
            StandardGate::Swap,
        ];
        for g in gates {
            assert!(g.matrix().is_unitary(DEFAULT_TOLERANCE), "{} not unitary", g.name());
        }
    }

    #[test]
    fn test_inverse_gates_cancel() {
        for g in [
            StandardGate::S,
            StandardGate::T,
            StandardGate::SX,
            StandardGate::Rx(0.4),
            StandardGate::U(0.3, -1.0, 2.2),
        ] {
            let (Some(a), Some(b)) = (g.target_matrix(), g.inverse().target_matrix()) else {
                panic!("single-qubit gate without matrix");
            };
            assert!(a.mul(&b).approx_eq(&Unitary2x2::identity(), 1e-10));
        }
    }

    #[test]
    fn test_block_inverse() {
        let opaque = CustomBlock::from_matrix(
            "cycle",
            UnitaryMatrix::from_permutation(2, &[1, 2, 3, 0]).unwrap(),
        );
        assert!(opaque.is_opaque());
        let inv = opaque.inverse();
        assert_eq!(inv.name, "cycle_dg");
        let BlockDefinition::Matrix(m) = &inv.definition else {
            panic!("expected matrix");
        };
        assert_eq!(m.get(0, 1).re, 1.0);

        let body = vec![
            Instruction::single_qubit_gate(StandardGate::T, QubitId(0)),
            Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)),
        ];
        let block = CustomBlock::decomposed("tc", 2, body).unwrap();
        let BlockDefinition::Decomposed(inv_body) = block.inverse().definition else {
            panic!("expected body");
        };
        assert_eq!(inv_body[0].name(), "cx");
        assert_eq!(inv_body[1].name(), "tdg");
    }

    #[test]
    fn test_decomposed_block_rejects_out_of_range_body() {
        let body = vec![Instruction::single_qubit_gate(StandardGate::H, QubitId(3))];
        assert!(matches!(
            CustomBlock::decomposed("bad", 2, body),
            Err(IrError::InvalidBlock { .. })
        ));
    }

    #[test]
    fn test_block_width_must_match_body() {
        let lying = CustomBlock {
            name: "lying".into(),
            num_qubits: 2,
            definition: BlockDefinition::Matrix(UnitaryMatrix::identity(1)),
        };
        assert!(matches!(lying.validate(), Err(IrError::InvalidBlock { .. })));
        let inst = Instruction::block(lying, [QubitId(0), QubitId(1)]);
        assert!(inst.validate(2).is_err());

        let stray = CustomBlock {
            name: "stray".into(),
            num_qubits: 1,
            definition: BlockDefinition::Decomposed(vec![Instruction::single_qubit_gate(
                StandardGate::X,
                QubitId(3),
            )]),
        };
        assert!(stray.validate().is_err());
    }
}
