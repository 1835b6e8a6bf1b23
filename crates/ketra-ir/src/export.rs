//! Export of fully expanded circuits to a flat, serializable form.
//!
//! Only primitive operations can be exported. Multi-controlled X and
//! decomposed blocks must be expanded first; opaque matrix blocks have no
//! portable gate-level form and are rejected.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind, MeasurementBinding};

/// One exported operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedOp {
    /// Gate name (`"h"`, `"cx"`, `"unitary"`, ...).
    pub name: String,
    /// Target qubit indices.
    pub targets: Vec<u32>,
    /// Control qubit indices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<u32>,
    /// Gate parameters. Arbitrary unitaries export `(θ, φ, λ, γ)`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

/// A circuit in exported form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedCircuit {
    /// Circuit name.
    pub name: String,
    /// Register width.
    pub num_qubits: u32,
    /// Classical register width.
    pub num_clbits: u32,
    /// Operations in application order.
    pub operations: Vec<ExportedOp>,
    /// Measurement bindings.
    pub measurements: Vec<MeasurementBinding>,
}

impl ExportedCircuit {
    /// Export a fully expanded circuit.
    pub fn from_circuit(circuit: &Circuit) -> IrResult<Self> {
        let operations = circuit
            .instructions()
            .iter()
            .map(export_op)
            .collect::<IrResult<Vec<_>>>()?;
        Ok(Self {
            name: circuit.name().to_string(),
            num_qubits: circuit.num_qubits(),
            num_clbits: circuit.num_clbits(),
            operations,
            measurements: circuit.measurements().to_vec(),
        })
    }
}

impl TryFrom<&Circuit> for ExportedCircuit {
    type Error = IrError;

    fn try_from(circuit: &Circuit) -> IrResult<Self> {
        Self::from_circuit(circuit)
    }
}

fn export_op(inst: &Instruction) -> IrResult<ExportedOp> {
    let params = match &inst.kind {
        InstructionKind::Gate(g) => g.params(),
        InstructionKind::Unitary(u) => {
            let (theta, phi, lambda, gamma) = u.u_params();
            vec![theta, phi, lambda, gamma]
        }
        InstructionKind::Barrier => vec![],
        InstructionKind::Mcx => {
            return Err(IrError::UnexpandedOperation(inst.name().to_string()));
        }
        InstructionKind::Block(b) if b.is_opaque() => {
            return Err(IrError::InvalidBlock {
                name: b.name.clone(),
                reason: "opaque matrix blocks cannot be exported".into(),
            });
        }
        InstructionKind::Block(b) => return Err(IrError::UnexpandedOperation(b.name.clone())),
    };
    Ok(ExportedOp {
        name: inst.name().to_string(),
        targets: inst.targets().iter().map(|q| q.0).collect(),
        controls: inst.controls().iter().map(|q| q.0).collect(),
        params,
    })
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Export a fully expanded circuit to a JSON string.
pub fn to_json(circuit: &Circuit, config: &ExportConfig) -> IrResult<String> {
    let exported = ExportedCircuit::from_circuit(circuit)?;
    let json = if config.pretty {
        serde_json::to_string_pretty(&exported)?
    } else {
        serde_json::to_string(&exported)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::CustomBlock;
    use crate::matrix::{Unitary2x2, UnitaryMatrix};
    use crate::qubit::QubitId;

    #[test]
    fn test_export_bell() {
        let exported = ExportedCircuit::from_circuit(&Circuit::bell().unwrap()).unwrap();
        assert_eq!(exported.operations.len(), 2);
        assert_eq!(exported.operations[1].name, "cx");
        assert_eq!(exported.operations[1].controls, vec![0]);
        assert_eq!(exported.operations[1].targets, vec![1]);
        assert_eq!(exported.measurements.len(), 2);
    }

    #[test]
    fn test_export_json_shape() {
        let mut circuit = Circuit::with_size("rot", 1, 0);
        circuit.rz(0.5, QubitId(0)).unwrap();
        let json = to_json(&circuit, &ExportConfig { pretty: false }).unwrap();
        assert!(json.contains("\"name\":\"rz\""));
        assert!(json.contains("\"params\":[0.5]"));
        assert!(!json.contains("controls"));

        let back: ExportedCircuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.operations[0].params, vec![0.5]);
    }

    #[test]
    fn test_unitary_exports_u_params() {
        let mut circuit = Circuit::with_size("u", 1, 0);
        circuit.unitary(Unitary2x2::h(), QubitId(0)).unwrap();
        let exported = ExportedCircuit::from_circuit(&circuit).unwrap();
        assert_eq!(exported.operations[0].params.len(), 4);
    }

    #[test]
    fn test_unexpanded_rejected() {
        let mut circuit = Circuit::with_size("mcx", 3, 0);
        circuit.mcx(&[QubitId(0), QubitId(1)], QubitId(2)).unwrap();
        assert!(matches!(
            ExportedCircuit::from_circuit(&circuit),
            Err(IrError::UnexpandedOperation(_))
        ));

        let mut circuit = Circuit::with_size("opaque", 1, 0);
        let block =
            CustomBlock::from_matrix("flip", UnitaryMatrix::from_permutation(1, &[1, 0]).unwrap());
        circuit.block(block, [QubitId(0)]).unwrap();
        assert!(matches!(
            ExportedCircuit::try_from(&circuit),
            Err(IrError::InvalidBlock { .. })
        ));
    }
}
