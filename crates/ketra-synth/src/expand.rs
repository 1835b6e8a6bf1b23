//! Lowering to primitive operations.
//!
//! [`expand`] replaces every `Mcx` with its exact synthesis and inlines every
//! decomposed block, recursively. Opaque matrix blocks are kept: the engine
//! applies them with its dense kernel.

use ketra_ir::{BlockDefinition, Circuit, Instruction, InstructionKind};
use tracing::debug;

use crate::error::SynthResult;
use crate::mcx::append_mcx;

/// Produce the fully expanded form of `circuit`.
///
/// Measurement bindings are carried over unchanged.
pub fn expand(circuit: &Circuit) -> SynthResult<Circuit> {
    let mut out = Circuit::with_size(
        circuit.name().to_string(),
        circuit.num_qubits(),
        circuit.num_clbits(),
    );
    for inst in circuit.instructions() {
        expand_into(&mut out, inst)?;
    }
    for binding in circuit.measurements() {
        out.measure(binding.qubit, binding.clbit)?;
    }
    debug!(
        circuit = circuit.name(),
        before = circuit.len(),
        after = out.len(),
        "expanded circuit"
    );
    Ok(out)
}

/// True if every operation is primitive (opaque blocks included).
pub fn is_expanded(circuit: &Circuit) -> bool {
    circuit.instructions().iter().all(Instruction::is_primitive)
}

fn expand_into(out: &mut Circuit, inst: &Instruction) -> SynthResult<()> {
    match &inst.kind {
        InstructionKind::Mcx => {
            if let Some((&target, controls)) = inst.qubits.split_last() {
                append_mcx(out, controls, target)?;
            }
        }
        InstructionKind::Block(block) => match &block.definition {
            BlockDefinition::Decomposed(body) => {
                for child in body {
                    expand_into(out, &child.remap(&inst.qubits))?;
                }
            }
            BlockDefinition::Matrix(_) => {
                out.append(inst.clone())?;
            }
        },
        _ => {
            out.append(inst.clone())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketra_ir::{ClbitId, CustomBlock, QubitId, UnitaryMatrix};

    #[test]
    fn test_expand_mcx_and_blocks() {
        let mut inner = Circuit::with_size("inner", 3, 0);
        inner.mcx(&[QubitId(0), QubitId(1)], QubitId(2)).unwrap();
        let block = CustomBlock::from_circuit("toffoli_block", &inner);

        let mut circuit = Circuit::with_size("main", 4, 1);
        circuit
            .h(QubitId(0))
            .unwrap()
            .block(block, [QubitId(3), QubitId(2), QubitId(1)])
            .unwrap()
            .measure(QubitId(1), ClbitId(0))
            .unwrap();
        assert!(!is_expanded(&circuit));

        let expanded = expand(&circuit).unwrap();
        assert!(is_expanded(&expanded));
        assert_eq!(expanded.len(), 1 + 15);
        assert_eq!(expanded.measurements(), circuit.measurements());
    }

    #[test]
    fn test_opaque_blocks_survive() {
        let block =
            CustomBlock::from_matrix("flip", UnitaryMatrix::from_permutation(1, &[1, 0]).unwrap());
        let mut circuit = Circuit::with_size("main", 1, 0);
        circuit.block(block, [QubitId(0)]).unwrap();
        let expanded = expand(&circuit).unwrap();
        assert_eq!(expanded.instructions(), circuit.instructions());
    }
}
