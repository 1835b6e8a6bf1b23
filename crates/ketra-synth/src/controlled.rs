//! Control-gating of instructions and custom blocks.
//!
//! Every primitive of a decomposed block is rewritten into its controlled
//! form. X-type operations stay as native `Mcx` instructions (lowered later
//! by [`crate::expand`]); phase-type and general single-qubit operations are
//! synthesized immediately through [`crate::mcx`].

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use ketra_ir::{
    BlockDefinition, Circuit, CustomBlock, Instruction, InstructionKind, QubitId, StandardGate,
};

use crate::error::{SynthError, SynthResult};
use crate::mcx::{append_mcp, append_mcu};

/// Append `block`, applied to `qubits`, controlled on all of `controls`.
///
/// With no controls the block body is spliced unchanged (opaque blocks are
/// appended as a single instruction). Opaque blocks refuse any control.
pub fn append_controlled_block(
    circuit: &mut Circuit,
    block: &CustomBlock,
    qubits: &[QubitId],
    controls: &[QubitId],
) -> SynthResult<()> {
    if qubits.len() != block.num_qubits as usize {
        return Err(ketra_ir::IrError::QubitCountMismatch {
            gate_name: block.name.clone(),
            expected: block.num_qubits,
            got: qubits.len() as u32,
        }
        .into());
    }
    match &block.definition {
        BlockDefinition::Matrix(_) if controls.is_empty() => {
            circuit.block(block.clone(), qubits.iter().copied())?;
        }
        BlockDefinition::Matrix(_) => {
            return Err(SynthError::UnsupportedControlArity {
                block: block.name.clone(),
                controls: controls.len(),
            });
        }
        BlockDefinition::Decomposed(body) => {
            for inst in body {
                append_controlled_instruction(circuit, &inst.remap(qubits), controls)?;
            }
        }
    }
    Ok(())
}

/// Build a new decomposed block: `block` controlled on `num_controls` qubits.
///
/// The controls are local qubits `0..num_controls`; the block's own qubits
/// follow.
pub fn controlled_block(block: &CustomBlock, num_controls: u32) -> SynthResult<CustomBlock> {
    let width = num_controls + block.num_qubits;
    let name = format!("c{num_controls}_{}", block.name);
    let mut body = Circuit::with_size(name.clone(), width, 0);
    let controls: Vec<QubitId> = (0..num_controls).map(QubitId).collect();
    let qubits: Vec<QubitId> = (num_controls..width).map(QubitId).collect();
    append_controlled_block(&mut body, block, &qubits, &controls)?;
    Ok(CustomBlock::from_circuit(name, &body))
}

/// Append `inst` (already on register qubits) controlled on `controls`.
pub fn append_controlled_instruction(
    circuit: &mut Circuit,
    inst: &Instruction,
    controls: &[QubitId],
) -> SynthResult<()> {
    if controls.is_empty() {
        circuit.append(inst.clone())?;
        return Ok(());
    }

    let with = |extra: &[QubitId]| -> Vec<QubitId> {
        let mut all = controls.to_vec();
        all.extend_from_slice(extra);
        all
    };

    match &inst.kind {
        InstructionKind::Gate(gate) => {
            let q = &inst.qubits;
            match *gate {
                StandardGate::I => {}
                StandardGate::X => {
                    circuit.mcx(controls, q[0])?;
                }
                StandardGate::CX => {
                    circuit.mcx(&with(&q[..1]), q[1])?;
                }
                StandardGate::Z => append_mcp(circuit, PI, controls, q[0])?,
                StandardGate::S => append_mcp(circuit, FRAC_PI_2, controls, q[0])?,
                StandardGate::Sdg => append_mcp(circuit, -FRAC_PI_2, controls, q[0])?,
                StandardGate::T => append_mcp(circuit, FRAC_PI_4, controls, q[0])?,
                StandardGate::Tdg => append_mcp(circuit, -FRAC_PI_4, controls, q[0])?,
                StandardGate::P(lambda) => append_mcp(circuit, lambda, controls, q[0])?,
                StandardGate::CZ => append_mcp(circuit, PI, &with(&q[..1]), q[1])?,
                StandardGate::CP(lambda) => append_mcp(circuit, lambda, &with(&q[..1]), q[1])?,
                StandardGate::Swap => {
                    // Fredkin: CX(b, a) · C^{k+1}X(controls + a -> b) · CX(b, a)
                    let (a, b) = (q[0], q[1]);
                    circuit.cx(b, a)?;
                    circuit.mcx(&with(&[a]), b)?;
                    circuit.cx(b, a)?;
                }
                StandardGate::CU(..) => {
                    let u = target_matrix(gate)?;
                    append_mcu(circuit, &u, &with(&q[..1]), q[1])?;
                }
                _ => {
                    let u = target_matrix(gate)?;
                    append_mcu(circuit, &u, controls, q[0])?;
                }
            }
        }
        InstructionKind::Unitary(u) => append_mcu(circuit, u, controls, inst.qubits[0])?,
        InstructionKind::Mcx => {
            let (target, inner) = match inst.qubits.split_last() {
                Some((t, rest)) => (*t, rest),
                None => return Ok(()),
            };
            circuit.mcx(&with(inner), target)?;
        }
        InstructionKind::Barrier => {
            circuit.barrier(with(&inst.qubits))?;
        }
        InstructionKind::Block(block) => {
            append_controlled_block(circuit, block, &inst.qubits, controls)?;
        }
    }
    Ok(())
}

fn target_matrix(gate: &StandardGate) -> SynthResult<ketra_ir::Unitary2x2> {
    gate.target_matrix().ok_or_else(|| {
        SynthError::Ir(ketra_ir::IrError::InvalidBlock {
            name: gate.name().into(),
            reason: "gate has no single-target matrix".into(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketra_ir::UnitaryMatrix;

    fn swap_block() -> CustomBlock {
        let mut body = Circuit::with_size("swap01", 2, 0);
        body.swap(QubitId(0), QubitId(1)).unwrap();
        CustomBlock::from_circuit("swap01", &body)
    }

    #[test]
    fn test_zero_controls_splices_body() {
        let mut circuit = Circuit::with_size("t", 3, 0);
        append_controlled_block(&mut circuit, &swap_block(), &[QubitId(2), QubitId(0)], &[])
            .unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.instructions()[0].qubits, vec![QubitId(2), QubitId(0)]);
    }

    #[test]
    fn test_controlled_swap_shape() {
        let mut circuit = Circuit::with_size("t", 3, 0);
        append_controlled_block(&mut circuit, &swap_block(), &[QubitId(1), QubitId(2)], &[
            QubitId(0),
        ])
        .unwrap();
        let names: Vec<_> = circuit.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["cx", "mcx", "cx"]);
        assert_eq!(circuit.instructions()[1].qubits, vec![
            QubitId(0),
            QubitId(1),
            QubitId(2)
        ]);
    }

    #[test]
    fn test_opaque_block_refuses_control() {
        let block = CustomBlock::from_matrix(
            "perm",
            UnitaryMatrix::from_permutation(1, &[1, 0]).unwrap(),
        );
        let mut circuit = Circuit::with_size("t", 2, 0);
        let err = append_controlled_block(&mut circuit, &block, &[QubitId(1)], &[QubitId(0)]);
        assert!(matches!(
            err,
            Err(SynthError::UnsupportedControlArity { controls: 1, .. })
        ));

        // Without controls the opaque block is accepted as-is.
        append_controlled_block(&mut circuit, &block, &[QubitId(1)], &[]).unwrap();
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_controlled_block_builds_wider_block() {
        let c = controlled_block(&swap_block(), 2).unwrap();
        assert_eq!(c.num_qubits, 4);
        assert_eq!(c.name, "c2_swap01");
        assert!(!c.is_opaque());
    }

    #[test]
    fn test_nested_block_is_controlled_recursively() {
        let inner = swap_block();
        let mut outer_body = Circuit::with_size("outer", 2, 0);
        outer_body.block(inner, [QubitId(1), QubitId(0)]).unwrap();
        let outer = CustomBlock::from_circuit("outer", &outer_body);

        let mut circuit = Circuit::with_size("t", 3, 0);
        append_controlled_block(&mut circuit, &outer, &[QubitId(1), QubitId(2)], &[QubitId(0)])
            .unwrap();
        // Inner swap acts on (2, 1) after both remaps.
        assert_eq!(circuit.instructions()[0].qubits, vec![QubitId(1), QubitId(2)]);
    }
}
