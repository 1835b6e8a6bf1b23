//! Multi-controlled gate synthesis.
//!
//! Every construction here is exact: the emitted primitives implement the
//! controlled operation with no relative phases and no clean ancillas.
//!
//! - `C^0 X = X`, `C^1 X = CX`, `C^2 X` is the 15-gate Toffoli network
//!   (H, CX, T, Tdg).
//! - For `k >= 3`, `C^k X = H · C^k P(π) · H` with the phase recursion
//!
//!   C^k P(θ) = CP(θ/2) · C^{k-1}X · CP(-θ/2) · C^{k-1}X · C^{k-1}P(θ/2)
//!
//!   where the CP and the inner C^{k-1}X share the last control. This is
//!   ancilla-free but grows as O(3^k).
//! - For `k >= 5` with at least one qubit outside the gate, the controls are
//!   split in two halves through one borrowed qubit and each half is a
//!   Toffoli V-chain over borrowed dirty qubits. O(k) Toffolis. Borrowed
//!   qubits are restored to their input value whatever it was.
//!
//! Controlled arbitrary single-qubit unitaries use the same recursion with
//! a principal square root in place of the halved angle.

use std::f64::consts::PI;

use ketra_ir::{Circuit, Instruction, QubitId, Unitary2x2};
use tracing::debug;

use crate::error::SynthResult;

/// Smallest control count that takes the borrowed-qubit path.
pub const BORROW_THRESHOLD: usize = 5;

/// Synthesize `C^k X` over a register of `num_qubits` qubits.
///
/// Qubits outside `controls ++ [target]` may be borrowed; they are left
/// unchanged.
pub fn mcx(controls: &[QubitId], target: QubitId, num_qubits: u32) -> SynthResult<Vec<Instruction>> {
    let mut scratch = Circuit::with_size("mcx", num_qubits, 0);
    append_mcx(&mut scratch, controls, target)?;
    Ok(scratch.instructions().to_vec())
}

/// Append a synthesized `C^k X` to `circuit`.
pub fn append_mcx(circuit: &mut Circuit, controls: &[QubitId], target: QubitId) -> SynthResult<()> {
    Instruction::mcx(controls, target).validate(circuit.num_qubits())?;

    let before = circuit.len();
    let borrowed = (0..circuit.num_qubits())
        .map(QubitId)
        .find(|q| *q != target && !controls.contains(q));

    match borrowed {
        Some(ancilla) if controls.len() >= BORROW_THRESHOLD => {
            mcx_borrowed(circuit, controls, target, ancilla)?;
        }
        _ => mcx_recursive(circuit, controls, target)?,
    }

    debug!(
        controls = controls.len(),
        gates = circuit.len() - before,
        "synthesized mcx"
    );
    Ok(())
}

/// Append a multi-controlled phase `C^k P(theta)`.
pub fn append_mcp(
    circuit: &mut Circuit,
    theta: f64,
    controls: &[QubitId],
    target: QubitId,
) -> SynthResult<()> {
    Instruction::mcx(controls, target).validate(circuit.num_qubits())?;
    mcp_recursive(circuit, theta, controls, target)
}

/// Append a multi-controlled Z over `qubits`.
///
/// `C^k Z` is symmetric, so the last qubit is used as the target.
pub fn append_mcz(circuit: &mut Circuit, qubits: &[QubitId]) -> SynthResult<()> {
    match qubits.split_last() {
        Some((&target, controls)) => append_mcp(circuit, PI, controls, target),
        None => Ok(()),
    }
}

/// Append a multi-controlled single-qubit unitary `C^k U`.
///
/// The global phase of `u` is honoured: it becomes a relative phase on the
/// all-controls-set subspace.
pub fn append_mcu(
    circuit: &mut Circuit,
    u: &Unitary2x2,
    controls: &[QubitId],
    target: QubitId,
) -> SynthResult<()> {
    Instruction::mcx(controls, target).validate(circuit.num_qubits())?;
    mcu_recursive(circuit, u, controls, target)
}

/// Append the exact 15-gate Toffoli network.
pub fn append_toffoli(
    circuit: &mut Circuit,
    c1: QubitId,
    c2: QubitId,
    target: QubitId,
) -> SynthResult<()> {
    circuit
        .h(target)?
        .cx(c2, target)?
        .tdg(target)?
        .cx(c1, target)?
        .t(target)?
        .cx(c2, target)?
        .tdg(target)?
        .cx(c1, target)?
        .t(c2)?
        .t(target)?
        .h(target)?
        .cx(c1, c2)?
        .t(c1)?
        .tdg(c2)?
        .cx(c1, c2)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Recursions
// ---------------------------------------------------------------------------

fn mcx_recursive(circuit: &mut Circuit, controls: &[QubitId], target: QubitId) -> SynthResult<()> {
    match controls {
        [] => {
            circuit.x(target)?;
        }
        [c] => {
            circuit.cx(*c, target)?;
        }
        [c1, c2] => append_toffoli(circuit, *c1, *c2, target)?,
        _ => {
            circuit.h(target)?;
            mcp_recursive(circuit, PI, controls, target)?;
            circuit.h(target)?;
        }
    }
    Ok(())
}

fn mcp_recursive(
    circuit: &mut Circuit,
    theta: f64,
    controls: &[QubitId],
    target: QubitId,
) -> SynthResult<()> {
    let Some((&last, rest)) = controls.split_last() else {
        circuit.p(theta, target)?;
        return Ok(());
    };
    if rest.is_empty() {
        circuit.cp(theta, last, target)?;
        return Ok(());
    }
    circuit.cp(theta / 2.0, last, target)?;
    mcx_recursive(circuit, rest, last)?;
    circuit.cp(-theta / 2.0, last, target)?;
    mcx_recursive(circuit, rest, last)?;
    mcp_recursive(circuit, theta / 2.0, rest, target)
}

fn mcu_recursive(
    circuit: &mut Circuit,
    u: &Unitary2x2,
    controls: &[QubitId],
    target: QubitId,
) -> SynthResult<()> {
    let Some((&last, rest)) = controls.split_last() else {
        circuit.unitary(*u, target)?;
        return Ok(());
    };
    if rest.is_empty() {
        circuit.cu(u, last, target)?;
        return Ok(());
    }
    let v = u.sqrt();
    circuit.cu(&v, last, target)?;
    mcx_recursive(circuit, rest, last)?;
    circuit.cu(&v.adjoint(), last, target)?;
    mcx_recursive(circuit, rest, last)?;
    mcu_recursive(circuit, &v, rest, target)
}

// ---------------------------------------------------------------------------
// Borrowed-qubit construction
// ---------------------------------------------------------------------------

/// Split `C^k X` through one borrowed qubit `ancilla`.
///
/// With `A` toggling `ancilla` by the first half and `B` toggling `target`
/// by the second half and `ancilla`, the sequence `A B A B` toggles `target`
/// by all controls and returns `ancilla` to its input value.
fn mcx_borrowed(
    circuit: &mut Circuit,
    controls: &[QubitId],
    target: QubitId,
    ancilla: QubitId,
) -> SynthResult<()> {
    let split = controls.len().div_ceil(2);
    let first = &controls[..split];
    let mut second = controls[split..].to_vec();
    second.push(ancilla);

    let width = circuit.num_qubits();
    let pool_first: Vec<QubitId> = (0..width)
        .map(QubitId)
        .filter(|q| !first.contains(q) && *q != ancilla)
        .collect();
    let pool_second: Vec<QubitId> = (0..width)
        .map(QubitId)
        .filter(|q| !second.contains(q) && *q != target)
        .collect();

    for _ in 0..2 {
        vchain(circuit, first, ancilla, &pool_first)?;
        vchain(circuit, &second, target, &pool_second)?;
    }
    Ok(())
}

/// `C^m X` from Toffolis over `m - 2` dirty ancillas.
///
/// The ancillas are restored. Falls back to the recursion below three
/// controls.
fn vchain(
    circuit: &mut Circuit,
    controls: &[QubitId],
    target: QubitId,
    dirty: &[QubitId],
) -> SynthResult<()> {
    let m = controls.len();
    if m < 3 {
        return mcx_recursive(circuit, controls, target);
    }
    debug_assert!(dirty.len() >= m - 2, "not enough borrowed qubits for v-chain");

    let top = (controls[m - 1], dirty[m - 3], target);
    let ladder: Vec<(QubitId, QubitId, QubitId)> = (1..=m - 3)
        .rev()
        .map(|i| (controls[i + 1], dirty[i - 1], dirty[i]))
        .collect();
    let center = (controls[0], controls[1], dirty[0]);

    // Compute-toggle-uncompute on the target, then restore the ladder.
    let mut sequence = vec![top];
    sequence.extend(ladder.iter().copied());
    sequence.push(center);
    sequence.extend(ladder.iter().rev().copied());
    sequence.push(top);
    sequence.extend(ladder.iter().copied());
    sequence.push(center);
    sequence.extend(ladder.iter().rev().copied());

    for (a, b, t) in sequence {
        append_toffoli(circuit, a, b, t)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketra_ir::InstructionKind;

    fn ids(range: std::ops::Range<u32>) -> Vec<QubitId> {
        range.map(QubitId).collect()
    }

    #[test]
    fn test_small_cases() {
        assert_eq!(mcx(&[], QubitId(0), 1).unwrap().len(), 1);
        let cx = mcx(&[QubitId(0)], QubitId(1), 2).unwrap();
        assert_eq!(cx.len(), 1);
        assert_eq!(cx[0].name(), "cx");
        assert_eq!(mcx(&ids(0..2), QubitId(2), 3).unwrap().len(), 15);
    }

    #[test]
    fn test_recursive_gate_counts() {
        // No idle qubit: pure ancilla-free recursion.
        for (k, expected) in [(3u32, 39usize), (4, 119), (5, 359), (6, 1079)] {
            let ops = mcx(&ids(0..k), QubitId(k), k + 1).unwrap();
            assert_eq!(ops.len(), expected, "k = {k}");
        }
    }

    #[test]
    fn test_borrowed_path_is_linear() {
        let ops5 = mcx(&ids(0..5), QubitId(5), 7).unwrap();
        let ops6 = mcx(&ids(0..6), QubitId(6), 8).unwrap();
        assert_eq!(ops5.len(), 240);
        assert_eq!(ops6.len(), 360);
    }

    #[test]
    fn test_output_is_primitive() {
        let ops = mcx(&ids(0..6), QubitId(6), 8).unwrap();
        assert!(ops.iter().all(Instruction::is_primitive));
        assert!(ops.iter().all(|i| !matches!(i.kind, InstructionKind::Mcx)));
    }

    #[test]
    fn test_invalid_operands() {
        assert!(mcx(&[QubitId(0)], QubitId(0), 2).is_err());
        assert!(mcx(&[QubitId(3)], QubitId(0), 2).is_err());
    }

    #[test]
    fn test_mcu_single_control_is_cu() {
        let mut circuit = Circuit::with_size("cu", 2, 0);
        append_mcu(&mut circuit, &Unitary2x2::h(), &[QubitId(0)], QubitId(1)).unwrap();
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.instructions()[0].name(), "cu");
    }

    #[test]
    fn test_mcz_empty_is_noop() {
        let mut circuit = Circuit::with_size("z", 1, 0);
        append_mcz(&mut circuit, &[]).unwrap();
        assert!(circuit.is_empty());
        append_mcz(&mut circuit, &[QubitId(0)]).unwrap();
        assert_eq!(circuit.instructions()[0].name(), "p");
    }
}
