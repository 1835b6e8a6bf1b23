//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while building or composing circuits.
///
/// These are construction errors: the circuit description is wrong and
/// retrying will not help.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// An operation references a qubit outside `[0, n)`.
    #[error(
        "Qubit {qubit} is out of range for a {num_qubits}-qubit register{}",
        format_gate_context(.gate_name)
    )]
    InvalidQubitIndex {
        /// The offending qubit.
        qubit: QubitId,
        /// Register width of the circuit.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A measurement references a classical bit outside `[0, m)`.
    #[error("Classical bit {clbit} is out of range for a {num_clbits}-bit register")]
    InvalidClbitIndex {
        /// The offending classical bit.
        clbit: ClbitId,
        /// Classical register width of the circuit.
        num_clbits: u32,
    },

    /// The same qubit appears twice in one operation (e.g. control == target).
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of operands.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Qubit mapping passed to `append_circuit` has the wrong size.
    #[error("Qubit mapping has {got} entries but the sub-circuit has {expected} qubits")]
    MappingArityMismatch {
        /// Number of qubits in the sub-circuit.
        expected: u32,
        /// Number of entries in the mapping.
        got: u32,
    },

    /// Qubit mapping sends two sub-circuit qubits to the same target.
    #[error("Qubit mapping is not injective: {qubit} is used more than once")]
    NonInjectiveMapping {
        /// The qubit that appears twice in the mapping.
        qubit: QubitId,
    },

    /// A custom block is malformed (matrix size, body range, ...).
    #[error("Invalid block '{name}': {reason}")]
    InvalidBlock {
        /// Name of the block.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Export requires a fully expanded circuit.
    #[error("Operation '{0}' must be expanded into primitives before export")]
    UnexpandedOperation(String),

    /// Pauli label contains a character other than I, X, Y, Z.
    #[error("Invalid Pauli label '{0}'")]
    InvalidPauliLabel(String),

    /// Serialization failure while exporting.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
