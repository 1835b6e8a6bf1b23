//! Error types for the synth crate.

use thiserror::Error;

/// Errors produced by control synthesis and circuit transforms.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// An opaque matrix block cannot be control-gated.
    #[error("Block '{block}' is an opaque matrix and cannot take {controls} control(s)")]
    UnsupportedControlArity {
        /// Name of the block.
        block: String,
        /// Number of requested controls.
        controls: usize,
    },

    /// A marked basis state does not fit in the register.
    #[error("Marked state {state} does not fit in {num_qubits} qubits")]
    MarkedStateOutOfRange {
        /// The offending basis-state index.
        state: usize,
        /// Register width.
        num_qubits: u32,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] ketra_ir::IrError),
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
