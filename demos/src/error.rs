//! Error types for the demo drivers.

use thiserror::Error;

use ketra_adapter_sim::SimError;
use ketra_ir::IrError;
use ketra_synth::SynthError;

/// Errors raised while building or post-processing a demo.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DemoError {
    /// Secret string contains something other than `0`/`1`, or is empty.
    #[error("Invalid secret string '{0}': expected a non-empty string of 0s and 1s")]
    InvalidSecret(String),

    /// Base has no modular-multiplication network for N = 15.
    #[error("No multiplier network for a = {0} mod 15 (choose from 2, 4, 7, 8, 11, 13)")]
    UnsupportedBase(u64),

    /// Parameter vector does not match the ansatz.
    #[error("Ansatz expects {expected} parameters, got {got}")]
    ParameterCount { expected: usize, got: usize },

    /// Circuit construction error.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// Synthesis error.
    #[error("Synthesis error: {0}")]
    Synth(#[from] SynthError),

    /// Simulation error.
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

/// Result type for demo operations.
pub type DemoResult<T> = std::result::Result<T, DemoError>;
