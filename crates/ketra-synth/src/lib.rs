//! `ketra-synth`: control synthesis and circuit transforms.
//!
//! Builds on `ketra_ir::Circuit` with:
//!
//! - **Multi-controlled gates**: exact MCX / MCP / MCU synthesis, ancilla-free
//!   or over borrowed dirty qubits ([`mcx`])
//! - **Controlled blocks**: control-gating of decomposed custom blocks
//!   ([`controlled`])
//! - **Expansion**: lowering a circuit to primitive operations ([`expand`])
//! - **Transforms**: the QFT family ([`qft`]) and Grover search ([`grover`])
//!
//! # Quick start
//!
//! ```rust
//! use ketra_ir::{Circuit, QubitId};
//! use ketra_synth::{expand, is_expanded};
//!
//! let mut circuit = Circuit::with_size("ccx", 3, 0);
//! circuit.mcx(&[QubitId(0), QubitId(1)], QubitId(2)).unwrap();
//!
//! let lowered = expand(&circuit).unwrap();
//! assert!(is_expanded(&lowered));
//! assert_eq!(lowered.len(), 15);
//! ```

pub mod controlled;
pub mod error;
pub mod expand;
pub mod grover;
pub mod mcx;
pub mod qft;

pub use controlled::{append_controlled_block, append_controlled_instruction, controlled_block};
pub use error::{SynthError, SynthResult};
pub use expand::{expand, is_expanded};
pub use grover::{
    GroverOptions, diffusion, grover_circuit, grover_iterate, optimal_iterations, phase_oracle,
};
pub use mcx::{append_mcp, append_mcu, append_mcx, append_mcz, append_toffoli, mcx};
pub use qft::{
    QftOptions, append_inverse_qft, append_qft, inverse_qft, inverse_qft_with, qft, qft_with,
};
