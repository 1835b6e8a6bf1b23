//! Ketra Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Ketra: the gate library, the circuit model, Pauli observables
//! and the flat export form.
//!
//! # Overview
//!
//! A [`Circuit`] is an ordered list of [`Instruction`]s over a fixed register
//! of `n` qubits plus a list of terminal measurement bindings. Qubit 0 is the
//! least significant bit of the basis-state index. Every instruction is
//! validated when appended, and composition copies instead of aliasing.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gate library**: [`matrix`] with [`Unitary2x2`], [`Unitary4x4`] and
//!   dense [`UnitaryMatrix`] blocks
//! - **Gates**: [`StandardGate`] for named gates and [`CustomBlock`] for
//!   user-defined blocks (opaque matrix or decomposed body)
//! - **Instructions**: [`Instruction`] combining an operation with operands
//! - **Observables**: [`Observable`] as weighted Pauli strings
//! - **Export**: [`ExportedCircuit`] for fully expanded circuits
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use ketra_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg`, `SX` | 1 | Clifford+T gates |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `CX`, `CZ`, `CP` | 2 | Controlled gates |
//! | `CU` | 2 | Controlled single-qubit unitary with phase |
//! | `Swap` | 2 | SWAP gate |
//! | `Mcx` | k+1 | Multi-controlled X |

pub mod circuit;
pub mod error;
pub mod export;
pub mod gate;
pub mod instruction;
pub mod matrix;
pub mod observable;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use export::{ExportConfig, ExportedCircuit, ExportedOp};
pub use gate::{BlockDefinition, CustomBlock, StandardGate};
pub use instruction::{Instruction, InstructionKind, MeasurementBinding};
pub use matrix::{DEFAULT_TOLERANCE, GateMatrix, Unitary2x2, Unitary4x4, UnitaryMatrix};
pub use observable::{Observable, ObservableTerm, PauliOp, PauliString};
pub use qubit::{ClbitId, QubitId, qubit_range};
