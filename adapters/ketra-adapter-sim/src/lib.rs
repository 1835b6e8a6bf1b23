//! Ketra statevector simulator.
//!
//! This crate runs `ketra-ir` circuits exactly on a dense statevector:
//!
//! - [`Statevector`]: amplitude storage with single-qubit, two-qubit and
//!   dense multi-qubit kernels, all with control masks
//! - [`Engine`]: applies a circuit and reports numerical drift
//! - [`Sampler`]: marginal distribution of the measurement bindings and
//!   seeded sampling into [`Counts`](ketra_hal::Counts)
//! - [`estimator`]: exact Pauli expectation values with shot-noise errors
//! - [`Executor`]: expand, simulate, then sample or estimate
//! - [`SimulatorBackend`]: the same, behind the `ketra-hal` job contract
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow (default limit) |
//!
//! Kernels run on the rayon pool from
//! [`SimulatorConfig::parallel_threshold`] qubits upward.
//!
//! # Example
//!
//! ```rust
//! use ketra_adapter_sim::{Executor, SimulatorConfig};
//! use ketra_ir::Circuit;
//!
//! let executor = Executor::new(SimulatorConfig::default());
//! let counts = executor.run(&Circuit::bell().unwrap(), 1000, Some(42)).unwrap();
//! assert_eq!(counts.get("00") + counts.get("11"), 1000);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod executor;
pub mod sampler;
mod simulator;
pub mod statevector;

pub use config::SimulatorConfig;
pub use engine::{Engine, NumericalDrift, SimulationReport};
pub use error::{SimError, SimResult};
pub use executor::Executor;
pub use sampler::Sampler;
pub use simulator::SimulatorBackend;
pub use statevector::Statevector;
