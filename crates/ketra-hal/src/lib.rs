//! Ketra execution contract.
//!
//! This crate defines how circuits are handed to something that runs them:
//! - A common [`Backend`] trait for job submission and management
//! - [`JobRequest`] for sampling and estimation work
//! - [`Capabilities`] describing what a backend accepts
//! - Result handling via [`ExecutionResult`], [`Counts`] and [`Estimate`]
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use ketra_adapter_sim::SimulatorBackend;
//! use ketra_hal::{Backend, JobRequest};
//! use ketra_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new();
//!     let request = JobRequest::sample(Circuit::bell()?, 1000).with_seed(42);
//!
//!     let job_id = backend.submit(&request).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     if let Some((bitstring, count)) = result.counts().and_then(|c| c.most_frequent()) {
//!         println!("Most frequent: {bitstring} ({count} times)");
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod request;
pub mod result;

pub use backend::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult, WaitOptions,
};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobKind, JobStatus};
pub use request::JobRequest;
pub use result::{Counts, Estimate, ExecutionResult, JobOutput};
