//! Job requests accepted by a [`Backend`](crate::Backend).

use ketra_ir::{Circuit, Observable};
use serde::{Deserialize, Serialize};

use crate::job::JobKind;

/// Work submitted to a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobRequest {
    /// Run the circuit and sample its measurement bindings.
    Sample {
        /// Circuit to execute.
        circuit: Circuit,
        /// Number of samples.
        shots: u32,
        /// Seed for reproducible sampling.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Run the circuit and estimate observables on the final state.
    Estimate {
        /// State-preparation circuit.
        circuit: Circuit,
        /// Observables to estimate.
        observables: Vec<Observable>,
        /// Shot budget used for the standard error; 0 means exact.
        shots: u32,
        /// Seed, accepted for symmetry with sampling.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}

impl JobRequest {
    /// A sampling request.
    pub fn sample(circuit: Circuit, shots: u32) -> Self {
        JobRequest::Sample {
            circuit,
            shots,
            seed: None,
        }
    }

    /// An estimation request.
    pub fn estimate(circuit: Circuit, observables: Vec<Observable>, shots: u32) -> Self {
        JobRequest::Estimate {
            circuit,
            observables,
            shots,
            seed: None,
        }
    }

    /// Fix the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, value: u64) -> Self {
        match &mut self {
            JobRequest::Sample { seed, .. } | JobRequest::Estimate { seed, .. } => {
                *seed = Some(value);
            }
        }
        self
    }

    /// The circuit to run.
    pub fn circuit(&self) -> &Circuit {
        match self {
            JobRequest::Sample { circuit, .. } | JobRequest::Estimate { circuit, .. } => circuit,
        }
    }

    /// Requested shots.
    pub fn shots(&self) -> u32 {
        match self {
            JobRequest::Sample { shots, .. } | JobRequest::Estimate { shots, .. } => *shots,
        }
    }

    /// Requested seed, if any.
    pub fn seed(&self) -> Option<u64> {
        match self {
            JobRequest::Sample { seed, .. } | JobRequest::Estimate { seed, .. } => *seed,
        }
    }

    /// Kind of job this request creates.
    pub fn kind(&self) -> JobKind {
        match self {
            JobRequest::Sample { .. } => JobKind::Sample,
            JobRequest::Estimate { .. } => JobKind::Estimate,
        }
    }
}
