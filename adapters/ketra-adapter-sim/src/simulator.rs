//! Simulator backend implementation.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use ketra_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, ExecutionResult,
    HalError, HalResult, Job, JobId, JobOutput, JobRequest, JobStatus, ValidationResult,
};
use ketra_ir::Circuit;

use crate::config::{MAX_ADDRESSABLE_QUBITS, SimulatorConfig};
use crate::error::SimResult;
use crate::executor::Executor;

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Jobs run to completion inside `submit`; the job table only records their
/// outcome for the status and result calls.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Execution facade shared by every job.
    executor: Executor,
    /// Active jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    /// Create a simulator with a custom register limit.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::with_config(SimulatorConfig::default().with_max_qubits(max_qubits))
    }

    /// Create a simulator from engine settings.
    pub fn with_config(sim_config: SimulatorConfig) -> Self {
        Self::build(BackendConfig::new("simulator"), sim_config)
    }

    fn build(config: BackendConfig, sim_config: SimulatorConfig) -> Self {
        let mut capabilities = Capabilities::simulator(sim_config.max_qubits);
        capabilities.name.clone_from(&config.name);
        Self {
            config,
            capabilities,
            executor: Executor::new(sim_config),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Engine settings in use.
    pub fn simulator_config(&self) -> &SimulatorConfig {
        self.executor.config()
    }

    /// Run a request synchronously.
    #[instrument(skip(self, request), fields(kind = ?request.kind(), shots = request.shots()))]
    fn run_request(&self, request: &JobRequest) -> SimResult<ExecutionResult> {
        let start = Instant::now();

        let output = match request {
            JobRequest::Sample {
                circuit,
                shots,
                seed,
            } => JobOutput::Counts(self.executor.run(circuit, *shots, *seed)?),
            JobRequest::Estimate {
                circuit,
                observables,
                shots,
                seed,
            } => JobOutput::Estimates(self.executor.estimate(circuit, observables, *shots, *seed)?),
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(ExecutionResult::new(output, request.shots())
            .with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)))
    }

    fn with_jobs<T>(&self, f: impl FnOnce(&mut FxHashMap<String, SimJob>) -> T) -> T {
        let mut jobs = self
            .jobs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut jobs)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let max = self.capabilities.num_qubits;
        if circuit.num_qubits() > max {
            return Ok(ValidationResult::Invalid {
                reasons: vec![format!(
                    "Circuit has {} qubits but simulator only supports {max}",
                    circuit.num_qubits()
                )],
            });
        }
        Ok(ValidationResult::Valid)
    }

    #[instrument(skip(self, request))]
    async fn submit(&self, request: &JobRequest) -> HalResult<JobId> {
        let circuit = request.circuit();
        if circuit.num_qubits() > self.capabilities.num_qubits {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        if request.shots() > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{} shots requested, limit is {}",
                request.shots(),
                self.capabilities.max_shots
            )));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), request.kind(), request.shots())
            .with_backend(self.config.name.clone());
        self.with_jobs(|jobs| {
            jobs.insert(job_id.0.clone(), SimJob { job, result: None });
        });
        debug!("Submitted job: {}", job_id);

        self.with_jobs(|jobs| {
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                sim_job.job.transition(JobStatus::Running);
            }
        });

        let outcome = self.run_request(request);

        self.with_jobs(|jobs| {
            if let Some(sim_job) = jobs.get_mut(&job_id.0) {
                match outcome {
                    Ok(result) => {
                        if sim_job.job.transition(JobStatus::Completed) {
                            sim_job.result = Some(result);
                        }
                    }
                    Err(err) => {
                        debug!(job_id = %job_id, error = %err, "job failed");
                        sim_job.job.transition(JobStatus::Failed(err.to_string()));
                    }
                }
            }
        });

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.with_jobs(|jobs| {
            jobs.get(&job_id.0)
                .map(|j| j.job.status.clone())
                .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
        })
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.with_jobs(|jobs| {
            let sim_job = jobs
                .get(&job_id.0)
                .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
            match (&sim_job.job.status, &sim_job.result) {
                (JobStatus::Completed, Some(result)) => Ok(result.clone()),
                (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
                (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
                _ => Err(HalError::ResultNotReady(job_id.0.clone())),
            }
        })
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        self.with_jobs(|jobs| match jobs.get_mut(&job_id.0) {
            Some(sim_job) => {
                sim_job.job.transition(JobStatus::Cancelled);
                Ok(())
            }
            None => Err(HalError::JobNotFound(job_id.0.clone())),
        })
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let sim_config = SimulatorConfig::from_extra(&config.extra);
        if sim_config.max_qubits == 0 {
            return Err(HalError::Configuration(
                "max_qubits must be at least 1".into(),
            ));
        }
        if sim_config.max_qubits > MAX_ADDRESSABLE_QUBITS {
            return Err(HalError::Configuration(format!(
                "max_qubits {} exceeds the addressable limit of {MAX_ADDRESSABLE_QUBITS}",
                sim_config.max_qubits
            )));
        }
        Ok(Self::build(config, sim_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ketra_ir::Observable;

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 24);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new();

        let request = JobRequest::sample(Circuit::bell().unwrap(), 1000).with_seed(11);
        let job_id = backend.submit(&request).await.unwrap();

        let status = backend.status(&job_id).await.unwrap();
        assert!(status.is_success());

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);

        let counts = result.counts().unwrap();
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_simulator_estimation_job() {
        let backend = SimulatorBackend::new();
        let observables = vec![
            Observable::from_label("ZZ").unwrap(),
            Observable::from_label("XX").unwrap(),
        ];
        let request = JobRequest::estimate(Circuit::bell().unwrap(), observables, 0);
        let job_id = backend.submit(&request).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();
        let estimates = result.estimates().unwrap();
        assert_eq!(estimates.len(), 2);
        assert!((estimates[0].value - 1.0).abs() < 1e-9);
        assert!((estimates[1].value - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = Circuit::with_size("test", 10, 0);
        assert!(!backend.validate(&circuit).await.unwrap().is_valid());
        let result = backend.submit(&JobRequest::sample(circuit, 100)).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_runtime_error_fails_job() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::with_size("unmeasured", 1, 0);
        let job_id = backend.submit(&JobRequest::sample(circuit, 10)).await.unwrap();

        assert!(matches!(
            backend.status(&job_id).await.unwrap(),
            JobStatus::Failed(_)
        ));
        assert!(matches!(
            backend.wait(&job_id).await,
            Err(HalError::JobFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_after_completion_is_noop() {
        let backend = SimulatorBackend::new();
        let request = JobRequest::sample(Circuit::ghz(3).unwrap(), 10).with_seed(1);
        let job_id = backend.submit(&request).await.unwrap();
        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);

        let missing = JobId::new("missing");
        assert!(matches!(
            backend.cancel(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[test]
    fn test_from_config_reads_extra() {
        let config = BackendConfig::new("local")
            .with_extra("max_qubits", serde_json::json!(6))
            .with_extra("expand_controls", serde_json::json!(false));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.capabilities().num_qubits, 6);
        assert!(!backend.simulator_config().expand_controls);

        let bad = BackendConfig::new("zero").with_extra("max_qubits", serde_json::json!(0));
        assert!(matches!(
            SimulatorBackend::from_config(bad),
            Err(HalError::Configuration(_))
        ));

        for width in [64, MAX_ADDRESSABLE_QUBITS + 1] {
            let wide = BackendConfig::new("wide").with_extra("max_qubits", serde_json::json!(width));
            assert!(matches!(
                SimulatorBackend::from_config(wide),
                Err(HalError::Configuration(_))
            ));
        }
    }
}
