//! Backend trait and configuration.
//!
//! The [`Backend`] trait covers one job lifecycle:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! `capabilities()` is synchronous and infallible. Everything that touches a
//! job is async so that remote backends can be added without changing
//! callers.
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `availability()` | async | yes | `HalResult<BackendAvailability>` |
//! | `validate()` | async | yes | `HalResult<ValidationResult>` |
//! | `submit()` | async | yes | `HalResult<JobId>` |
//! | `status()` | async | yes | `HalResult<JobStatus>` |
//! | `result()` | async | yes | `HalResult<ExecutionResult>` |
//! | `cancel()` | async | yes | `HalResult<()>` |
//! | `wait()` | async | provided | `HalResult<ExecutionResult>` |

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use ketra_ir::Circuit;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::request::JobRequest;
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Authentication token, never serialized.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Backend-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the authentication token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("token", &"[REDACTED]")
            .field("extra", &self.extra)
            .finish()
    }
}

/// Polling schedule used by [`Backend::wait_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Give up after this long.
    pub timeout: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Trait for execution backends.
///
/// # Contract
///
/// - `capabilities()` is cached at construction time.
/// - `submit()` returns a [`JobId`] whose first observed status is
///   `Queued`, `Running` or already terminal; statuses only move forward.
/// - `result()` fails with [`HalError::ResultNotReady`] until the job has
///   completed.
/// - `wait()` polls every 500ms for up to five minutes.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check backend availability with queue depth information.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Validate a circuit against backend constraints.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Submit a sampling or estimation request.
    async fn submit(&self, request: &JobRequest) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a job. Cancelling a terminal job is a no-op.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Wait for a job with the default polling schedule.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.wait_with(job_id, WaitOptions::default()).await
    }

    /// Wait for a job to reach a terminal state and return its result.
    async fn wait_with(
        &self,
        job_id: &JobId,
        options: WaitOptions,
    ) -> HalResult<ExecutionResult> {
        let started = tokio::time::Instant::now();

        loop {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    if started.elapsed() >= options.timeout {
                        return Err(HalError::Timeout(job_id.0.clone()));
                    }
                    debug!(job_id = %job_id, "job pending, polling again");
                    tokio::time::sleep(options.poll_interval).await;
                }
            }
        }
    }
}

/// Backend availability information.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend is currently accepting jobs.
    pub is_available: bool,
    /// Number of jobs currently in queue (if known).
    pub queue_depth: Option<u32>,
    /// Estimated wait time for a new job (if known).
    pub estimated_wait: Option<Duration>,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Availability of a local backend: zero queue, zero wait.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            estimated_wait: Some(Duration::ZERO),
            status_message: None,
        }
    }

    /// Availability of an offline backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            estimated_wait: None,
            status_message: Some(reason.into()),
        }
    }
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Circuit can be submitted as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
    /// Circuit could run after expansion to primitive operations.
    RequiresExpansion {
        /// What needs expanding.
        details: String,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid (can be submitted as-is).
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::result::{Counts, JobOutput};

    /// Reports `Running` for a fixed number of polls, then `Completed`.
    struct SlowBackend {
        caps: Capabilities,
        polls_left: AtomicU32,
    }

    impl SlowBackend {
        fn new(polls: u32) -> Self {
            Self {
                caps: Capabilities::simulator(2),
                polls_left: AtomicU32::new(polls),
            }
        }
    }

    #[async_trait]
    impl Backend for SlowBackend {
        fn name(&self) -> &str {
            "slow"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        async fn availability(&self) -> HalResult<BackendAvailability> {
            Ok(BackendAvailability::always_available())
        }

        async fn validate(&self, _circuit: &Circuit) -> HalResult<ValidationResult> {
            Ok(ValidationResult::Valid)
        }

        async fn submit(&self, _request: &JobRequest) -> HalResult<JobId> {
            Ok(JobId::new("slow-1"))
        }

        async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
            let left = self.polls_left.load(Ordering::SeqCst);
            if left == 0 {
                return Ok(JobStatus::Completed);
            }
            self.polls_left.store(left - 1, Ordering::SeqCst);
            Ok(JobStatus::Running)
        }

        async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
            let mut counts = Counts::new();
            counts.insert("00", 10);
            Ok(ExecutionResult::new(JobOutput::Counts(counts), 10))
        }

        async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("test")
            .with_token("secret-token")
            .with_extra("max_qubits", serde_json::json!(20));

        assert_eq!(config.name, "test");
        assert_eq!(config.token, Some("secret-token".to_string()));
        assert!(config.extra.contains_key("max_qubits"));
        assert!(!format!("{config:?}").contains("secret-token"));
    }

    #[test]
    fn test_backend_availability() {
        let avail = BackendAvailability::always_available();
        assert!(avail.is_available);
        assert_eq!(avail.queue_depth, Some(0));

        let avail = BackendAvailability::unavailable("maintenance");
        assert!(!avail.is_available);
        assert_eq!(avail.status_message, Some("maintenance".to_string()));
    }

    #[test]
    fn test_validation_result_is_valid() {
        assert!(ValidationResult::Valid.is_valid());
        assert!(!ValidationResult::Invalid { reasons: vec![] }.is_valid());
        assert!(
            !ValidationResult::RequiresExpansion {
                details: String::new()
            }
            .is_valid()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_polls_until_complete() {
        let backend = SlowBackend::new(3);
        let id = JobId::new("slow-1");
        let result = backend.wait(&id).await.unwrap();
        assert_eq!(result.counts().map(Counts::total), Some(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out() {
        let backend = SlowBackend::new(u32::MAX);
        let options = WaitOptions {
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_millis(50),
        };
        let err = backend
            .wait_with(&JobId::new("slow-1"), options)
            .await
            .unwrap_err();
        assert!(matches!(err, HalError::Timeout(_)));
    }
}
