//! Simulator configuration.

use serde::{Deserialize, Serialize};

/// Default register limit.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Widest register whose amplitude vector fits in the address space.
pub const MAX_ADDRESSABLE_QUBITS: u32 = usize::BITS - 6;

/// Default register width from which kernels run in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: u32 = 14;

/// Settings shared by the engine, executor and backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Largest register the engine will allocate.
    pub max_qubits: u32,
    /// Norm deviation tolerated before drift is reported.
    pub tolerance: f64,
    /// Lower multi-controlled gates and decomposed blocks before simulating.
    pub expand_controls: bool,
    /// Check the norm after every operation.
    pub check_norm: bool,
    /// Register width from which kernels run on the rayon pool.
    pub parallel_threshold: u32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            tolerance: ketra_ir::DEFAULT_TOLERANCE,
            expand_controls: true,
            check_norm: cfg!(debug_assertions),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SimulatorConfig {
    /// Set the register limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set the drift tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable expansion before simulation.
    #[must_use]
    pub fn with_expand_controls(mut self, expand: bool) -> Self {
        self.expand_controls = expand;
        self
    }

    /// Enable or disable per-operation norm checks.
    #[must_use]
    pub fn with_check_norm(mut self, check: bool) -> Self {
        self.check_norm = check;
        self
    }

    /// Set the parallel threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: u32) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Read settings from a backend's `extra` map, keeping defaults for
    /// missing or mistyped keys.
    pub fn from_extra(extra: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut config = Self::default();
        let get_u32 = |key: &str| {
            extra
                .get(key)
                .and_then(serde_json::Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
        };
        let get_bool = |key: &str| extra.get(key).and_then(serde_json::Value::as_bool);

        if let Some(v) = get_u32("max_qubits") {
            config.max_qubits = v;
        }
        if let Some(v) = extra.get("tolerance").and_then(serde_json::Value::as_f64) {
            config.tolerance = v;
        }
        if let Some(v) = get_bool("expand_controls") {
            config.expand_controls = v;
        }
        if let Some(v) = get_bool("check_norm") {
            config.check_norm = v;
        }
        if let Some(v) = get_u32("parallel_threshold") {
            config.parallel_threshold = v;
        }
        config
    }
}
