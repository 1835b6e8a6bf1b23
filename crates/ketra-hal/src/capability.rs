//! Backend capabilities.

use serde::{Deserialize, Serialize};

/// What a backend can run.
///
/// Capabilities are fixed at construction time and reported synchronously.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Maximum register width.
    pub num_qubits: u32,
    /// Gate names accepted without further expansion.
    pub gate_set: Vec<String>,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Capability flags such as `"statevector"` or `"estimation"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: [
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "sxdg", "rx", "ry", "rz",
                "p", "u", "unitary", "cx", "cz", "cp", "cu", "swap", "mcx", "barrier",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_shots: 1_000_000,
            is_simulator: true,
            features: vec![
                "statevector".into(),
                "estimation".into(),
                "custom_blocks".into(),
            ],
        }
    }

    /// Check if a feature flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Check if a gate name is accepted.
    pub fn supports_gate(&self, gate: &str) -> bool {
        self.gate_set.iter().any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(24);
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 24);
        assert!(caps.supports_gate("mcx"));
        assert!(!caps.supports_gate("iswap"));
        assert!(caps.has_feature("estimation"));
    }
}
