//! Error types for the simulator.

use thiserror::Error;

use ketra_hal::HalError;
use ketra_ir::IrError;
use ketra_synth::SynthError;

/// Errors raised while simulating, sampling or estimating.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Circuit width differs from the engine's register.
    #[error("Circuit has {got} qubits but the engine register has {expected}")]
    QubitOutOfRange {
        /// Register width of the engine.
        expected: u32,
        /// Width of the offending circuit.
        got: u32,
    },

    /// Register exceeds the configured limit.
    #[error("{requested} qubits requested, limit is {max}")]
    ResourceExhausted {
        /// Requested register width.
        requested: u32,
        /// Configured maximum.
        max: u32,
    },

    /// Shots requested from a circuit that binds no classical bit.
    #[error("Circuit has no measurement bindings to sample")]
    NoMeasurementBindings,

    /// Observable references qubits outside the register.
    #[error("Observable acts on {required} qubits but the state has {num_qubits}")]
    ObservableOutOfRange {
        /// Qubits the observable needs.
        required: u32,
        /// Qubits in the state.
        num_qubits: u32,
    },

    /// Amplitude vector cannot form a statevector.
    #[error("Invalid amplitudes: {0}")]
    InvalidAmplitudes(String),

    /// Control synthesis failed during expansion.
    #[error(transparent)]
    Synth(#[from] SynthError),

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

impl From<SimError> for HalError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::ResourceExhausted { .. } => HalError::CircuitTooLarge(err.to_string()),
            SimError::QubitOutOfRange { .. }
            | SimError::ObservableOutOfRange { .. }
            | SimError::NoMeasurementBindings
            | SimError::Ir(_) => HalError::InvalidCircuit(err.to_string()),
            _ => HalError::Backend(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_mapping() {
        let too_big = SimError::ResourceExhausted { requested: 30, max: 24 };
        assert!(matches!(HalError::from(too_big), HalError::CircuitTooLarge(_)));

        let width = SimError::QubitOutOfRange { expected: 3, got: 4 };
        assert!(matches!(HalError::from(width), HalError::InvalidCircuit(_)));
        assert!(matches!(
            HalError::from(SimError::NoMeasurementBindings),
            HalError::InvalidCircuit(_)
        ));

        let amps = SimError::InvalidAmplitudes("length 3".into());
        match HalError::from(amps) {
            HalError::Backend(msg) => assert_eq!(msg, "Invalid amplitudes: length 3"),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
