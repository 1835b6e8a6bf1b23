//! Property-based tests for the statevector engine.

use num_complex::Complex64;
use proptest::prelude::*;

use ketra_adapter_sim::{Engine, SimulatorConfig, Statevector};
use ketra_ir::{Circuit, QubitId, Unitary2x2};
use ketra_synth::{inverse_qft, qft};

#[derive(Debug, Clone)]
enum Op {
    H(u32),
    Sx(u32),
    Ry(f64, u32),
    U(f64, f64, f64, u32),
    Cx(u32, u32),
    Cp(f64, u32, u32),
    Swap(u32, u32),
    Mcx(u32),
}

impl Op {
    fn apply(self, circuit: &mut Circuit) {
        let n = circuit.num_qubits();
        // Operand clashes are rejected by the builder and skipped.
        let _ = match self {
            Op::H(q) => circuit.h(QubitId(q)),
            Op::Sx(q) => circuit.sx(QubitId(q)),
            Op::Ry(a, q) => circuit.ry(a, QubitId(q)),
            Op::U(t, p, l, q) => circuit.u(t, p, l, QubitId(q)),
            Op::Cx(c, t) => circuit.cx(QubitId(c), QubitId(t)),
            Op::Cp(l, c, t) => circuit.cp(l, QubitId(c), QubitId(t)),
            Op::Swap(a, b) => circuit.swap(QubitId(a), QubitId(b)),
            Op::Mcx(t) => {
                let controls: Vec<QubitId> = (0..n).filter(|&q| q != t).map(QubitId).collect();
                circuit.mcx(&controls, QubitId(t))
            }
        };
    }
}

fn arb_op(n: u32) -> impl Strategy<Value = Op> {
    let angle = -std::f64::consts::PI..std::f64::consts::PI;
    prop_oneof![
        (0..n).prop_map(Op::H),
        (0..n).prop_map(Op::Sx),
        (angle.clone(), 0..n).prop_map(|(a, q)| Op::Ry(a, q)),
        (angle.clone(), angle.clone(), angle.clone(), 0..n)
            .prop_map(|(t, p, l, q)| Op::U(t, p, l, q)),
        (0..n, 0..n).prop_map(|(c, t)| Op::Cx(c, t)),
        (angle, 0..n, 0..n).prop_map(|(l, c, t)| Op::Cp(l, c, t)),
        (0..n, 0..n).prop_map(|(a, b)| Op::Swap(a, b)),
        (0..n).prop_map(Op::Mcx),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=6).prop_flat_map(|n| {
        prop::collection::vec(arb_op(n), 1..=30).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", n, 0);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

fn arb_state() -> impl Strategy<Value = Statevector> {
    (1_u32..=5).prop_flat_map(|n| {
        prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1usize << n).prop_filter_map(
            "non-zero state",
            |pairs| {
                let amps: Vec<Complex64> =
                    pairs.into_iter().map(|(re, im)| Complex64::new(re, im)).collect();
                let norm = amps.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
                if norm <= 1e-3 {
                    return None;
                }
                Statevector::from_amplitudes(amps.into_iter().map(|a| a / norm).collect()).ok()
            },
        )
    })
}

proptest! {
    #[test]
    fn every_operation_preserves_the_norm(circuit in arb_circuit()) {
        let config = SimulatorConfig::default().with_check_norm(true);
        let report = Engine::new(config, circuit.num_qubits()).unwrap().run(&circuit).unwrap();
        prop_assert!(report.drift.is_empty(), "drift: {:?}", report.drift);
        prop_assert!((report.statevector.norm_sqr() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn circuit_then_inverse_restores_the_state(circuit in arb_circuit()) {
        let mut round_trip = circuit.clone();
        round_trip.compose(&circuit.inverse()).unwrap();
        let engine = Engine::new(SimulatorConfig::default(), circuit.num_qubits()).unwrap();
        let out = engine.run(&round_trip).unwrap().statevector;
        prop_assert!((out.amplitudes()[0] - Complex64::new(1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn qft_round_trip_on_arbitrary_states(state in arb_state()) {
        let n = state.num_qubits();
        let mut circuit = qft(n).unwrap();
        circuit.compose(&inverse_qft(n).unwrap()).unwrap();
        let engine = Engine::new(SimulatorConfig::default(), n).unwrap();
        let out = engine.run_from(state.clone(), &circuit).unwrap().statevector;
        for (a, b) in out.amplitudes().iter().zip(state.amplitudes()) {
            prop_assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn single_qubit_kernel_matches_dense_kernel(
        state in arb_state(),
        theta in -3.0f64..3.0,
        phi in -3.0f64..3.0,
        lambda in -3.0f64..3.0,
    ) {
        let u = Unitary2x2::u(theta, phi, lambda);
        let q = QubitId(state.num_qubits() - 1);
        let mut a = state.clone();
        let mut b = state;
        a.apply_single(q, &u, 0);
        b.apply_matrix(&[q], &u.data, 0);
        for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
            prop_assert!((x - y).norm() < 1e-12);
        }
    }
}
