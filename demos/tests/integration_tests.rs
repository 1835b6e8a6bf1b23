//! Integration tests for the demo algorithms.

use ketra_adapter_sim::Executor;
use ketra_demos::circuits::deutsch::{Oracle, deutsch_circuit, deutsch_probe, query_observable};
use ketra_demos::circuits::shor::{
    COUNTING_QUBITS, Factorization, find_factors, period_candidates, shor_circuit,
};
use ketra_demos::circuits::simon::{Secret, dot, observed_values, simon_circuit, solve_secret};
use ketra_demos::problems::{bell_probes, zz_chain, zz_chain_ground_energy};
use ketra_demos::runners::VqeRunner;
use ketra_ir::{Circuit, QubitId};

#[test]
fn test_deutsch_sampling() {
    let executor = Executor::default();
    for oracle in Oracle::ALL {
        let counts = executor
            .run(&deutsch_circuit(oracle).unwrap(), 1024, Some(5))
            .unwrap();
        assert_eq!(counts.get(oracle.expected_outcome()), 1024, "{oracle}");
    }
}

#[test]
fn test_deutsch_query_expectation() {
    let executor = Executor::default();
    let observable = [query_observable()];

    let constant = executor
        .estimate(&deutsch_probe(Oracle::Constant).unwrap(), &observable, 0, None)
        .unwrap();
    assert!((constant[0].value - 1.0).abs() < 1e-9);
    assert_eq!(constant[0].std_error, 0.0);

    let balanced = executor
        .estimate(&deutsch_probe(Oracle::Balanced).unwrap(), &observable, 0, None)
        .unwrap();
    assert!((balanced[0].value + 1.0).abs() < 1e-9);
}

#[test]
fn test_simon_outcomes_are_orthogonal() {
    for label in ["101", "110", "011", "1001"] {
        let secret: Secret = label.parse().unwrap();
        let counts = Executor::default()
            .run(&simon_circuit(secret).unwrap(), 512, Some(17))
            .unwrap();
        assert_eq!(counts.total(), 512);
        for y in observed_values(&counts) {
            assert_eq!(dot(y, secret.value()), 0, "secret {label}, y = {y:b}");
        }
    }
}

#[test]
fn test_simon_recovers_secret() {
    let secret: Secret = "101".parse().unwrap();
    let counts = Executor::default()
        .run(&simon_circuit(secret).unwrap(), 1024, Some(3))
        .unwrap();
    // Four orthogonal y values, each with probability 1/4.
    assert_eq!(counts.len(), 4);
    let ys = observed_values(&counts);
    assert_eq!(solve_secret(&ys, secret.width()), Some(secret.value()));
}

#[test]
fn test_shor_period_and_factors() {
    let counts = Executor::default()
        .run(&shor_circuit(7).unwrap(), 1000, Some(2024))
        .unwrap();

    // Peaks at multiples of 256 / 4.
    let allowed = ["00000000", "01000000", "10000000", "11000000"];
    assert!(counts.iter().all(|(bits, _)| allowed.contains(&bits.as_str())));
    assert_eq!(counts.len(), 4);

    let measured = counts
        .iter()
        .filter_map(|(bits, _)| u64::from_str_radix(bits, 2).ok());
    let periods = period_candidates(measured, COUNTING_QUBITS);
    assert_eq!(periods, vec![2, 4]);
    assert_eq!(
        find_factors(7, &periods),
        Some(Factorization {
            period: 4,
            factors: (3, 5)
        })
    );
}

#[test]
fn test_shor_other_bases() {
    // 4 and 11 have order 2 mod 15: peaks at 0 and 128 only.
    for a in [4, 11] {
        let counts = Executor::default()
            .run(&shor_circuit(a).unwrap(), 200, Some(9))
            .unwrap();
        for (bits, _) in counts.iter() {
            assert!(bits == "00000000" || bits == "10000000", "a = {a}: {bits}");
        }
    }
}

#[test]
fn test_bell_observables() {
    let mut circuit = Circuit::with_size("bell_state", 2, 0);
    circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
    let estimates = Executor::default()
        .estimate(&circuit, &bell_probes().unwrap(), 5000, None)
        .unwrap();
    let values: Vec<f64> = estimates.iter().map(|e| e.value).collect();
    let expected = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
    for (v, e) in values.iter().zip(expected) {
        assert!((v - e).abs() < 1e-9, "{values:?}");
    }
    // Single-qubit probes carry the full shot noise 1/√shots.
    assert!((estimates[0].std_error - (1.0 / 5000f64).sqrt()).abs() < 1e-12);
    assert!(estimates[4].std_error.abs() < 1e-6);
}

#[test]
fn test_vqe_energy_decreases() {
    let runner = VqeRunner::new(zz_chain(3, 1.0))
        .with_maxiter(150)
        .with_seed(7);
    let initial = runner.energy(&runner.initial_parameters()).unwrap();
    let result = runner.run().unwrap();

    assert!(result.optimal_energy <= initial);
    assert!(result.optimal_energy >= zz_chain_ground_energy(3, 1.0) - 1e-9);
    assert_eq!(result.optimal_params.len(), runner.num_parameters());
    assert_eq!(result.energy_history.first().copied(), Some(initial));
}
