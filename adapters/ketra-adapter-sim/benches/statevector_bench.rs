//! Benchmarks for the statevector engine
//!
//! Run with: cargo bench -p ketra-adapter-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use ketra_adapter_sim::{Engine, Executor, SimulatorConfig, Statevector};
use ketra_ir::{Circuit, QubitId, Unitary2x2, Unitary4x4};
use ketra_synth::qft;

/// Benchmark the single-qubit kernel, serial and parallel.
fn bench_single_qubit_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit_kernel");
    let h = Unitary2x2::h();

    for &n in &[10u32, 16, 20] {
        for (label, threshold) in [("serial", u32::MAX), ("parallel", 0)] {
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, &n| {
                let mut sv = Statevector::new(n).with_parallel_threshold(threshold);
                b.iter(|| sv.apply_single(black_box(QubitId(n / 2)), &h, 0));
            });
        }
    }

    group.finish();
}

/// Benchmark two-qubit and controlled updates.
fn bench_two_qubit_kernel(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_qubit_kernel");
    let cp = Unitary4x4::cp(0.3);

    for &n in &[10u32, 16] {
        group.bench_with_input(BenchmarkId::new("cp", n), &n, |b, &n| {
            let mut sv = Statevector::new(n);
            b.iter(|| sv.apply_two(black_box(QubitId(0)), black_box(QubitId(n - 1)), &cp, 0));
        });
        group.bench_with_input(BenchmarkId::new("mcx_mask", n), &n, |b, &n| {
            let mut sv = Statevector::new(n);
            let mask = (1usize << (n - 1)) - 1;
            b.iter(|| sv.apply_single(QubitId(n - 1), &Unitary2x2::x(), black_box(mask)));
        });
    }

    group.finish();
}

/// Benchmark whole-circuit runs.
fn bench_circuits(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuits");

    for &n in &[8u32, 12, 16] {
        group.bench_with_input(BenchmarkId::new("qft", n), &n, |b, &n| {
            let circuit = qft(n).unwrap();
            let engine = Engine::new(SimulatorConfig::default().with_check_norm(false), n).unwrap();
            b.iter(|| engine.run(black_box(&circuit)).unwrap());
        });
    }

    group.bench_function("ghz_10_sample_1000", |b| {
        let circuit = Circuit::ghz(10).unwrap();
        let executor = Executor::new(SimulatorConfig::default().with_check_norm(false));
        b.iter(|| executor.run(black_box(&circuit), 1000, Some(1)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_qubit_kernel,
    bench_two_qubit_kernel,
    bench_circuits
);
criterion_main!(benches);
