//! VQE (Variational Quantum Eigensolver) Demo
//!
//! Minimises a nearest-neighbour ZZ chain with a hardware-efficient ansatz.
//! Optionally re-evaluates the optimum as an estimation job on the
//! simulator backend.

use anyhow::{Context, Result};
use clap::Parser;

use ketra_adapter_sim::SimulatorBackend;
use ketra_demos::problems::{zz_chain, zz_chain_ground_energy};
use ketra_demos::runners::{VqeResult, VqeRunner};
use ketra_demos::{
    create_progress_bar, init_logging, print_header, print_info, print_result, print_section,
    print_success,
};
use ketra_hal::{Backend, JobRequest};
use ketra_ir::{Circuit, Observable};

#[derive(Parser, Debug)]
#[command(name = "demo-vqe")]
#[command(about = "Demonstrate VQE on a ZZ chain")]
struct Args {
    /// Chain length
    #[arg(short, long, default_value = "4")]
    qubits: u32,

    /// Coupling constant J
    #[arg(short = 'j', long, default_value = "1.0")]
    coupling: f64,

    /// Number of ansatz repetitions
    #[arg(short, long, default_value = "1")]
    reps: usize,

    /// Maximum optimization iterations
    #[arg(short, long, default_value = "200")]
    iterations: usize,

    /// Shots assumed per energy evaluation
    #[arg(short, long, default_value = "1000")]
    shots: u32,

    /// Seed for the initial parameters
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Re-evaluate the optimum through the simulator backend
    #[arg(long)]
    backend: bool,

    /// Emit the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let hamiltonian = zz_chain(args.qubits, args.coupling);
    let exact = zz_chain_ground_energy(args.qubits, args.coupling);

    let runner = VqeRunner::new(hamiltonian.clone())
        .with_reps(args.reps)
        .with_shots(args.shots)
        .with_maxiter(args.iterations)
        .with_seed(args.seed);

    if args.json {
        let result = runner.run()?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_header("VQE on a ZZ Chain");

    print_section("Problem Setup");
    print_result("Qubits", args.qubits);
    print_result("Hamiltonian terms", hamiltonian.n_terms());
    print_result("Coupling J", args.coupling);
    print_result("Ansatz repetitions", args.reps);
    print_result("Parameters", runner.num_parameters());
    print_result("Exact ground state", format!("{exact:.4}"));

    print_section("Running VQE Optimization");
    let pb = create_progress_bar(args.iterations as u64, "Optimizing...");
    let result = runner.run()?;
    pb.finish_with_message("Optimization complete");

    print_section("Results");
    print_result("Optimal energy", format!("{:.6}", result.optimal_energy));
    print_result("Iterations", result.iterations);
    print_result("Circuit evaluations", result.circuit_evaluations);
    print_result("Converged", if result.converged { "Yes" } else { "No" });
    print_result(
        "Absolute error",
        format!("{:.6}", (result.optimal_energy - exact).abs()),
    );

    print_section("Energy Convergence");
    print_history(&result);

    if args.backend {
        print_section("Backend verification");
        let circuit = runner.circuit(&result.optimal_params)?;
        let runtime = tokio::runtime::Runtime::new()?;
        let (value, std_error) =
            runtime.block_on(estimate_on_backend(circuit, hamiltonian, args.shots))?;
        print_result("Backend energy", format!("{value:.6} ± {std_error:.4}"));
        if (value - result.optimal_energy).abs() < 1e-9 {
            print_success("Backend agrees with the optimizer");
        }
    } else {
        print_info("Pass --backend to re-run the optimum as an estimation job");
    }
    Ok(())
}

fn print_history(result: &VqeResult) {
    let history = &result.energy_history;
    let show_points = 10.min(history.len()).max(1);
    let step = (history.len() / show_points).max(1);
    for (i, chunk) in history.chunks(step).enumerate().take(show_points) {
        if let Some(&energy) = chunk.first() {
            println!("  Improvement {:3}: {:.6}", i * step, energy);
        }
    }
}

async fn estimate_on_backend(
    circuit: Circuit,
    hamiltonian: Observable,
    shots: u32,
) -> Result<(f64, f64)> {
    let backend = SimulatorBackend::new();
    let request = JobRequest::estimate(circuit, vec![hamiltonian], shots);
    let job_id = backend.submit(&request).await?;
    let result = backend.wait(&job_id).await?;
    let estimate = result
        .estimates()
        .and_then(|e| e.first())
        .context("backend returned no estimate")?;
    Ok((estimate.value, estimate.std_error))
}
