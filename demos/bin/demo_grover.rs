//! Grover's Search Demo
//!
//! Amplifies one or more marked basis states with a phase oracle and the
//! diffusion operator.

use anyhow::{Result, bail};
use clap::Parser;

use ketra_adapter_sim::Executor;
use ketra_demos::{
    init_logging, print_counts, print_header, print_info, print_result, print_section,
    print_success, print_warning,
};
use ketra_ir::export::{ExportConfig, to_json};
use ketra_synth::{GroverOptions, expand, grover_circuit, optimal_iterations, phase_oracle};

#[derive(Parser, Debug)]
#[command(name = "demo-grover")]
#[command(about = "Demonstrate Grover's search algorithm")]
struct Args {
    /// Marked bit-strings (qubit 0 rightmost), all of the same width
    #[arg(short, long, default_value = "1101", value_delimiter = ',')]
    marked: Vec<String>,

    /// Grover iterations (optimal count when omitted)
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Number of shots
    #[arg(short, long, default_value = "1024")]
    shots: u32,

    /// Number of outcomes to list
    #[arg(short, long, default_value = "5")]
    top: usize,

    /// Sampling seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the expanded circuit as JSON instead of running it
    #[arg(long)]
    export: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(first) = args.marked.first() else {
        bail!("at least one marked state is required");
    };
    let num_qubits = u32::try_from(first.len())?;
    let mut marked = Vec::with_capacity(args.marked.len());
    for label in &args.marked {
        if label.len() != first.len() {
            bail!("marked states must share one width: '{label}' vs '{first}'");
        }
        marked.push(usize::from_str_radix(label, 2)?);
    }

    let iterations = args
        .iterations
        .unwrap_or_else(|| optimal_iterations(num_qubits, marked.len()));

    let oracle = phase_oracle(num_qubits, &marked)?;
    let circuit = grover_circuit(&oracle, iterations, GroverOptions::default())?;

    if args.export {
        println!("{}", to_json(&expand(&circuit)?, &ExportConfig::default())?);
        return Ok(());
    }

    print_header("Grover's Search Algorithm");

    print_section("Problem Setup");
    print_result("Qubits", num_qubits);
    print_result("Search space", 1u64 << num_qubits);
    print_result("Marked", args.marked.join(", "));
    print_result("Iterations", iterations);

    print_section("Circuit");
    print_result("Operations", circuit.len());
    print_result("Depth", circuit.depth());

    let counts = Executor::default().run(&circuit, args.shots, args.seed)?;

    print_section(&format!("Top {} outcomes", args.top));
    print_counts(&counts, args.top);

    let hits: u64 = args.marked.iter().map(|m| counts.get(m)).sum();
    let rate = hits as f64 / counts.total().max(1) as f64;
    print_result("Success rate", format!("{:.1}%", rate * 100.0));

    match counts.most_frequent() {
        Some((bits, _)) if args.marked.contains(bits) => {
            print_success(&format!("Most frequent outcome {bits} is marked"));
        }
        Some((bits, _)) => print_warning(&format!("Most frequent outcome {bits} is not marked")),
        None => print_info("No shots taken"),
    }
    Ok(())
}
