//! GHZ State Demo
//!
//! Prepares (|0…0⟩ + |1…1⟩)/√2 on n qubits and samples it.

use anyhow::Result;
use clap::Parser;

use ketra_adapter_sim::Executor;
use ketra_demos::{init_logging, print_counts, print_header, print_result, print_section, print_success};
use ketra_ir::Circuit;

#[derive(Parser, Debug)]
#[command(name = "demo-ghz")]
#[command(about = "Sample an n-qubit GHZ state")]
struct Args {
    /// Number of qubits
    #[arg(short, long, default_value = "3")]
    qubits: u32,

    /// Number of shots
    #[arg(short, long, default_value = "1024")]
    shots: u32,

    /// Sampling seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    print_header(&format!("{}-qubit GHZ State", args.qubits));

    let circuit = Circuit::ghz(args.qubits)?;
    print_section("Circuit");
    print_result("Qubits", circuit.num_qubits());
    print_result("Operations", circuit.len());
    print_result("Depth", circuit.depth());

    let counts = Executor::default().run(&circuit, args.shots, args.seed)?;

    print_section("Counts");
    print_counts(&counts, 8);

    let width = args.qubits as usize;
    let zeros = "0".repeat(width);
    let ones = "1".repeat(width);
    if counts.get(&zeros) + counts.get(&ones) == counts.total() {
        print_success(&format!("Only {zeros} and {ones} observed"));
    }
    Ok(())
}
