//! Bell State Demo
//!
//! Prepares (|00⟩ + |11⟩)/√2 and samples it.

use anyhow::Result;
use clap::Parser;

use ketra_adapter_sim::Executor;
use ketra_demos::{init_logging, print_counts, print_header, print_result, print_section, print_success};
use ketra_ir::Circuit;

#[derive(Parser, Debug)]
#[command(name = "demo-bell")]
#[command(about = "Sample a Bell pair")]
struct Args {
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

    print_header("Bell State");

    let circuit = Circuit::bell()?;
    print_section("Circuit");
    print_result("Qubits", circuit.num_qubits());
    print_result("Operations", circuit.len());
    print_result("Depth", circuit.depth());

    let counts = Executor::default().run(&circuit, args.shots, args.seed)?;

    print_section("Counts");
    print_counts(&counts, 4);

    let correlated = counts.get("00") + counts.get("11");
    print_result("Correlated outcomes", format!("{correlated}/{}", counts.total()));
    if correlated == counts.total() {
        print_success("Only 00 and 11 observed");
    }
    Ok(())
}
