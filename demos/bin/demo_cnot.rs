//! CNOT Demo
//!
//! X on both qubits, then CX(0 → 1): the target flips back to 0, so every
//! shot reads `01` (q1 = 0, q0 = 1).

use anyhow::Result;
use clap::Parser;

use ketra_adapter_sim::Executor;
use ketra_demos::{init_logging, print_counts, print_header, print_info, print_section};
use ketra_ir::{Circuit, QubitId};

#[derive(Parser, Debug)]
#[command(name = "demo-cnot")]
#[command(about = "Show the CNOT truth table entry for |11⟩")]
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

    print_header("CNOT on |11⟩");

    let mut circuit = Circuit::with_size("cnot", 2, 2);
    circuit
        .x(QubitId(0))?
        .x(QubitId(1))?
        .cx(QubitId(0), QubitId(1))?
        .measure_all()?;

    let counts = Executor::default().run(&circuit, args.shots, args.seed)?;

    print_section("Counts");
    print_counts(&counts, 4);
    print_info("Bit-strings list clbit 0 rightmost");
    Ok(())
}
