//! Deutsch Algorithm Demo
//!
//! Classifies both oracles with a single query, by sampling and by the
//! exact ⟨Z⟩ of the query qubit.

use anyhow::Result;
use clap::Parser;

use ketra_adapter_sim::Executor;
use ketra_demos::circuits::deutsch::{Oracle, deutsch_circuit, deutsch_probe, query_observable};
use ketra_demos::{init_logging, print_header, print_result, print_section, print_success, print_warning};

#[derive(Parser, Debug)]
#[command(name = "demo-deutsch")]
#[command(about = "Decide constant vs. balanced with one oracle query")]
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

    print_header("Deutsch's Algorithm");

    let executor = Executor::default();
    for oracle in Oracle::ALL {
        print_section(&format!("{oracle} oracle"));

        let counts = executor.run(&deutsch_circuit(oracle)?, args.shots, args.seed)?;
        print_result("Counts", serde_json::to_string(&counts)?);

        let estimates = executor.estimate(
            &deutsch_probe(oracle)?,
            &[query_observable()],
            args.shots,
            args.seed,
        )?;
        if let Some(z) = estimates.first() {
            print_result("⟨Z₀⟩", format!("{:+.6}", z.value));
        }

        let expected = oracle.expected_outcome();
        if counts.get(expected) == counts.total() {
            print_success(&format!("Identified as {oracle}"));
        } else {
            print_warning(&format!("Expected every shot to read {expected}"));
        }
    }
    Ok(())
}
