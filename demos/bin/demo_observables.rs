//! Observable Estimation Demo
//!
//! Exact Pauli expectation values on a Bell pair, with the shot-noise
//! standard error a sampling estimator would carry.

use anyhow::Result;
use clap::Parser;

use ketra_adapter_sim::Executor;
use ketra_demos::problems::{BELL_PROBES, bell_probes};
use ketra_demos::{init_logging, print_header, print_result, print_section};
use ketra_ir::{Circuit, QubitId};

#[derive(Parser, Debug)]
#[command(name = "demo-observables")]
#[command(about = "Estimate Pauli observables on a Bell pair")]
struct Args {
    /// Shots assumed for the standard error (0 for exact)
    #[arg(short, long, default_value = "5000")]
    shots: u32,

    /// Emit the estimates as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut circuit = Circuit::with_size("bell_state", 2, 0);
    circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;

    let observables = bell_probes()?;
    let estimates = Executor::default().estimate(&circuit, &observables, args.shots, None)?;

    if args.json {
        let report: Vec<_> = BELL_PROBES.iter().zip(&estimates).collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_header("Observables on a Bell Pair");
    print_section("Expectation values");
    for (label, estimate) in BELL_PROBES.iter().zip(&estimates) {
        print_result(
            label,
            format!("{:+.4} ± {:.4}", estimate.value, estimate.std_error),
        );
    }
    Ok(())
}
