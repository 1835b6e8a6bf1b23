//! Shor's Algorithm Demo (N = 15)
//!
//! Estimates the period of `a^x mod 15` with an 8-qubit counting register,
//! then derives factors classically.

use anyhow::Result;
use clap::Parser;

use ketra_adapter_sim::Executor;
use ketra_demos::circuits::shor::{
    COUNTING_QUBITS, MODULUS, find_factors, gcd, period_candidates, shor_circuit,
};
use ketra_demos::{
    init_logging, print_counts, print_header, print_info, print_result, print_section,
    print_success, print_warning,
};

#[derive(Parser, Debug)]
#[command(name = "demo-shor")]
#[command(about = "Factor 15 by quantum period finding")]
struct Args {
    /// Base a, coprime to 15 (2, 4, 7, 8, 11 or 13)
    #[arg(short, long, default_value = "7")]
    base: u64,

    /// Number of shots
    #[arg(short, long, default_value = "1000")]
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
    let a = args.base;

    print_header("Shor's Algorithm (N = 15)");

    print_section("Classical pre-processing");
    print_result("N", MODULUS);
    print_result("a", a);
    let common = gcd(a, MODULUS);
    if common != 1 {
        print_success(&format!("gcd({a}, {MODULUS}) = {common} is already a factor"));
        return Ok(());
    }

    let circuit = shor_circuit(a)?;
    print_section("Circuit");
    print_result("Qubits", circuit.num_qubits());
    print_result("Operations", circuit.len());

    let counts = Executor::default().run(&circuit, args.shots, args.seed)?;
    print_section("Measurement results");
    print_counts(&counts, 8);

    let measured = counts
        .iter()
        .filter_map(|(bits, _)| u64::from_str_radix(bits, 2).ok());
    let periods = period_candidates(measured, COUNTING_QUBITS);

    print_section("Classical post-processing");
    print_result("Candidate periods", format!("{periods:?}"));
    match find_factors(a, &periods) {
        Some(found) => {
            let (f1, f2) = found.factors;
            print_result("Period", found.period);
            print_success(&format!("{MODULUS} = {f1} × {f2}"));
        }
        None => {
            print_warning("No candidate period produced non-trivial factors");
            print_info("The algorithm is probabilistic; rerun with another seed");
        }
    }
    Ok(())
}
