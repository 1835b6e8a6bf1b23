//! Simon's Algorithm Demo
//!
//! Samples `y` values orthogonal to a hidden XOR mask and recovers the mask
//! by elimination over GF(2).

use anyhow::Result;
use clap::Parser;

use ketra_adapter_sim::Executor;
use ketra_demos::circuits::simon::{Secret, dot, observed_values, simon_circuit, solve_secret};
use ketra_demos::{
    init_logging, print_counts, print_header, print_result, print_section, print_success,
    print_warning,
};

#[derive(Parser, Debug)]
#[command(name = "demo-simon")]
#[command(about = "Recover a hidden XOR mask with Simon's algorithm")]
struct Args {
    /// Secret bit-string (qubit 0 rightmost)
    #[arg(long, default_value = "101")]
    secret: Secret,

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
    let secret = args.secret;

    print_header("Simon's Algorithm");

    let circuit = simon_circuit(secret)?;
    print_section("Problem Setup");
    print_result("Secret", secret);
    print_result("Qubits", circuit.num_qubits());
    print_result("Operations", circuit.len());

    let counts = Executor::default().run(&circuit, args.shots, args.seed)?;

    print_section("Measured y values");
    print_counts(&counts, 1 << secret.width());

    let ys = observed_values(&counts);
    for &y in &ys {
        println!(
            "  y = {y:0width$b}   y·s mod 2 = {}",
            dot(y, secret.value()),
            width = secret.width() as usize
        );
    }

    print_section("Classical post-processing");
    match solve_secret(&ys, secret.width()) {
        Some(found) => {
            let found = Secret::new(found, secret.width())?;
            print_result("Recovered secret", found);
            if found == secret {
                print_success("Secret recovered");
            } else {
                print_warning("Recovered mask differs from the secret");
            }
        }
        None => print_warning("Measurements do not determine a unique non-zero mask"),
    }
    Ok(())
}
