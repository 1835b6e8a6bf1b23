//! Ketra Demo Suite
//!
//! Algorithm drivers built on the Ketra circuit model and the local
//! statevector simulator:
//!
//! - **Deutsch**: constant vs. balanced oracle in a single query
//! - **Grover's Search**: phase oracle plus diffusion at the optimal
//!   iteration count
//! - **Simon**: hidden XOR mask recovered by Gaussian elimination over GF(2)
//! - **Shor (N = 15)**: controlled modular multiplication and period recovery
//! - **Variational loop**: hardware-efficient ansatz minimised against a
//!   nearest-neighbour ZZ chain
//!
//! ```no_run
//! use ketra_adapter_sim::Executor;
//! use ketra_demos::circuits::deutsch::{Oracle, deutsch_circuit};
//!
//! let circuit = deutsch_circuit(Oracle::Balanced).unwrap();
//! let counts = Executor::default().run(&circuit, 1024, Some(7)).unwrap();
//! assert_eq!(counts.get("1"), 1024);
//! ```

pub mod circuits;
pub mod error;
pub mod optimizers;
pub mod problems;
pub mod runners;

pub use error::{DemoError, DemoResult};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use ketra_hal::Counts;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber used by every demo binary.
///
/// `verbose` forces `debug`; otherwise `RUST_LOG` applies, falling back
/// to `info`.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Create a progress bar for demo operations.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(template) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(template.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print counts as a histogram, most frequent first.
pub fn print_counts(counts: &Counts, limit: usize) {
    let total = counts.total().max(1);
    for (bits, count) in counts.top_k(limit) {
        let fraction = count as f64 / total as f64;
        let bar = "█".repeat((fraction * 40.0).round() as usize);
        println!(
            "  {} {:>6} {:>6.2}% {}",
            style(bits).bold(),
            count,
            fraction * 100.0,
            style(bar).cyan()
        );
    }
}
