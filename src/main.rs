//! Verification and benchmark runner for the matmul kernels.
//!
//! ```bash
//! # Check one kernel on the identity × pattern product
//! mmblock verify 1000
//! mmblock verify --kernel hierarchical --padding identity --reps 5 257
//!
//! # Time every kernel
//! mmblock bench --sizes 256,512,1024
//! ```

use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use mmblock::verify::Problem;
use mmblock::{Kernel, Padding};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mmblock")]
#[command(about = "Verify and benchmark square dense matmul kernels")]
#[command(version)]
struct Args {
    /// Row padding mode; defaults to the mode this binary was built with
    #[arg(long, global = true, value_enum, env = "MMBLOCK_PADDING")]
    padding: Option<Padding>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Multiply the identity by a known pattern and check the product
    Verify {
        /// Matrix order
        n: usize,

        /// Kernel under test
        #[arg(short, long, value_enum, default_value_t = Kernel::default())]
        kernel: Kernel,

        /// Times to run the kernel before checking
        #[arg(short, long, default_value_t = 1)]
        reps: usize,
    },
    /// Time every kernel on a range of sizes
    Bench {
        /// Matrix orders to time
        #[arg(short, long, value_delimiter = ',', default_values_t = [256, 512, 1024])]
        sizes: Vec<usize>,

        /// Timed runs per kernel and size
        #[arg(short, long, default_value_t = 3)]
        iterations: usize,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let args = Args::parse();
    let padding = args.padding.unwrap_or_default();

    match args.command {
        Command::Verify { n, kernel, reps } => verify(n, kernel, reps, padding),
        Command::Bench { sizes, iterations } => {
            bench(&sizes, iterations.max(1), padding)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `RUST_LOG` directives when they parse, `info` otherwise.
///
/// A global level in `RUST_LOG` (e.g. `debug`) is used as is, not capped.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Timing an empty matrix only measures loop overhead.
fn check_bench_sizes(sizes: &[usize]) -> Result<()> {
    ensure!(!sizes.is_empty(), "no matrix sizes given");
    ensure!(sizes.iter().all(|&s| s > 0), "matrix sizes must be positive, got {:?}", sizes);
    Ok(())
}

fn verify(n: usize, kernel: Kernel, reps: usize, padding: Padding) -> Result<ExitCode> {
    let mut problem = Problem::new(n, padding)
        .with_context(|| format!("setting up a {}x{} problem", n, n))?;
    tracing::info!(
        n,
        rn = problem.layout.rn,
        ?padding,
        kernel = kernel.name(),
        reps,
        "verifying"
    );

    let start = Instant::now();
    problem.run(kernel, reps);
    let elapsed = start.elapsed().as_secs_f64();
    if reps > 0 && elapsed > 0.0 {
        let gflops = 2.0 * (n as f64).powi(3) * reps as f64 / elapsed / 1e9;
        tracing::info!("{:.3} ms per run, {:.2} GFLOPS", elapsed * 1000.0 / reps as f64, gflops);
    }

    let ok = problem.check();
    if !ok {
        tracing::warn!(max_relative_error = problem.max_relative_error(), "product mismatch");
    }
    println!("Ok = {}", ok as u8);

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn bench(sizes: &[usize], iterations: usize, padding: Padding) -> Result<()> {
    check_bench_sizes(sizes)?;
    println!("=== Square Matrix Multiplication Benchmark ===\n");
    println!("Padding: {:?}\n", padding);

    let mut all_results = Vec::new();

    for &size in sizes {
        println!("Matrix: {}×{}", size, size);
        println!("{}", "-".repeat(50));

        let mut problem = Problem::new(size, padding)
            .with_context(|| format!("setting up a {}x{} problem", size, size))?;

        let results: Vec<(Kernel, (f64, f64))> = Kernel::ALL
            .iter()
            .map(|&kernel| (kernel, bench_kernel(&mut problem, kernel, iterations)))
            .collect();

        let baseline_time = results[0].1.0;
        for (i, (kernel, (time_ms, gflops))) in results.iter().enumerate() {
            let speedup = baseline_time / time_ms;
            println!(
                "{}. {:18} {:8.2} ms  {:6.2} GFLOPS  ({:.1}×)",
                i + 1,
                kernel.name(),
                time_ms,
                gflops,
                speedup
            );
        }
        println!();

        all_results.push((size, results));
    }

    print_summary_table(&all_results);
    Ok(())
}

/// Warm up once, then average `iterations` timed runs. Returns (ms, GFLOPS).
fn bench_kernel(problem: &mut Problem, kernel: Kernel, iterations: usize) -> (f64, f64) {
    problem.run(kernel, 1);
    if !problem.check() {
        tracing::warn!(kernel = kernel.name(), n = problem.layout.n, "product mismatch");
    }

    let start = Instant::now();
    problem.run(kernel, iterations);
    let avg = start.elapsed().as_secs_f64() / iterations as f64;

    let n = problem.layout.n as f64;
    let gflops = 2.0 * n * n * n / avg / 1e9;
    (avg * 1000.0, gflops)
}

#[allow(clippy::type_complexity)]
fn print_summary_table(all_results: &[(usize, Vec<(Kernel, (f64, f64))>)]) {
    let width = 20 + 14 * all_results.len() + 12;
    println!("\n{}", "=".repeat(width));
    println!("SUMMARY");
    println!("{}", "=".repeat(width));

    print!("\n{:<20}", "Method");
    for (size, _) in all_results {
        print!(" {:>13}", format!("{}×{}", size, size));
    }
    println!(" {:>11}", "Speedup");
    println!("{}", "-".repeat(width));

    for (method_idx, kernel) in Kernel::ALL.iter().enumerate() {
        let mut speedups = Vec::new();

        print!("{:<20}", kernel.name());
        for (_, results) in all_results {
            let (time_ms, gflops) = results[method_idx].1;
            let baseline_time = results[0].1.0;
            print!(" {:>10.2} GF", gflops);
            speedups.push(baseline_time / time_ms);
        }

        let avg_speedup: f64 = speedups.iter().sum::<f64>() / speedups.len() as f64;
        println!(" {:>10.1}×", avg_speedup);
    }

    println!("{}", "=".repeat(width));
    println!("\nGF = GFLOPS (billion floating point operations per second)");
    println!("Speedup relative to the reference (i-j-k). Higher is better.\n");
}
