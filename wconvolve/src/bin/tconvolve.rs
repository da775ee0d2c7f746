//! W-projection gridding benchmark.
//!
//! ```bash
//! cargo run --release -p wconvolve --bin tconvolve -- -n 160000 -w 33 -c 1
//! cargo run --release -p wconvolve --bin tconvolve -- --execution parallel --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use common::log_setup::{ConsoleOutput, setup_logging};
use wconvolve::{Arithmetic, BenchmarkConfig, BenchmarkReport, Execution, Operations, SupportPolicy};

#[derive(Parser, Debug)]
#[command(name = "tconvolve", about = "Benchmark W-projection gridding and degridding")]
struct Cli {
    /// Number of synthetic samples
    #[arg(short = 'n', long, default_value_t = 160_000)]
    samples: usize,

    /// Number of w-projection planes
    #[arg(short = 'w', long, default_value_t = 33)]
    w_planes: usize,

    /// Number of spectral channels
    #[arg(short = 'c', long, default_value_t = 1)]
    channels: usize,

    /// Cell size multiplier (reduces the field of view)
    #[arg(short = 'f', long, default_value_t = 1.0)]
    fov_factor: f64,

    /// Grid side length in cells
    #[arg(long, default_value_t = 4096)]
    grid_size: usize,

    /// Base cell size in wavelengths
    #[arg(long, default_value_t = 5.0)]
    cell_size: f64,

    /// Maximum baseline in metres
    #[arg(long, default_value_t = 2000.0)]
    baseline: f64,

    /// Seed for sample synthesis
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// gridding, degridding or both
    #[arg(long, default_value = "both")]
    operations: Operations,

    /// serial, parallel or verify
    #[arg(long, default_value = "verify")]
    execution: Execution,

    /// scalar or auto
    #[arg(long, default_value = "auto")]
    arithmetic: Arithmetic,

    /// round, truncate or a fixed support
    #[arg(long, default_value = "round")]
    support: SupportPolicy,

    /// Worker threads (defaults to all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log filter, overridden by RUST_LOG (defaults to info, or warn with --json)
    #[arg(long)]
    log_level: Option<String>,

    /// Also write logs to daily files in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> BenchmarkConfig {
        let config = BenchmarkConfig::default()
            .with_samples(self.samples)
            .with_w_planes(self.w_planes)
            .with_channels(self.channels)
            .with_cell_size(self.cell_size)
            .with_fov_factor(self.fov_factor)
            .with_grid_size(self.grid_size)
            .with_baseline(self.baseline)
            .with_seed(self.seed)
            .with_operations(self.operations)
            .with_execution(self.execution)
            .with_arithmetic(self.arithmetic)
            .with_support(self.support);
        match self.threads {
            Some(threads) => config.with_threads(threads),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (default_level, console) = if cli.json {
        ("warn", ConsoleOutput::Stderr)
    } else {
        ("info", ConsoleOutput::Split)
    };
    setup_logging(
        cli.log_level.as_deref().unwrap_or(default_level),
        cli.log_dir.as_deref(),
        console,
    );

    let report = wconvolve::run(&cli.config()).context("benchmark failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &BenchmarkReport) {
    println!(
        "Grid {0}x{0}, {1} samples x {2} channels, {3} w-planes",
        report.grid_size, report.samples, report.channels, report.w_planes
    );
    println!(
        "Support {} ({} taps, policy {}), oversample {}, w-cell {:.3}",
        report.support, report.taps, report.support_policy, report.oversample, report.w_cell_size
    );
    println!(
        "Kernel table {:.1} MB, arithmetic {}",
        report.kernel_table_bytes as f64 / (1024.0 * 1024.0),
        report.arithmetic
    );
    println!();
    println!(
        "{:<14} {:<9} {:>7} {:>10} {:>12} {:>10} {:>12}",
        "stage", "kernel", "workers", "seconds", "us/sample", "ns/point", "Mpoints/s"
    );
    for timing in &report.timings {
        let kernel = timing.kernel.map(|k| k.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<14} {:<9} {:>7} {:>10.4} {:>12.3} {:>10.3} {:>12.1}",
            timing.stage.to_string(),
            kernel,
            timing.workers,
            timing.seconds,
            timing.us_per_sample,
            timing.ns_per_point,
            timing.mpoints_per_second
        );
    }
    if report.verified {
        println!();
        println!("Parallel results match serial within tolerance");
    }
}
